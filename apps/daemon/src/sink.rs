//! Stdout presence sink: one JSON line per device update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use sltrack_core::PresenceSink;

/// Writes presence updates to stdout as JSON lines.
#[derive(Debug, Default)]
pub struct StdoutSink;

fn render_line(
    timestamp: DateTime<Utc>,
    device_id: &str,
    gps: (f64, f64),
    attributes: &Map<String, Value>,
) -> String {
    json!({
        "ts": timestamp.to_rfc3339(),
        "device_id": device_id,
        "gps": [gps.0, gps.1],
        "attributes": attributes,
    })
    .to_string()
}

#[async_trait]
impl PresenceSink for StdoutSink {
    async fn see(
        &self,
        device_id: &str,
        gps: (f64, f64),
        attributes: Map<String, Value>,
    ) -> anyhow::Result<()> {
        println!("{}", render_line(Utc::now(), device_id, gps, &attributes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_id_gps_and_attributes() {
        let mut attrs = Map::new();
        attrs.insert("battery".to_string(), json!(90));

        let line = render_line(
            "2026-08-28T12:00:00Z".parse().unwrap(),
            "starline_7",
            (1.5, 2.5),
            &attrs,
        );

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["device_id"], json!("starline_7"));
        assert_eq!(parsed["gps"], json!([1.5, 2.5]));
        assert_eq!(parsed["attributes"]["battery"], json!(90));
        assert!(parsed["ts"].as_str().unwrap().starts_with("2026-08-28"));
    }
}
