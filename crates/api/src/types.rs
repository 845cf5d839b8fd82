//! Credential and wire types for the StarLine services.
//!
//! The identity pipeline's short-lived values are distinct newtypes so each
//! stage can only consume what the previous stage produced. The vendor is
//! loose about numeric fields (`state`, `code`, `user_id`, `device_id` arrive
//! as numbers or numeric strings), so those fields go through a tolerant
//! deserializer.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Account credentials, supplied once at construction.
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Short-lived application code from the first identity exchange.
#[derive(Debug, Clone)]
pub struct AppCode(String);

/// Short-lived application token (~4 h vendor validity).
#[derive(Debug, Clone)]
pub struct AppToken(String);

/// User session token issued by SLID, consumed once to open the session.
#[derive(Clone)]
pub struct SlidToken(String);

impl std::fmt::Debug for SlidToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SlidToken(<redacted>)")
    }
}

macro_rules! credential_newtype {
    ($name:ident) => {
        impl $name {
            pub(crate) fn new(value: String) -> Self {
                Self(value)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

credential_newtype!(AppCode);
credential_newtype!(AppToken);
credential_newtype!(SlidToken);

/// Resolved account identifier, cached for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Accepts an integer or a numeric string.
fn flexible_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Str(value) => value.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}

/// Coerce a JSON value to i64 the way the vendor's clients do (`int(...)`).
pub(crate) fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Envelope shared by the three SLID exchanges: a numeric `state` plus a
/// `desc` object holding the issued credential.
#[derive(Debug, Deserialize)]
pub(crate) struct SlidEnvelope {
    #[serde(deserialize_with = "flexible_i64")]
    pub state: i64,
    #[serde(default)]
    pub desc: Option<Value>,
}

/// Response from the device-list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceListResponse {
    #[serde(deserialize_with = "flexible_i64")]
    pub code: i64,
    #[serde(default)]
    pub devices: Option<Vec<Device>>,
}

/// Last-known position of a device.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One tracked device as reported by a poll.
///
/// Optional scalars and the two nested status groups are carried as raw JSON
/// values so the vendor's representation reaches the presence sink verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    #[serde(deserialize_with = "flexible_i64")]
    pub device_id: i64,
    pub position: Position,
    #[serde(default)]
    pub ctemp: Option<Value>,
    #[serde(default)]
    pub etemp: Option<Value>,
    #[serde(default)]
    pub battery: Option<Value>,
    #[serde(default)]
    pub balance: Option<Value>,
    #[serde(default)]
    pub car_state: Option<Map<String, Value>>,
    #[serde(default)]
    pub car_alr_state: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_accepts_numeric_string_state() {
        let envelope: SlidEnvelope =
            serde_json::from_str(r#"{"state":"1","desc":{"code":"12345"}}"#).unwrap();
        assert_eq!(envelope.state, 1);
    }

    #[test]
    fn device_with_only_required_fields_parses() {
        let device: Device =
            serde_json::from_value(json!({"device_id": 7, "position": {"x": 1.5, "y": 2.5}}))
                .unwrap();
        assert_eq!(device.device_id, 7);
        assert!(device.battery.is_none());
        assert!(device.car_state.is_none());
    }

    #[test]
    fn device_id_accepts_string_form() {
        let device: Device = serde_json::from_value(
            json!({"device_id": "42", "position": {"x": 0.0, "y": 0.0}}),
        )
        .unwrap();
        assert_eq!(device.device_id, 42);
    }

    #[test]
    fn device_list_response_keeps_nested_groups() {
        let body = r#"{"code":200,"devices":[{"device_id":7,"position":{"x":1.0,"y":2.0},"car_state":{"door":1,"ign":0}}]}"#;
        let parsed: DeviceListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, 200);
        let devices = parsed.devices.unwrap();
        let states = devices[0].car_state.as_ref().unwrap();
        assert_eq!(states.get("door"), Some(&json!(1)));
    }

    #[test]
    fn coerce_i64_handles_vendor_forms() {
        assert_eq!(coerce_i64(&json!(42)), Some(42));
        assert_eq!(coerce_i64(&json!("42")), Some(42));
        assert_eq!(coerce_i64(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_i64(&json!({"a": 1})), None);
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let creds = Credentials {
            app_id: "app".into(),
            app_secret: "hunter2".into(),
            username: "user".into(),
            password: "hunter3".into(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("hunter3"));
        assert!(rendered.contains("<redacted>"));
    }
}
