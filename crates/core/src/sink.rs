//! Seam toward the host platform's device-presence registry.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Destination for per-device presence updates.
///
/// Called once per device per refresh tick with a stable external id, the
/// coordinate pair, and the flattened attribute map. Failures are
/// host-defined, so they surface as `anyhow::Error`.
#[async_trait]
pub trait PresenceSink: Send + Sync {
    async fn see(
        &self,
        device_id: &str,
        gps: (f64, f64),
        attributes: Map<String, Value>,
    ) -> anyhow::Result<()>;
}
