//! Startup authentication and the periodic refresh cycle.

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use sltrack_api::{AccountId, Device, StarlineError, TelemetrySource};

use crate::sink::PresenceSink;

/// Maximum identity-pipeline attempts at startup.
const AUTH_ATTEMPTS: u32 = 2;
/// Fixed delay between startup attempts.
const AUTH_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Namespace tag prefixed to vendor device ids toward the sink.
const DEVICE_ID_PREFIX: &str = "starline_";

/// Errors from the tracker orchestration.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Api(#[from] StarlineError),

    #[error("presence sink rejected update: {0}")]
    Sink(#[source] anyhow::Error),
}

/// Polls a telemetry source and republishes device state to a presence sink.
///
/// Holds the one resolved account id for the process lifetime; the session
/// itself lives inside the source.
pub struct Tracker<S, K> {
    source: S,
    sink: K,
    account_id: AccountId,
    // serializes ticks in case the caller's timer can overlap them
    tick_guard: Mutex<()>,
}

impl<S: TelemetrySource, K: PresenceSink> Tracker<S, K> {
    /// Authenticate and build the tracker.
    ///
    /// Makes at most [`AUTH_ATTEMPTS`] pipeline runs with a fixed delay in
    /// between; the last failure is returned.
    pub async fn connect(source: S, sink: K) -> Result<Self, TrackerError> {
        let mut attempt = 1;
        let account_id = loop {
            match source.authenticate().await {
                Ok(account_id) => break account_id,
                Err(err) if attempt < AUTH_ATTEMPTS => {
                    warn!(
                        "authentication attempt {}/{} failed: {}",
                        attempt, AUTH_ATTEMPTS, err
                    );
                    sleep(AUTH_RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        };

        debug!("authenticated as account {}", account_id);
        Ok(Self {
            source,
            sink,
            account_id,
            tick_guard: Mutex::new(()),
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// One poll tick: fetch the device list and publish every device.
    ///
    /// No per-device isolation: the first failure aborts the tick. Returns
    /// the number of devices published.
    pub async fn refresh(&self) -> Result<usize, TrackerError> {
        let _guard = self.tick_guard.lock().await;

        let devices = self.source.fetch_devices(self.account_id).await?;
        for device in &devices {
            let external_id = format!("{}{}", DEVICE_ID_PREFIX, device.device_id);
            let gps = (device.position.x, device.position.y);
            let attributes = flatten_attributes(device);
            self.sink
                .see(&external_id, gps, attributes)
                .await
                .map_err(TrackerError::Sink)?;
        }

        Ok(devices.len())
    }
}

/// Flatten a device record into the sink's attribute map.
///
/// Absent optional fields produce no keys. Nested `car_state` /
/// `car_alr_state` entries become top-level keys under the `state_` /
/// `alarm_state_` prefixes, nested key names kept verbatim.
fn flatten_attributes(device: &Device) -> Map<String, Value> {
    let mut attrs = Map::new();

    let scalars = [
        ("climate_temp", &device.ctemp),
        ("engine_temp", &device.etemp),
        ("battery", &device.battery),
        ("balance", &device.balance),
    ];
    for (name, value) in scalars {
        if let Some(value) = value {
            attrs.insert(name.to_string(), value.clone());
        }
    }

    if let Some(states) = &device.car_state {
        for (key, value) in states {
            attrs.insert(format!("state_{}", key), value.clone());
        }
    }
    if let Some(states) = &device.car_alr_state {
        for (key, value) in states {
            attrs.insert(format!("alarm_state_{}", key), value.clone());
        }
    }

    attrs
}
