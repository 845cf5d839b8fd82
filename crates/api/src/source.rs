//! Seam between the vendor client and the tracker orchestration.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AccountId, Device};

/// A source of tracked-device telemetry.
///
/// `StarlineClient` is the production implementation; tests substitute a stub.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Run the identity pipeline and return the resolved account id.
    async fn authenticate(&self) -> Result<AccountId>;

    /// Fetch the account's current device list over the established session.
    async fn fetch_devices(&self, account_id: AccountId) -> Result<Vec<Device>>;
}
