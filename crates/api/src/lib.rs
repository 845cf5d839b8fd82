//! StarLine vendor API client.
//!
//! Implements the four-stage SLID identity pipeline and the authenticated
//! device-list fetch against the StarLine telemetry API. The `slnet` session
//! cookie issued during authentication is held by the client's cookie store
//! and carried on every later call.

mod client;
mod digest;
mod error;
mod source;
mod types;

pub use client::StarlineClient;
pub use error::{AuthStage, Result, StarlineError};
pub use source::TelemetrySource;
pub use types::{AccountId, AppCode, AppToken, Credentials, Device, Position, SlidToken};
