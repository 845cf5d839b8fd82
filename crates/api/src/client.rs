//! Client for the StarLine identity (SLID) and telemetry services.
//!
//! Authentication is a chain of four exchanges: app code, app token, user
//! login, then `auth.slid`, which sets the `slnet` cookie on the session.
//! That cookie, held by the client's cookie store, is the credential for
//! every later device fetch; none of the intermediate tokens are retained.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::digest;
use crate::error::{AuthStage, Result, StarlineError};
use crate::source::TelemetrySource;
use crate::types::{
    coerce_i64, AccountId, AppCode, AppToken, Credentials, Device, DeviceListResponse,
    SlidEnvelope, SlidToken,
};

/// Default timeout for vendor requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_LOG_BODY_CHARS: usize = 512;

const DEFAULT_SLID_BASE: &str = "https://id.starline.ru";
const DEFAULT_API_BASE: &str = "https://developer.starline.ru";

/// Client for the StarLine vendor APIs.
///
/// Owns the HTTP session (and its cookie store) shared by the identity
/// pipeline and all later polls.
#[derive(Debug)]
pub struct StarlineClient {
    client: reqwest::Client,
    credentials: Credentials,
    slid_base: String,
    api_base: String,
}

impl StarlineClient {
    /// Create a client against the production vendor endpoints.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_urls(credentials, DEFAULT_SLID_BASE, DEFAULT_API_BASE)
    }

    /// Create a client against custom base URLs (tests point these at a mock).
    pub fn with_base_urls(credentials: Credentials, slid_base: &str, api_base: &str) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            credentials,
            slid_base: slid_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("response ({}): {}", status, preview);
    }

    /// Read the body and log it; transport failures surface here.
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);
        Ok(body)
    }

    /// Parse a SLID envelope, check `state == 1`, and pull a field out of `desc`.
    fn extract_slid_credential(
        stage: AuthStage,
        context: &'static str,
        field: &'static str,
        body: &str,
    ) -> Result<String> {
        let envelope: SlidEnvelope = serde_json::from_str(body)
            .map_err(|e| StarlineError::malformed(context, e.to_string(), body))?;

        if envelope.state != 1 {
            return Err(StarlineError::auth_stage(stage, body));
        }

        let value = envelope
            .desc
            .as_ref()
            .and_then(|desc| desc.get(field))
            .ok_or_else(|| StarlineError::missing_field(field, body))?;

        match value {
            serde_json::Value::String(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }

    /// Stage 1: request the short-lived application code.
    pub async fn request_app_code(&self) -> Result<AppCode> {
        let url = format!("{}/apiV3/application/getCode/", self.slid_base);
        debug!("execute request: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("appId", self.credentials.app_id.as_str()),
                (
                    "secret",
                    digest::hash_app_secret(&self.credentials.app_secret).as_str(),
                ),
            ])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let code =
            Self::extract_slid_credential(AuthStage::AppCode, "application/getCode", "code", &body)?;
        Ok(AppCode::new(code))
    }

    /// Stage 2: exchange the app code for an application token.
    pub async fn request_app_token(&self, code: &AppCode) -> Result<AppToken> {
        let url = format!("{}/apiV3/application/getToken/", self.slid_base);
        debug!("execute request: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("appId", self.credentials.app_id.as_str()),
                (
                    "secret",
                    digest::hash_app_secret_with_code(&self.credentials.app_secret, code.as_str())
                        .as_str(),
                ),
            ])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let token = Self::extract_slid_credential(
            AuthStage::AppToken,
            "application/getToken",
            "token",
            &body,
        )?;
        Ok(AppToken::new(token))
    }

    /// Stage 3: log the user in, yielding the SLID session token.
    pub async fn request_user_token(&self, token: &AppToken) -> Result<SlidToken> {
        let url = format!("{}/apiV3/user/login/", self.slid_base);
        debug!("execute request: {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("token", token.as_str())])
            .form(&[
                ("login", self.credentials.username.as_str()),
                (
                    "pass",
                    digest::hash_password(&self.credentials.password).as_str(),
                ),
            ])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let user_token =
            Self::extract_slid_credential(AuthStage::UserLogin, "user/login", "user_token", &body)?;
        Ok(SlidToken::new(user_token))
    }

    /// Stage 4: open the telemetry session.
    ///
    /// The response must set the `slnet` cookie (captured by the client's
    /// cookie store) and carry the account's `user_id`. There is no `state`
    /// field on this endpoint.
    pub async fn open_session(&self, slid_token: &SlidToken) -> Result<AccountId> {
        let url = format!("{}/json/v2/auth.slid", self.api_base);
        debug!("execute request: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "slid_token": slid_token.as_str() }))
            .send()
            .await?;

        let has_slnet = response.cookies().any(|cookie| cookie.name() == "slnet");
        let body = Self::read_body(response).await?;
        if !has_slnet {
            return Err(StarlineError::missing_field("slnet", &body));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| StarlineError::malformed("auth.slid", e.to_string(), &body))?;
        let user_id = value
            .get("user_id")
            .and_then(coerce_i64)
            .ok_or_else(|| StarlineError::missing_field("user_id", &body))?;

        debug!("resolved account id: {}", user_id);
        Ok(AccountId::new(user_id))
    }

    /// Fetch the account's device list over the established session.
    pub async fn fetch_devices(&self, account_id: AccountId) -> Result<Vec<Device>> {
        let url = format!("{}/json/v1/user/{}/user_info/", self.api_base, account_id);
        debug!("execute request: {}", url);

        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response).await?;

        let parsed: DeviceListResponse = serde_json::from_str(&body)
            .map_err(|e| StarlineError::malformed("user_info", e.to_string(), &body))?;

        if parsed.code != 200 {
            return Err(StarlineError::fetch(parsed.code, &body));
        }

        parsed
            .devices
            .ok_or_else(|| StarlineError::missing_field("devices", &body))
    }
}

#[async_trait]
impl TelemetrySource for StarlineClient {
    /// Run the four identity stages strictly in order.
    async fn authenticate(&self) -> Result<AccountId> {
        let app_code = self.request_app_code().await?;
        let app_token = self.request_app_token(&app_code).await?;
        let slid_token = self.request_user_token(&app_token).await?;
        self.open_session(&slid_token).await
    }

    async fn fetch_devices(&self, account_id: AccountId) -> Result<Vec<Device>> {
        StarlineClient::fetch_devices(self, account_id).await
    }
}
