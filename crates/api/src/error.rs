//! Error types for the StarLine API client.

use thiserror::Error;

/// Result type alias for StarLine API operations.
pub type Result<T> = std::result::Result<T, StarlineError>;

/// The identity exchanges that gate on the SLID `state` field, in order.
///
/// The final `auth.slid` exchange carries no `state`; its failures surface
/// as `MissingField`/`Malformed` rather than a stage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    AppCode,
    AppToken,
    UserLogin,
}

impl std::fmt::Display for AuthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AppCode => "app code",
            Self::AppToken => "app token",
            Self::UserLogin => "user login",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while talking to the StarLine services.
#[derive(Debug, Error)]
pub enum StarlineError {
    /// Network/connection failure at any stage
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An identity stage returned a non-success state
    #[error("auth failed at {stage} stage: {response}")]
    AuthStage { stage: AuthStage, response: String },

    /// Device-list call returned a non-200 code
    #[error("device fetch failed (code {code}): {response}")]
    Fetch { code: i64, response: String },

    /// Response body was not the JSON we expect
    #[error("malformed response from {context}: {message}")]
    Malformed {
        context: &'static str,
        message: String,
        response: String,
    },

    /// A well-formed response lacked a required field or cookie
    #[error("response missing `{field}`: {response}")]
    MissingField {
        field: &'static str,
        response: String,
    },
}

impl StarlineError {
    /// Create an auth-stage error carrying the raw response.
    pub fn auth_stage(stage: AuthStage, response: impl Into<String>) -> Self {
        Self::AuthStage {
            stage,
            response: response.into(),
        }
    }

    /// Create a fetch error carrying the raw response.
    pub fn fetch(code: i64, response: impl Into<String>) -> Self {
        Self::Fetch {
            code,
            response: response.into(),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(
        context: &'static str,
        message: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            context,
            message: message.into(),
            response: response.into(),
        }
    }

    /// Create a missing-field error.
    pub fn missing_field(field: &'static str, response: impl Into<String>) -> Self {
        Self::MissingField {
            field,
            response: response.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_stage_error_names_the_stage() {
        let err = StarlineError::auth_stage(AuthStage::UserLogin, r#"{"state":0}"#);
        assert!(err.to_string().contains("user login"));
        assert!(err.to_string().contains(r#"{"state":0}"#));
    }

    #[test]
    fn fetch_error_carries_code() {
        let err = StarlineError::fetch(403, "{}");
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn every_stage_has_a_display_name() {
        let stages = [
            (AuthStage::AppCode, "app code"),
            (AuthStage::AppToken, "app token"),
            (AuthStage::UserLogin, "user login"),
        ];
        for (stage, name) in stages {
            assert_eq!(stage.to_string(), name);
        }
    }
}
