// ── Core error types ──
//
// User-facing errors from pskrotate-core. Consumers never see raw HTTP
// status handling or JSON parse failures directly; the
// `From<pskrotate_api::Error>` impl translates them into domain variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Organization not found: {name}")]
    OrganizationNotFound { name: String },

    #[error("SSID '{name}' not found in network {network_id}")]
    SsidNotFound { network_id: String, name: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local I/O ────────────────────────────────────────────────────
    #[error("Failed to write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for both generic and SSID-specific "not found" errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::SsidNotFound { .. } | Self::OrganizationNotFound { .. }
        )
    }

    /// Returns `true` if the credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pskrotate_api::Error> for CoreError {
    fn from(err: pskrotate_api::Error) -> Self {
        match err {
            pskrotate_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key or token".into(),
            },
            pskrotate_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            pskrotate_api::Error::PermissionDenied { message } => {
                CoreError::PermissionDenied { message }
            }
            pskrotate_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            pskrotate_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            pskrotate_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            pskrotate_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            pskrotate_api::Error::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            pskrotate_api::Error::Api { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            pskrotate_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            pskrotate_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
                status: None,
            },
            pskrotate_api::Error::Attachment { path, source } => CoreError::Internal(format!(
                "cannot read attachment {path}: {source}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_becomes_not_found() {
        let err = CoreError::from(pskrotate_api::Error::Api {
            status: 404,
            message: "Network not found".into(),
        });
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_key_becomes_auth_failure() {
        let err = CoreError::from(pskrotate_api::Error::InvalidApiKey);
        assert!(err.is_auth());
    }

    #[test]
    fn api_status_is_kept() {
        let err = CoreError::from(pskrotate_api::Error::Api {
            status: 400,
            message: "PSK too short".into(),
        });
        match err {
            CoreError::Api { status, message } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "PSK too short");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
