//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use pskrotate_config::ConfigError;
use pskrotate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(pskrotate::connection_failed),
        help(
            "Check network access to the API.\n\
             Behind a TLS-inspecting proxy, set defaults.ca_cert in the config file."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Rate limited by the API (retry after {retry_after_secs}s)")]
    #[diagnostic(
        code(pskrotate::rate_limited),
        help("Wait and retry, or raise dashboard.max_retries in the config file.")
    )]
    RateLimited { retry_after_secs: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{name} was rejected: {reason}")]
    #[diagnostic(
        code(pskrotate::auth_failed),
        help(
            "Verify the credential, then store it with:\n\
             pskrotate config set-credential {name}"
        )
    )]
    AuthFailed { name: String, reason: String },

    #[error("No {name} configured")]
    #[diagnostic(
        code(pskrotate::no_credentials),
        help(
            "Set the {name} environment variable, pass it as a flag,\n\
             or run: pskrotate config set-credential {name}"
        )
    )]
    NoCredentials { name: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(pskrotate::permission_denied),
        help("The API key needs write access to the organization's networks.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(pskrotate::not_found),
        help("Run: pskrotate {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(pskrotate::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Run results ──────────────────────────────────────────────────
    #[error("{failed} of {total} PSK updates failed")]
    #[diagnostic(
        code(pskrotate::partial_failure),
        help("See the unsuccessful_psk_changes report for details.")
    )]
    PartialFailure { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pskrotate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(pskrotate::config),
        help("Check the config file (pskrotate config path) and PSKROTATE_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(pskrotate::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(pskrotate::timeout),
        help("Increase timeout with --timeout or check API responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Internal ────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(pskrotate::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::RateLimited { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                name: "credential".into(),
                reason: message,
            },

            CoreError::PermissionDenied { message } => CliError::PermissionDenied { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::RateLimited { retry_after_secs } => CliError::RateLimited { retry_after_secs },

            CoreError::OrganizationNotFound { name } => CliError::NotFound {
                resource_type: "organization".into(),
                identifier: name,
                list_command: "orgs list".into(),
            },

            CoreError::SsidNotFound { network_id, name } => CliError::NotFound {
                resource_type: "SSID".into(),
                identifier: name,
                list_command: format!("ssids list --network-id {network_id}"),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Report { path, source } => CliError::Io(std::io::Error::new(
                source.kind(),
                format!("cannot write report {}: {source}", path.display()),
            )),

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let auth = CliError::NoCredentials {
            name: "MERAKI_API_KEY".into(),
        };
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing: CliError = CoreError::SsidNotFound {
            network_id: "N1".into(),
            name: "Guest".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let bad_psk: CliError = CoreError::ValidationFailed {
            message: "too short".into(),
        }
        .into();
        assert_eq!(bad_psk.exit_code(), exit_code::USAGE);

        let partial = CliError::PartialFailure {
            failed: 1,
            total: 3,
        };
        assert_eq!(partial.exit_code(), exit_code::GENERAL);
    }
}
