// ── Credential validation state machine ──
//
// The CLI feeds user input and validation verdicts through
// `CredentialState`; workflows only ever receive a `ValidCredential`.
//
//   Unset ──submit──▶ PendingValidation ──Accepted──▶ Valid
//                            │
//                            └──Rejected──▶ Invalid ──submit──▶ PendingValidation

use secrecy::SecretString;

use crate::error::CoreError;
use crate::manager::NetworkManager;
use crate::notify::Messenger;

/// A credential that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCredential {
    secret: SecretString,
    identity: Option<String>,
}

impl ValidCredential {
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// Identity reported by the API at validation time (e.g. a user id).
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

/// Result of checking a pending credential against its API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted { identity: Option<String> },
    Rejected { reason: String },
}

#[derive(Debug, Clone, Default)]
pub enum CredentialState {
    #[default]
    Unset,
    PendingValidation {
        secret: SecretString,
    },
    Valid(ValidCredential),
    Invalid {
        reason: String,
    },
}

impl CredentialState {
    /// Start from a stored value; blank or missing values are `Unset`.
    pub fn from_stored(value: Option<&str>) -> Self {
        Self::Unset.submit(value.unwrap_or_default())
    }

    /// New input from the operator. Valid from any state.
    pub fn submit(self, value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Unset
        } else {
            Self::PendingValidation {
                secret: SecretString::from(trimmed),
            }
        }
    }

    /// Apply a verdict. Only meaningful while pending; other states are
    /// returned unchanged.
    pub fn resolve(self, verdict: Verdict) -> Self {
        match (self, verdict) {
            (Self::PendingValidation { secret }, Verdict::Accepted { identity }) => {
                Self::Valid(ValidCredential { secret, identity })
            }
            (Self::PendingValidation { .. }, Verdict::Rejected { reason }) => {
                Self::Invalid { reason }
            }
            (state, _) => state,
        }
    }

    pub fn pending_secret(&self) -> Option<&SecretString> {
        match self {
            Self::PendingValidation { secret } => Some(secret),
            _ => None,
        }
    }

    /// `true` in the states where the operator must supply a value.
    pub fn needs_input(&self) -> bool {
        matches!(self, Self::Unset | Self::Invalid { .. })
    }

    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::PendingValidation { .. } => "pending",
            Self::Valid(_) => "valid",
            Self::Invalid { .. } => "invalid",
        }
    }
}

// ── Verdicts from live APIs ──────────────────────────────────────────

/// A dashboard key is accepted when it can see at least one organization.
///
/// Auth rejections become `Rejected`; transport errors are returned so an
/// outage is not mistaken for a bad key.
pub async fn check_dashboard_key<M: NetworkManager>(manager: &M) -> Result<Verdict, CoreError> {
    match manager.list_organizations().await {
        Ok(orgs) if orgs.is_empty() => Ok(Verdict::Rejected {
            reason: "the API key cannot see any organization".into(),
        }),
        Ok(_) => Ok(Verdict::Accepted { identity: None }),
        Err(e) if e.is_auth() => Ok(Verdict::Rejected {
            reason: e.to_string(),
        }),
        Err(e) => Err(e),
    }
}

/// A messaging token is accepted when the API reports who owns it.
pub async fn check_messaging_token<M: Messenger>(messenger: &M) -> Result<Verdict, CoreError> {
    match messenger.validate_token().await? {
        Some(user_id) => Ok(Verdict::Accepted {
            identity: Some(user_id),
        }),
        None => Ok(Verdict::Rejected {
            reason: "the token was rejected".into(),
        }),
    }
}
