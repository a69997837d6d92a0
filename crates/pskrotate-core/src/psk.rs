// ── Pre-shared key ──

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// WPA2 passphrase length bounds.
pub const MIN_LEN: usize = 8;
pub const MAX_LEN: usize = 63;

/// A pre-shared key that passed the passphrase policy: 8 to 63 printable
/// ASCII characters.
///
/// The value is never printed by `Debug`.
#[derive(Clone)]
pub struct Psk(SecretString);

impl Psk {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let len = raw.chars().count();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "PSK must be {MIN_LEN} to {MAX_LEN} characters long (got {len})"
                ),
            });
        }
        if let Some(bad) = raw.chars().find(|c| !(c.is_ascii_graphic() || *c == ' ')) {
            return Err(CoreError::ValidationFailed {
                message: format!("PSK contains a character outside printable ASCII: {bad:?}"),
            });
        }
        Ok(Self(SecretString::from(raw)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Psk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Psk([REDACTED])")
    }
}
