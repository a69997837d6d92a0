// ── Runtime configuration ──
//
// Describes how to reach the two APIs and which networks the tagged
// workflow targets. Built by the CLI from the on-disk config plus flags;
// this crate never reads config files itself.

use std::path::PathBuf;
use std::time::Duration;

use pskrotate_api::{DashboardClient, MessagingClient, TlsMode, TransportConfig};
use secrecy::SecretString;

use crate::error::CoreError;
use crate::model::{Network, SsidKind};

/// TLS certificate verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// Use the system certificate store.
    #[default]
    SystemDefaults,
    /// Additionally trust a PEM CA bundle.
    CustomCa(PathBuf),
}

/// Connection settings shared by both API clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Dashboard API base, e.g. `https://api.meraki.com/api/v1/`.
    pub dashboard_url: String,
    /// Messaging API base, e.g. `https://webexapis.com/v1/`.
    pub messaging_url: String,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// 429 retry budget per request.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            dashboard_url: pskrotate_api::dashboard::DEFAULT_BASE_URL.to_owned(),
            messaging_url: pskrotate_api::messaging::DEFAULT_BASE_URL.to_owned(),
            tls: TlsVerification::SystemDefaults,
            timeout: transport.timeout,
            max_retries: transport.max_retries,
        }
    }
}

impl ClientConfig {
    fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: self.timeout,
            max_retries: self.max_retries,
        }
    }

    /// Build a dashboard client authenticated with `api_key`.
    pub fn dashboard_client(&self, api_key: &SecretString) -> Result<DashboardClient, CoreError> {
        Ok(DashboardClient::from_api_key(
            &self.dashboard_url,
            api_key,
            &self.transport(),
        )?)
    }

    /// Build a messaging client authenticated with a bot token or PAT.
    pub fn messaging_client(&self, token: &SecretString) -> Result<MessagingClient, CoreError> {
        Ok(MessagingClient::from_token(
            &self.messaging_url,
            token,
            &self.transport(),
        )?)
    }
}

// ── Guest network selection ──────────────────────────────────────────

/// Which tags select networks for the bulk update, and which SSID slot
/// each family rotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestPolicy {
    /// Networks with this tag get their wireless (MR) guest SSID rotated.
    pub wireless_tag: String,
    /// Networks with this tag get their appliance (MX) guest SSID rotated.
    pub appliance_tag: String,
    pub wireless_number: u8,
    pub appliance_number: u8,
}

impl Default for GuestPolicy {
    fn default() -> Self {
        Self {
            wireless_tag: "MX-GuestPSK".into(),
            appliance_tag: "MXW-GuestPSK".into(),
            wireless_number: 2,
            appliance_number: 2,
        }
    }
}

impl GuestPolicy {
    /// Update targets for one network, wireless first. Empty when neither
    /// tag is present.
    pub fn targets(&self, network: &Network) -> Vec<(SsidKind, u8)> {
        let mut targets = Vec::with_capacity(2);
        if network.has_tag(&self.wireless_tag) {
            targets.push((SsidKind::Wireless, self.wireless_number));
        }
        if network.has_tag(&self.appliance_tag) {
            targets.push((SsidKind::Appliance, self.appliance_number));
        }
        targets
    }
}
