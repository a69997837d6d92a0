// Dashboard API response types
//
// Fields the rotation workflow reads are modeled explicitly; everything else
// lands in `extra` because the API adds fields across releases.

use serde::{Deserialize, Serialize};

// ── Organizations ────────────────────────────────────────────────────

/// Organization as returned by `GET /organizations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Catch-all for fields not modeled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Networks ─────────────────────────────────────────────────────────

/// Network as returned by `GET /organizations/{organizationId}/networks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// e.g. `wireless`, `appliance`, `switch`.
    #[serde(default)]
    pub product_types: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── SSIDs ────────────────────────────────────────────────────────────

/// Wireless (MR) SSID as returned by `GET /networks/{networkId}/wireless/ssids[/{number}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessSsidResponse {
    pub number: u8,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    /// e.g. `psk`, `open`, `8021x-radius`.
    #[serde(default)]
    pub auth_mode: Option<String>,
    #[serde(default)]
    pub encryption_mode: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Appliance (MX) SSID as returned by `GET /networks/{networkId}/appliance/ssids[/{number}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSsidResponse {
    pub number: u8,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub auth_mode: Option<String>,
    #[serde(default)]
    pub wpa_encryption_mode: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Request bodies ───────────────────────────────────────────────────

/// Partial SSID update carrying only the new pre-shared key.
///
/// Used for both `PUT /networks/{id}/wireless/ssids/{number}` and
/// `PUT /networks/{id}/appliance/ssids/{number}`.
#[derive(Debug, Clone, Serialize)]
pub struct SsidPskUpdate<'a> {
    pub psk: &'a str,
}
