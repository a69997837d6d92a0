// ── Domain model ──
//
// Plain value types the workflow passes around. Nothing here talks to the
// network; `convert` builds these from API responses.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Top-level tenant grouping many networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A managed site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
    /// Operator-assigned labels, in the order the API returns them.
    pub tags: Vec<String>,
    /// e.g. `wireless`, `appliance`, `switch`.
    pub product_types: Vec<String>,
}

impl Network {
    /// Case-sensitive exact match against the tag list.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the network reports the product type backing `kind`.
    ///
    /// Networks without product type information are assumed to support it.
    pub fn supports(&self, kind: SsidKind) -> bool {
        self.product_types.is_empty() || self.product_types.iter().any(|p| p == kind.product_type())
    }
}

/// Which SSID family an update targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum SsidKind {
    /// Access-point (MR) SSIDs.
    #[strum(to_string = "wireless", serialize = "mrw", serialize = "mr")]
    Wireless,
    /// SSIDs broadcast by a security appliance (MX).
    #[strum(to_string = "appliance", serialize = "mxw", serialize = "mx")]
    Appliance,
}

impl SsidKind {
    /// Product type string the dashboard uses for this family.
    pub fn product_type(self) -> &'static str {
        match self {
            Self::Wireless => "wireless",
            Self::Appliance => "appliance",
        }
    }

    /// Human-readable label used in outcome messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Wireless => "MR wireless",
            Self::Appliance => "MX appliance",
        }
    }
}

/// One numbered SSID configuration within a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ssid {
    pub number: u8,
    pub name: String,
    pub enabled: bool,
    pub auth_mode: Option<String>,
}

/// Post-update state returned by the single-SSID operations.
///
/// Built from a follow-up read, not from the update response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsidUpdate {
    pub network_id: String,
    pub kind: SsidKind,
    pub ssid: Ssid,
    pub confirmation: String,
}

// ── Outcomes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Result of one PSK update attempt against one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub status: OutcomeStatus,
    pub network_id: String,
    pub network_name: String,
    pub kind: SsidKind,
    /// `None` when the attempt failed before a slot was resolved.
    pub ssid_number: Option<u8>,
    /// Confirmation text on success, error description on failure.
    pub message: String,
}

impl UpdateOutcome {
    pub fn success(network: &Network, kind: SsidKind, ssid_number: u8) -> Self {
        Self {
            status: OutcomeStatus::Success,
            network_id: network.id.clone(),
            network_name: network.name.clone(),
            kind,
            ssid_number: Some(ssid_number),
            message: format!(
                "Updated PSK for {} SSID number {ssid_number} for '{}' with network ID '{}'",
                kind.label(),
                network.name,
                network.id
            ),
        }
    }

    pub fn failure(network: &Network, kind: SsidKind, ssid_number: u8, err: &CoreError) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            network_id: network.id.clone(),
            network_name: network.name.clone(),
            kind,
            ssid_number: Some(ssid_number),
            message: format!(
                "Failed to update PSK for {} SSID number {ssid_number} for '{}' with network ID '{}': {err}",
                kind.label(),
                network.name,
                network.id
            ),
        }
    }

    /// Failure to list a network's SSIDs, before any slot was chosen.
    pub fn lookup_failure(network: &Network, kind: SsidKind, err: &CoreError) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            network_id: network.id.clone(),
            network_name: network.name.clone(),
            kind,
            ssid_number: None,
            message: format!(
                "Failed to list {} SSIDs for '{}' with network ID '{}': {err}",
                kind.label(),
                network.name,
                network.id
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The two ordered outcome lists of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcomes {
    pub successes: Vec<UpdateOutcome>,
    pub failures: Vec<UpdateOutcome>,
}

impl RunOutcomes {
    /// Route an outcome to the list matching its status.
    pub fn push(&mut self, outcome: UpdateOutcome) {
        match outcome.status {
            OutcomeStatus::Success => self.successes.push(outcome),
            OutcomeStatus::Failure => self.failures.push(outcome),
        }
    }

    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every outcome, successes first.
    pub fn iter(&self) -> impl Iterator<Item = &UpdateOutcome> {
        self.successes.iter().chain(self.failures.iter())
    }
}

/// Messaging room (space).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub title: String,
    pub created: Option<String>,
}
