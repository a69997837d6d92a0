// pskrotate-core: Domain layer between pskrotate-api and the CLI.

pub mod config;
pub mod convert;
pub mod credential;
pub mod error;
pub mod manager;
pub mod model;
pub mod notify;
pub mod psk;
pub mod report;
pub mod ssid;
pub mod workflow;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, GuestPolicy, TlsVerification};
pub use credential::{CredentialState, ValidCredential, Verdict};
pub use error::CoreError;
pub use manager::NetworkManager;
pub use model::{
    Network, Organization, OutcomeStatus, Room, RunOutcomes, Ssid, SsidKind, SsidUpdate,
    UpdateOutcome,
};
pub use notify::{Delivery, Messenger, ReportRoom, RoomChoice};
pub use psk::Psk;
pub use report::{ReportPaths, write_report};
pub use ssid::{update_psk_by_name, update_psk_by_number};
pub use workflow::{ByNameOutcomes, update_psk_by_name_across, update_tagged_networks};
