// pskrotate-api: Async clients for the Meraki Dashboard API and the Webex messaging API.

pub mod dashboard;
pub mod error;
pub mod messaging;
pub mod transport;

pub use dashboard::DashboardClient;
pub use error::Error;
pub use messaging::MessagingClient;
pub use transport::{TlsMode, TransportConfig};

/// Dashboard API response and request types.
pub mod dashboard_types {
    pub use crate::dashboard::models::*;
}

/// Messaging API response and request types.
pub mod messaging_types {
    pub use crate::messaging::models::*;
}
