// Meraki Dashboard API client
//
// Bearer-token authenticated JSON REST client for `https://api.meraki.com/api/v1/`.
// Covers the organization, network, and SSID endpoints (wireless and
// appliance) that PSK rotation needs.

pub mod client;
pub mod models;

pub use client::{DEFAULT_BASE_URL, DashboardClient};
