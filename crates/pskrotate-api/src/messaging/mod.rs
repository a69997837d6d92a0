// Webex messaging API client
//
// Bearer-token authenticated client for `https://webexapis.com/v1/`:
// identity, rooms, memberships, and messages with file attachments.

pub mod client;
pub mod models;

pub use client::{DEFAULT_BASE_URL, MessagingClient};
