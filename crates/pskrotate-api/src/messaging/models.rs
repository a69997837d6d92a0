//! Messaging API request and response types.
//!
//! Field names use camelCase on the wire.

use serde::{Deserialize, Serialize};

/// List endpoints wrap their payload in `{ "items": [...] }`.
#[derive(Debug, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// The identity behind a token as returned by `GET /people/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Room (space) as returned by `GET /rooms` and `POST /rooms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub title: String,
    /// `group` or `direct`.
    #[serde(default, rename = "type")]
    pub room_type: Option<String>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub created: Option<String>,
}

/// Room membership as returned by `GET /memberships` and `POST /memberships`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub id: String,
    pub room_id: String,
    pub person_id: String,
    #[serde(default)]
    pub person_email: Option<String>,
}

/// Posted message as returned by `POST /messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

// ── Request bodies ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateRoom<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembership<'a> {
    pub room_id: &'a str,
    pub person_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessage<'a> {
    pub room_id: &'a str,
    pub text: &'a str,
}
