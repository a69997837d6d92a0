// Hand-written async HTTP client for the Webex messaging API.
//
// Base path: https://webexapis.com/v1/
// Auth: `Authorization: Bearer <token>` (bot token or personal access token)

use std::path::Path;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{
    CreateMembership, CreateMessage, CreateRoom, Items, MembershipResponse, MessageResponse,
    PersonResponse, RoomResponse,
};
use crate::dashboard::client::normalize_base_url;
use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://webexapis.com/v1/";

/// Async client for the Webex messaging API.
pub struct MessagingClient {
    http: reqwest::Client,
    base_url: Url,
    max_retries: u32,
}

impl MessagingClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    pub fn from_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            max_retries: transport.max_retries,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            max_retries: TransportConfig::default().max_retries,
        })
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let request = self.http.get(url).build()?;
        let resp = transport::execute(&self.http, request, self.max_retries).await?;
        transport::decode(resp).await
    }

    /// GET an `{items: [...]}` endpoint, following `Link: rel=next`.
    async fn get_items<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let mut first = self.url(path)?;
        if !params.is_empty() {
            first.query_pairs_mut().extend_pairs(params);
        }

        let mut next = Some(first);
        let mut all = Vec::new();
        while let Some(url) = next.take() {
            debug!("GET {url}");
            let request = self.http.get(url).build()?;
            let resp = transport::execute(&self.http, request, self.max_retries).await?;
            next = transport::next_link(resp.headers());
            let page: Items<T> = transport::decode(resp).await?;
            all.extend(page.items);
        }
        Ok(all)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let request = self.http.post(url).json(body).build()?;
        let resp = transport::execute(&self.http, request, self.max_retries).await?;
        transport::decode(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let request = self.http.delete(url).build()?;
        let resp = transport::execute(&self.http, request, self.max_retries).await?;
        transport::expect_success(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Identity ─────────────────────────────────────────────────────

    pub async fn get_me(&self) -> Result<PersonResponse, Error> {
        self.get("people/me").await
    }

    // ── Rooms ────────────────────────────────────────────────────────

    pub async fn list_rooms(&self) -> Result<Vec<RoomResponse>, Error> {
        self.get_items("rooms", &[]).await
    }

    pub async fn create_room(&self, title: &str) -> Result<RoomResponse, Error> {
        self.post("rooms", &CreateRoom { title }).await
    }

    pub async fn delete_room(&self, room_id: &str) -> Result<(), Error> {
        self.delete(&format!("rooms/{room_id}")).await
    }

    // ── Memberships ──────────────────────────────────────────────────

    pub async fn list_memberships(&self, room_id: &str) -> Result<Vec<MembershipResponse>, Error> {
        self.get_items("memberships", &[("roomId", room_id)]).await
    }

    pub async fn create_membership(
        &self,
        room_id: &str,
        person_id: &str,
    ) -> Result<MembershipResponse, Error> {
        self.post(
            "memberships",
            &CreateMembership { room_id, person_id },
        )
        .await
    }

    // ── Messages ─────────────────────────────────────────────────────

    pub async fn send_message(&self, room_id: &str, text: &str) -> Result<MessageResponse, Error> {
        self.post("messages", &CreateMessage { room_id, text }).await
    }

    /// Post a message with a single file attachment (multipart upload).
    ///
    /// The API accepts one file per message.
    pub async fn send_file(
        &self,
        room_id: &str,
        text: &str,
        path: &Path,
    ) -> Result<MessageResponse, Error> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| Error::Attachment {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "attachment".to_owned(), |n| n.to_string_lossy().into_owned());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(path))?;
        let form = Form::new()
            .text("roomId", room_id.to_owned())
            .text("text", text.to_owned())
            .part("files", part);

        let url = self.url("messages")?;
        debug!("POST {url} (multipart, {})", path.display());

        let request = self.http.post(url).multipart(form).build()?;
        let resp = transport::execute(&self.http, request, self.max_retries).await?;
        transport::decode(resp).await
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("txt" | "log") => "text/plain",
        _ => "application/octet-stream",
    }
}
