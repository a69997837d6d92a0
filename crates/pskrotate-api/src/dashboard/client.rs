// Hand-written async HTTP client for the Meraki Dashboard API (v1).
//
// Base path: https://api.meraki.com/api/v1/
// Auth: `Authorization: Bearer <api key>`

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{
    ApplianceSsidResponse, NetworkResponse, OrganizationResponse, SsidPskUpdate,
    WirelessSsidResponse,
};
use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1/";

/// Async client for the Meraki Dashboard API.
///
/// Every call is a single awaited request (plus `Link` page follow-ups and
/// 429 retries); there is no caching between calls.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
    max_retries: u32,
}

impl DashboardClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `Authorization: Bearer …` as a sensitive default header.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
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

    /// Override the 429 retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
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

    /// GET a list endpoint, following `Link: rel=next` until exhausted.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        let mut next = Some(self.url(path)?);
        let mut all = Vec::new();

        while let Some(url) = next.take() {
            debug!("GET {url}");
            let request = self.http.get(url).build()?;
            let resp = transport::execute(&self.http, request, self.max_retries).await?;
            next = transport::next_link(resp.headers());
            let page: Vec<T> = transport::decode(resp).await?;
            all.extend(page);
        }

        Ok(all)
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let request = self.http.put(url).json(body).build()?;
        let resp = transport::execute(&self.http, request, self.max_retries).await?;
        transport::decode(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Organizations ────────────────────────────────────────────────

    pub async fn list_organizations(&self) -> Result<Vec<OrganizationResponse>, Error> {
        self.get_all("organizations").await
    }

    /// An API key is usable when it can see at least one organization.
    pub async fn validate_api_key(&self) -> Result<bool, Error> {
        match self.list_organizations().await {
            Ok(orgs) => Ok(!orgs.is_empty()),
            Err(Error::InvalidApiKey) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── Networks ─────────────────────────────────────────────────────

    pub async fn list_networks(&self, org_id: &str) -> Result<Vec<NetworkResponse>, Error> {
        self.get_all(&format!("organizations/{org_id}/networks"))
            .await
    }

    // ── Wireless SSIDs ───────────────────────────────────────────────

    pub async fn list_wireless_ssids(
        &self,
        network_id: &str,
    ) -> Result<Vec<WirelessSsidResponse>, Error> {
        self.get(&format!("networks/{network_id}/wireless/ssids"))
            .await
    }

    pub async fn get_wireless_ssid(
        &self,
        network_id: &str,
        number: u8,
    ) -> Result<WirelessSsidResponse, Error> {
        self.get(&format!("networks/{network_id}/wireless/ssids/{number}"))
            .await
    }

    pub async fn update_wireless_ssid_psk(
        &self,
        network_id: &str,
        number: u8,
        psk: &str,
    ) -> Result<WirelessSsidResponse, Error> {
        self.put(
            &format!("networks/{network_id}/wireless/ssids/{number}"),
            &SsidPskUpdate { psk },
        )
        .await
    }

    // ── Appliance SSIDs ──────────────────────────────────────────────

    pub async fn list_appliance_ssids(
        &self,
        network_id: &str,
    ) -> Result<Vec<ApplianceSsidResponse>, Error> {
        self.get(&format!("networks/{network_id}/appliance/ssids"))
            .await
    }

    pub async fn get_appliance_ssid(
        &self,
        network_id: &str,
        number: u8,
    ) -> Result<ApplianceSsidResponse, Error> {
        self.get(&format!("networks/{network_id}/appliance/ssids/{number}"))
            .await
    }

    pub async fn update_appliance_ssid_psk(
        &self,
        network_id: &str,
        number: u8,
        psk: &str,
    ) -> Result<ApplianceSsidResponse, Error> {
        self.put(
            &format!("networks/{network_id}/appliance/ssids/{number}"),
            &SsidPskUpdate { psk },
        )
        .await
    }
}

/// Ensure the base URL ends with `/` so relative joins append instead of
/// replacing the last segment.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
