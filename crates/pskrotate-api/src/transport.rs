// Shared transport configuration and response handling.
//
// Both the Dashboard and Messaging clients build their `reqwest::Client`
// through this module and share 429 retry, `Link` pagination, and error
// body parsing.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::error::Error;

const USER_AGENT: &str = concat!("pskrotate/", env!("CARGO_PKG_VERSION"));

/// Fallback wait when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file
    /// (TLS-inspecting corporate proxies).
    CustomCa(PathBuf),
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// How many times a rate-limited (429) request is re-sent before
    /// giving up with [`Error::RateLimited`].
    pub max_retries: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Both clients use this to inject their `Authorization` header.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if let TlsMode::CustomCa(path) = &self.tls {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── Request execution ────────────────────────────────────────────────

/// Send a request, re-sending it while the server answers 429.
///
/// Requests with streaming bodies (multipart uploads) cannot be cloned
/// and are therefore never retried.
pub(crate) async fn execute(
    http: &reqwest::Client,
    mut request: reqwest::Request,
    max_retries: u32,
) -> Result<reqwest::Response, Error> {
    let mut attempt = 0;
    loop {
        let retry = request.try_clone();
        let resp = http.execute(request).await?;
        if resp.status() != StatusCode::TOO_MANY_REQUESTS {
            return Ok(resp);
        }

        let wait = retry_after_secs(resp.headers());
        match retry {
            Some(next) if attempt < max_retries => {
                attempt += 1;
                warn!(attempt, wait_secs = wait, url = %next.url(), "rate limited, retrying");
                tokio::time::sleep(Duration::from_secs(wait)).await;
                request = next;
            }
            _ => {
                return Err(Error::RateLimited {
                    retry_after_secs: wait,
                });
            }
        }
    }
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Extract the `rel=next` target from an RFC 8288 `Link` header.
///
/// Both APIs paginate this way: `<https://…?startingAfter=x>; rel=next`.
pub(crate) fn next_link(headers: &HeaderMap) -> Option<Url> {
    let raw = headers.get(LINK)?.to_str().ok()?;
    raw.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| {
            let p = p.trim();
            p == "rel=next" || p == "rel=\"next\""
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

// ── Response handling ────────────────────────────────────────────────

/// Decode a successful JSON body, or turn a failure status into an [`Error`].
pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// Accept any 2xx, discarding the body.
pub(crate) async fn expect_success(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

/// Error body shapes:
/// - Dashboard: `{"errors": ["message", ...]}`
/// - Messaging: `{"message": "...", "errors": [{"description": "..."}]}`
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

impl ErrorBody {
    fn summary(self) -> Option<String> {
        let details: Vec<String> = self
            .errors
            .into_iter()
            .filter_map(|e| match e {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Object(map) => map
                    .get("description")
                    .and_then(|d| d.as_str())
                    .map(str::to_owned),
                _ => None,
            })
            .collect();

        if details.is_empty() {
            self.message
        } else {
            Some(details.join("; "))
        }
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::InvalidApiKey;
    }

    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .ok()
        .and_then(ErrorBody::summary)
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw
            }
        });

    if status == StatusCode::FORBIDDEN {
        Error::PermissionDenied { message }
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn next_link_picks_rel_next() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://api.example.com/v1/x?startingAfter=a>; rel=first, \
                 <https://api.example.com/v1/x?startingAfter=b>; rel=next",
            ),
        );
        let next = next_link(&headers).map(|u| u.to_string());
        assert_eq!(
            next.as_deref(),
            Some("https://api.example.com/v1/x?startingAfter=b")
        );
    }

    #[test]
    fn next_link_accepts_quoted_rel() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static("<https://webexapis.com/v1/rooms?cursor=abc>; rel=\"next\""),
        );
        assert!(next_link(&headers).is_some());
    }

    #[test]
    fn next_link_absent_without_next() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static("<https://api.example.com/v1/x>; rel=prev"),
        );
        assert!(next_link(&headers).is_none());
        assert!(next_link(&HeaderMap::new()).is_none());
    }

    #[test]
    fn retry_after_falls_back_to_default() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), 1);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after_secs(&headers), 7);
    }

    #[test]
    fn error_body_prefers_detail_list() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"outer","errors":[{"description":"inner one"},"inner two"]}"#,
        )
        .unwrap();
        assert_eq!(body.summary().as_deref(), Some("inner one; inner two"));

        let body: ErrorBody = serde_json::from_str(r#"{"message":"only message"}"#).unwrap();
        assert_eq!(body.summary().as_deref(), Some("only message"));
    }
}
