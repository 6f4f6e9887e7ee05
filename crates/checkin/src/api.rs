//! HTTP client for the YUP server endpoints the check-in desk uses.
//!
//! Wraps `POST /reservation/checkQrCode` and `GET /event/api/geo/all`
//! using [`reqwest`]. Requests carry the organiser's `JWT` cookie when a
//! token is configured.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use serde::Serialize;
use yup_core::checkin::{CheckInCode, CheckInOutcome};
use yup_core::event_card::EventFeatureCollection;
use yup_core::types::EventId;

use crate::config::CheckInConfig;

/// Name of the cookie the server reads the organiser token from.
const AUTH_COOKIE_NAME: &str = "JWT";

/// Errors from the check-in HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CheckInApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("YUP server error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Submits a check-in code and reports the server's decision.
#[async_trait]
pub trait CheckInTransport: Send + Sync {
    async fn check_qr_code(
        &self,
        code: &CheckInCode,
        event_id: EventId,
    ) -> Result<CheckInOutcome, CheckInApiError>;
}

/// Request body of `POST /reservation/checkQrCode`.
#[derive(Debug, Serialize)]
struct CheckQrCodeBody<'a> {
    message: &'a CheckInCode,
    #[serde(rename = "eventID")]
    event_id: EventId,
}

/// HTTP client for one YUP server.
pub struct CheckInApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl CheckInApi {
    /// Build a client with the configured timeout.
    pub fn new(config: &CheckInConfig) -> Result<Self, CheckInApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.auth_token.clone(),
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, auth_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            auth_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every published event as a GeoJSON feature collection.
    pub async fn fetch_event_features(&self) -> Result<EventFeatureCollection, CheckInApiError> {
        let request = self
            .authorize(self.client.get(format!("{}/event/api/geo/all", self.base_url)));
        let response = Self::ensure_success(request.send().await?).await?;

        let collection = response.json::<EventFeatureCollection>().await?;
        tracing::debug!(count = collection.features.len(), "Fetched event features");
        Ok(collection)
    }

    // ---- private helpers ----

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(COOKIE, format!("{AUTH_COOKIE_NAME}={token}")),
            None => request,
        }
    }

    /// Return the response unchanged on a 2xx status, otherwise an
    /// [`CheckInApiError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CheckInApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CheckInApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CheckInTransport for CheckInApi {
    async fn check_qr_code(
        &self,
        code: &CheckInCode,
        event_id: EventId,
    ) -> Result<CheckInOutcome, CheckInApiError> {
        let body = CheckQrCodeBody {
            message: code,
            event_id,
        };

        let request = self
            .authorize(self.client.post(format!("{}/reservation/checkQrCode", self.base_url)))
            .json(&body);
        let response = Self::ensure_success(request.send().await?).await?;

        let text = response.text().await?;
        let outcome = CheckInOutcome::from_response_body(&text);
        if outcome == CheckInOutcome::UnknownError {
            tracing::warn!(%code, body = %text, "Unmapped check-in response");
        }
        Ok(outcome)
    }
}
