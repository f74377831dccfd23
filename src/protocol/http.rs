// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP session for the iControl cloud API.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::{ParseError, ProtocolError, Result};
use crate::model::{Event, Snapshot};
use crate::protocol::{Method, Request, Session};

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for an [`HttpSession`].
///
/// The access token comes from whatever performs the login; this crate does
/// not manage credentials.
///
/// # Examples
///
/// ```
/// use icontrol_bridge::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("https://portal.example.com/")
///     .with_access_token("token")
///     .with_pin_code("1234")
///     .with_timeout(Duration::from_secs(45));
///
/// assert_eq!(config.url("client/icontrol/panel/arm"),
///            "https://portal.example.com/client/icontrol/panel/arm");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    access_token: Option<String>,
    pin_code: String,
    timeout: Duration,
    status_path: String,
    events_path: String,
}

impl HttpConfig {
    /// Default request timeout. Longer than a typical long-poll.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default path of the status snapshot endpoint.
    pub const DEFAULT_STATUS_PATH: &'static str = "client/icontrol/overview";
    /// Default path of the event long-poll endpoint.
    pub const DEFAULT_EVENTS_PATH: &'static str = "client/icontrol/events";

    /// Creates a configuration for the given portal URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            pin_code: String::new(),
            timeout: Self::DEFAULT_TIMEOUT,
            status_path: Self::DEFAULT_STATUS_PATH.to_string(),
            events_path: Self::DEFAULT_EVENTS_PATH.to_string(),
        }
    }

    /// Sets the bearer token sent with every request.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the PIN code used for arm and disarm commands.
    #[must_use]
    pub fn with_pin_code(mut self, pin: impl Into<String>) -> Self {
        self.pin_code = pin.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the status snapshot path.
    #[must_use]
    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = path.into();
        self
    }

    /// Overrides the event long-poll path.
    #[must_use]
    pub fn with_events_path(mut self, path: impl Into<String>) -> Self {
        self.events_path = path.into();
        self
    }

    /// Returns the portal URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the PIN code.
    #[must_use]
    pub fn pin_code(&self) -> &str {
        &self.pin_code
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins an API path onto the portal URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Creates an [`HttpSession`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the URL has no http(s) scheme or the HTTP client
    /// cannot be created.
    pub fn into_session(self) -> std::result::Result<HttpSession, ProtocolError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpSession {
            config: self,
            client,
        })
    }
}

// ============================================================================
// HttpSession - Session over reqwest
// ============================================================================

/// [`Session`] implementation over HTTPS.
///
/// `reqwest::Client` pools connections internally and is safe to share, so
/// one session serves every adapter and the subscription loop at once.
#[derive(Debug, Clone)]
pub struct HttpSession {
    config: HttpConfig,
    client: Client,
}

impl HttpSession {
    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn send(&self, request: &Request) -> std::result::Result<String, ProtocolError> {
        let url = self.config.url(request.path());

        tracing::debug!(method = %request.method(), url = %url, "Sending HTTP request");

        let mut builder = match request.method() {
            Method::Get => self.client.get(&url).query(request.form()),
            Method::Post => self.client.post(&url).form(request.form()),
        };
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(ProtocolError::Http)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !status.is_success() {
            return Err(ProtocolError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::trace!(body = %body, "Received HTTP response");

        Ok(body)
    }
}

impl Session for HttpSession {
    async fn current_status(&self) -> Result<Snapshot> {
        let body = self.send(&Request::get(&self.config.status_path)).await?;
        let snapshot = serde_json::from_str(&body).map_err(ParseError::Json)?;
        Ok(snapshot)
    }

    async fn authenticated_request(&self, request: Request) -> Result<serde_json::Value> {
        let body = self.send(&request).await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body).map_err(ParseError::Json)?)
    }

    async fn subscribe_events(&self) -> Result<Vec<Event>> {
        let body = self.send(&Request::get(&self.config.events_path)).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(ParseError::Json)?;
        Ok(Event::from_batch(batch))
    }

    fn pin_code(&self) -> &str {
        self.config.pin_code()
    }
}
