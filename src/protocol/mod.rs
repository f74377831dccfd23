// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the cloud API.
//!
//! The synchronization engine talks to the cloud through the [`Session`]
//! trait: one authenticated connection shared by every adapter and by the
//! event subscription loop. Authentication and token refresh belong to
//! whoever implements the trait.
//!
//! # Implementations
//!
//! - [`HttpSession`] (feature `http`): bearer-authenticated REST client

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpSession};

use std::fmt;
use std::future::Future;

use crate::error::Result;
use crate::model::{Event, Snapshot};

/// HTTP method of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// A command to send through [`Session::authenticated_request`].
///
/// # Examples
///
/// ```
/// use icontrol_bridge::protocol::{Method, Request};
///
/// let request = Request::post("client/icontrol/update/device")
///     .with_field("path", "/devices/7/isOn")
///     .with_field("value", "true");
///
/// assert_eq!(request.method(), Method::Post);
/// assert_eq!(request.field("value"), Some("true"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    form: Vec<(String, String)>,
}

impl Request {
    /// Creates a `POST` request against the given API path.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            form: Vec::new(),
        }
    }

    /// Creates a `GET` request against the given API path.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            form: Vec::new(),
        }
    }

    /// Appends a form field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Returns the method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the API path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns all form fields in insertion order.
    #[must_use]
    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    /// Returns the first form field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An authenticated connection to the cloud API.
///
/// Implementations must tolerate concurrent use: adapters poll and send
/// commands while the subscription loop holds a long-poll open, all through
/// the same session and without external locking.
pub trait Session: Send + Sync + 'static {
    /// Polls a snapshot of every device.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, authentication or payload failures.
    fn current_status(&self) -> impl Future<Output = Result<Snapshot>> + Send;

    /// Sends a command.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    fn authenticated_request(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<serde_json::Value>> + Send;

    /// Waits for the next batch of pushed events.
    ///
    /// Long-poll style: suspends until the server has something to say.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription attempt fails.
    fn subscribe_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// PIN code used in arm and disarm commands.
    fn pin_code(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fields_keep_order() {
        let request = Request::post("client/icontrol/panel/arm")
            .with_field("code", "1234")
            .with_field("armType", "away");

        assert_eq!(request.path(), "client/icontrol/panel/arm");
        assert_eq!(
            request.form(),
            &[
                ("code".to_string(), "1234".to_string()),
                ("armType".to_string(), "away".to_string())
            ]
        );
        assert_eq!(request.field("missing"), None);
    }

    #[test]
    fn method_display() {
        assert_eq!(Request::get("x").method().to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
