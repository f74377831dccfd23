// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! The hierarchy mirrors the failure classes the synchronization engine
//! distinguishes: value validation, transport failures talking to the cloud
//! API, payloads that do not look the way we expect, and device-level
//! problems such as a missing control link.
//!
//! None of these escalate to process termination. Getter polls, setter
//! commands and event fan-out log them and carry on; only explicit calls such
//! as [`Bridge::start`](crate::Bridge::start) hand them back to the caller.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred talking to the cloud API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while interpreting a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during a device operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A value had the wrong JSON type.
    #[error("expected {expected} for {field}")]
    WrongType {
        /// The field being read.
        field: String,
        /// Description of the expected type.
        expected: &'static str,
    },
}

/// Transport failures: network, authentication and HTTP status problems.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the cloud API failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed or the session expired.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

/// Payloads that do not match the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device carries no link for the requested control.
    #[error("device {device} has no {link} link")]
    MissingLink {
        /// Display name of the device.
        device: String,
        /// Name of the missing link.
        link: &'static str,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_protocol_error() {
        let err: Error = ProtocolError::AuthenticationFailed.into();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::AuthenticationFailed)
        ));
    }

    #[test]
    fn missing_link_display() {
        let err = DeviceError::MissingLink {
            device: "Kitchen".to_string(),
            link: "level",
        };
        assert_eq!(err.to_string(), "device Kitchen has no level link");
    }

    #[test]
    fn parse_error_display() {
        let err: ParseError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
