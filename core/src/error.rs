// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for urlbox operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    url: Option<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Neither `url` nor `html` was given in the render options
    MissingTarget,

    /// The target url is not a well-formed url after normalization
    InvalidUrl,

    /// An asynchronous render was requested without `webhook_url`
    MissingWebhook,

    /// The operation needs a credential (api key or api secret) that was not configured
    MissingCredential,

    /// Request cannot be built (invalid uri, header value, etc.)
    RequestInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (network, I/O, encoding, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            url: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the offending url carried by an [`ErrorKind::InvalidUrl`] error.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Check if this error was raised while validating render options.
    ///
    /// Validation errors are always returned before any request is sent.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MissingTarget
                | ErrorKind::InvalidUrl
                | ErrorKind::MissingWebhook
                | ErrorKind::MissingCredential
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a missing target error
    pub fn missing_target(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingTarget, message)
    }

    /// Create an invalid url error that carries the offending url
    pub fn invalid_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let mut err = Self::new(ErrorKind::InvalidUrl, format!("'{url}' is not a valid url"));
        err.url = Some(url);
        err
    }

    /// Create a missing webhook error
    pub fn missing_webhook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingWebhook, message)
    }

    /// Create a missing credential error
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredential, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingTarget => write!(f, "missing render target"),
            ErrorKind::InvalidUrl => write!(f, "invalid url"),
            ErrorKind::MissingWebhook => write!(f, "missing webhook url"),
            ErrorKind::MissingCredential => write!(f, "missing credential"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
