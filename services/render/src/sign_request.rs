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

//! Urlbox request authentication.

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::uri::PathAndQuery;
use http::{HeaderValue, Method, Uri};
use log::debug;
use urlbox_core::hash::hex_hmac_sha1;
use urlbox_core::utils::Redact;
use urlbox_core::{Context, Error, Result, SignRequest};

use crate::Credential;

/// RequestSigner that implements Urlbox request authentication.
///
/// - `GET`: when a secret is configured, the token
///   `hex(HMAC-SHA1(api_secret, query))` is inserted as the path segment
///   right before the format, turning `/{api_key}/{format}` into
///   `/{api_key}/{token}/{format}`. Without a secret the request is left
///   unsigned.
/// - `POST`: the secret is sent as `Authorization: Bearer {api_secret}`. A
///   secret is mandatory.
/// - Any other method is left untouched.
#[derive(Debug, Default, Clone)]
pub struct RequestSigner {}

impl RequestSigner {
    /// Create a new RequestSigner.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let secret = credential.and_then(|c| c.secret());

        match req.method {
            Method::GET => {
                let Some(secret) = secret else {
                    debug!("no api secret configured, sending unsigned request");
                    return Ok(());
                };
                req.uri = sign_uri(&req.uri, secret)?;
            }
            Method::POST => {
                let secret = secret.ok_or_else(|| {
                    Error::missing_credential("api_secret is required for POST render requests")
                })?;

                let mut value = HeaderValue::try_from(format!("Bearer {secret}"))?;
                value.set_sensitive(true);
                req.headers.insert(AUTHORIZATION, value);
            }
            _ => {}
        }

        Ok(())
    }
}

/// Compute the request token for a url-encoded query string.
///
/// The token is deterministic: the same query and secret always give the same token.
pub fn token(api_secret: &str, query: &str) -> String {
    hex_hmac_sha1(api_secret.as_bytes(), query.as_bytes())
}

/// Insert the token of the uri's query right before the last path segment.
///
/// The last segment is the format. The client percent-encodes it as a single
/// segment, so it never contains `/`.
fn sign_uri(uri: &Uri, secret: &str) -> Result<Uri> {
    let query = uri.query().unwrap_or_default();
    debug!(
        "string to sign: {query}, api_secret: {:?}",
        Redact::from(secret)
    );
    let token = token(secret, query);

    let path = uri.path();
    let (dir, format) = path.rsplit_once('/').ok_or_else(|| {
        Error::request_invalid(format!("render path has no format segment: {path}"))
    })?;
    let paq = if query.is_empty() {
        format!("{dir}/{token}/{format}")
    } else {
        format!("{dir}/{token}/{format}?{query}")
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(paq)?);
    Ok(Uri::from_parts(parts)?)
}
