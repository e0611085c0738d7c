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

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response};
use log::debug;
use urlbox_core::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};

use crate::constants::*;
use crate::{Config, Credential, Options, RequestSigner};

/// Client for the Urlbox render API.
///
/// Credentials and base url are fixed at construction. Every call copies
/// the given [`Options`] before normalizing them, so callers can reuse an
/// option set across calls.
///
/// | Operation | Request | Auth |
/// |---|---|---|
/// | [`Client::get`] | `GET {base}{api_key}/{format}?{query}` | token in path if a secret is set |
/// | [`Client::get_url`] | `{base}{api_key}/{format}?{query}` | never |
/// | [`Client::head`] | `HEAD {base}{api_key}/{format}?{query}` | never |
/// | [`Client::post`] | `POST {base}render` | `Authorization: Bearer {api_secret}` |
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    credential: Credential,
    base_url: String,
    signer: RequestSigner,
}

impl Client {
    /// Create a client against the default service origin.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self {
            ctx,
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            signer: RequestSigner::new(),
        }
    }

    /// Send requests to `https://{api_host_name}/` instead of the default origin.
    pub fn with_api_host_name(mut self, api_host_name: &str) -> Self {
        self.base_url = format!("https://{api_host_name}/");
        self
    }

    /// Build a client from config.
    ///
    /// Fails with [`urlbox_core::ErrorKind::MissingCredential`] when the config has no api key.
    pub fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::missing_credential("api_key is required"))?;

        let client = Self::new(ctx, Credential::new(api_key, config.api_secret));
        match config.api_host_name.as_deref() {
            None => Ok(client),
            Some("") => Err(Error::config_invalid("api_host_name must not be empty")),
            Some(host) => Ok(client.with_api_host_name(host)),
        }
    }

    /// Build a client with credentials resolved once from `provider`.
    ///
    /// Fails with [`urlbox_core::ErrorKind::MissingCredential`] when the
    /// provider yields nothing or a credential without api key.
    ///
    /// ```no_run
    /// use urlbox_core::{Context, OsEnv};
    /// use urlbox_render::{Client, DefaultCredentialProvider};
    ///
    /// # async fn example() -> urlbox_core::Result<()> {
    /// let ctx = Context::new().with_env(OsEnv);
    /// let client = Client::load(ctx, &DefaultCredentialProvider::new()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(
        ctx: Context,
        provider: &impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let credential = provider
            .provide_credential(&ctx)
            .await?
            .ok_or_else(|| Error::missing_credential("no credential found for render client"))?;
        if !credential.is_valid() {
            return Err(Error::missing_credential(
                "loaded credential has an empty api_key",
            ));
        }
        debug!("loaded credential: {credential:?}");

        Ok(Self::new(ctx, credential))
    }

    /// Base url every request is built on, always ending with `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential of this client.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Build the render url without sending anything.
    ///
    /// The url is always the unauthenticated form, even when an api secret
    /// is configured.
    pub fn get_url(&self, options: &Options) -> Result<String> {
        let options = options.normalize()?;
        Ok(self.render_url(&options))
    }

    /// Render synchronously with a GET request.
    ///
    /// The request is signed when an api secret is configured.
    pub async fn get(&self, options: &Options) -> Result<Response<Bytes>> {
        let options = options.normalize()?;
        let req = Request::get(self.render_url(&options)).body(Bytes::new())?;

        self.send(req).await
    }

    /// Fetch status and headers of a render with a HEAD request.
    ///
    /// HEAD requests are never signed.
    pub async fn head(&self, options: &Options) -> Result<Response<Bytes>> {
        let options = options.normalize()?;
        let req = Request::head(self.render_url(&options)).body(Bytes::new())?;

        self.send(req).await
    }

    /// Start an asynchronous render with a POST request.
    ///
    /// The result is delivered to `webhook_url`, which is required, and so is
    /// the api secret.
    pub async fn post(&self, options: &Options) -> Result<Response<Bytes>> {
        options.ensure_target()?;
        options.ensure_webhook()?;
        if self.credential.secret().is_none() {
            return Err(Error::missing_credential(
                "api_secret is required for POST render requests",
            ));
        }

        let options = options.normalize()?;
        let body = serde_json::to_vec(&options)
            .map_err(|e| Error::unexpected("failed to encode render options").with_source(e))?;

        let req = Request::post(format!("{}{RENDER_ENDPOINT}", self.base_url))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(Bytes::from(body))?;

        self.send(req).await
    }

    fn render_url(&self, options: &Options) -> String {
        format!(
            "{}{}/{}?{}",
            self.base_url,
            self.credential.api_key,
            options.format_segment(),
            options.to_query_string()
        )
    }

    async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer
            .sign_request(&self.ctx, &mut parts, Some(&self.credential))
            .await?;

        debug!(
            "sending render request: {} {}",
            parts.method,
            parts.uri.host().unwrap_or_default()
        );
        let resp = self.ctx.http_send(Request::from_parts(parts, body)).await?;
        debug!("got render response: {}", resp.status());

        Ok(resp)
    }
}
