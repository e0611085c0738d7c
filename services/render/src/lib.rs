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

//! Urlbox render API client.
//!
//! Builds render urls, signs them, and sends GET, HEAD and POST render
//! requests through the [`urlbox_core::HttpSend`] configured on the context.
//!
//! ## Example
//!
//! ```no_run
//! use urlbox_core::Context;
//! use urlbox_http_send_reqwest::ReqwestHttpSend;
//! use urlbox_render::{Client, Credential, Format, Options};
//!
//! # async fn example() -> urlbox_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let client = Client::new(ctx, Credential::new("api_key", Some("api_secret".to_string())));
//!
//! let options = Options::new()
//!     .url("example.com")
//!     .format(Format::Png)
//!     .full_page(true);
//!
//! // Unauthenticated url, nothing is sent.
//! let url = client.get_url(&options)?;
//!
//! // Signed GET request.
//! let resp = client.get(&options).await?;
//! println!("{url} -> {}", resp.status());
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::DEFAULT_BASE_URL;
pub use constants::DEFAULT_FORMAT;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod options;
pub use options::{Format, Options};

mod sign_request;
pub use sign_request::{token, RequestSigner};

mod client;
pub use client::Client;

mod provide_credential;
pub use provide_credential::*;
