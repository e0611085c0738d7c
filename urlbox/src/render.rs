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

//! Urlbox render API support with convenience APIs.

pub use urlbox_render::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a render client from the os environment.
///
/// Credentials come from [`DefaultCredentialProvider`] and the host name
/// from `URLBOX_API_HOST_NAME` when set.
///
/// ```no_run
/// # async fn example() -> urlbox::Result<()> {
/// use urlbox::render::{default_client, Options};
///
/// let client = default_client().await?;
/// let url = client.get_url(&Options::new().url("example.com"))?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub async fn default_client() -> Result<Client> {
    let ctx = default_context();
    let config = Config::new().from_env(&ctx);

    let client = Client::load(ctx, &DefaultCredentialProvider::new()).await?;
    match config.api_host_name.as_deref() {
        None | Some("") => Ok(client),
        Some(host) => Ok(client.with_api_host_name(host)),
    }
}
