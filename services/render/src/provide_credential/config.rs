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

use async_trait::async_trait;
use log::debug;
use urlbox_core::{Context, ProvideCredential, Result};

use crate::{Config, Credential};

/// ConfigCredentialProvider provides credentials from a [`Config`].
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Config,
}

impl ConfigCredentialProvider {
    /// Create a new ConfigCredentialProvider
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        match &self.config.api_key {
            Some(api_key) if !api_key.is_empty() => {
                debug!("loading credential from config");
                Ok(Some(Credential::new(
                    api_key.clone(),
                    self.config.api_secret.clone(),
                )))
            }
            _ => {
                debug!("config has no api_key, skipping");
                Ok(None)
            }
        }
    }
}
