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

use std::fmt::{Debug, Formatter};

use urlbox_core::{utils::Redact, SigningCredential};

/// Credential for the render API.
///
/// Only a missing `api_secret` disables signing. `Some("")` is a configured
/// secret: GET requests are signed with an empty HMAC key and POST requests
/// carry `Authorization: Bearer `.
#[derive(Clone, Default)]
pub struct Credential {
    /// Api key, identifies the account. Part of every request path.
    pub api_key: String,
    /// Api secret, used to sign GET requests and as the bearer token of POST requests.
    pub api_secret: Option<String>,
}

impl Credential {
    /// Create a new credential.
    pub fn new(api_key: impl Into<String>, api_secret: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
        }
    }

    /// Configured secret, if any.
    pub(crate) fn secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("api_secret", &Redact::from(&self.api_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty()
    }
}
