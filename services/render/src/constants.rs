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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Default origin of the render service.
pub const DEFAULT_BASE_URL: &str = "https://api.urlbox.io/v1/";
/// Endpoint of asynchronous renders, relative to the base url.
pub const RENDER_ENDPOINT: &str = "render";
/// Format used when the options carry none.
pub const DEFAULT_FORMAT: &str = "png";

// Env values used in urlbox
pub const URLBOX_API_KEY: &str = "URLBOX_API_KEY";
pub const URLBOX_API_SECRET: &str = "URLBOX_API_SECRET";
pub const URLBOX_API_HOST_NAME: &str = "URLBOX_API_HOST_NAME";

// Option keys the client itself reads.
pub const KEY_URL: &str = "url";
pub const KEY_HTML: &str = "html";
pub const KEY_FORMAT: &str = "format";
pub const KEY_WEBHOOK_URL: &str = "webhook_url";
pub const KEY_FULL_PAGE: &str = "full_page";
pub const KEY_WIDTH: &str = "width";

/// AsciiSet for option keys, option values and the format path segment.
///
/// Encode every byte except the unreserved characters: `A-Z`, `a-z`, `0-9`,
/// `-`, `.`, `_` and `~`. The query encoder writes spaces as `+` itself.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
