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

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use log::debug;
use percent_encoding::utf8_percent_encode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::{Host, Url};
use urlbox_core::{Error, Result};

use crate::constants::*;

/// Output formats known to the render service.
///
/// Options are not limited to these: [`Options::insert`] accepts any string
/// under `format` and the client passes it through untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `png`, the default.
    #[default]
    Png,
    /// `jpg`
    Jpg,
    /// `jpeg`
    Jpeg,
    /// `avif`
    Avif,
    /// `webp`
    Webp,
    /// `pdf`
    Pdf,
    /// `svg`
    Svg,
    /// `html`
    Html,
}

impl Format {
    /// Get the wire name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpg => "jpg",
            Format::Jpeg => "jpeg",
            Format::Avif => "avif",
            Format::Webp => "webp",
            Format::Pdf => "pdf",
            Format::Svg => "svg",
            Format::Html => "html",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "png" => Ok(Format::Png),
            "jpg" => Ok(Format::Jpg),
            "jpeg" => Ok(Format::Jpeg),
            "avif" => Ok(Format::Avif),
            "webp" => Ok(Format::Webp),
            "pdf" => Ok(Format::Pdf),
            "svg" => Ok(Format::Svg),
            "html" => Ok(Format::Html),
            v => Err(Error::request_invalid(format!("unknown render format: {v}"))),
        }
    }
}

impl From<Format> for Value {
    fn from(v: Format) -> Self {
        Value::String(v.as_str().to_string())
    }
}

/// Options of a single render request.
///
/// A weakly-typed, insertion-ordered map of option names to JSON scalars.
/// The remote API evolves independently of this client, so any key is
/// accepted and passed through; typed setters exist only for the keys the
/// client reads itself.
///
/// ```
/// use urlbox_render::{Format, Options};
///
/// let options = Options::new()
///     .url("example.com")
///     .format(Format::Pdf)
///     .full_page(true)
///     .with("block_ads", true);
///
/// assert_eq!(options.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set the url to render.
    pub fn url(self, url: impl Into<String>) -> Self {
        self.with(KEY_URL, url.into())
    }

    /// Set the raw html to render.
    pub fn html(self, html: impl Into<String>) -> Self {
        self.with(KEY_HTML, html.into())
    }

    /// Set the output format.
    pub fn format(self, format: Format) -> Self {
        self.with(KEY_FORMAT, format)
    }

    /// Capture the full scrollable page instead of the viewport.
    pub fn full_page(self, full_page: bool) -> Self {
        self.with(KEY_FULL_PAGE, full_page)
    }

    /// Set the viewport width in pixels.
    pub fn width(self, width: u32) -> Self {
        self.with(KEY_WIDTH, width)
    }

    /// Set the url the service delivers asynchronous renders to.
    pub fn webhook_url(self, webhook_url: impl Into<String>) -> Self {
        self.with(KEY_WEBHOOK_URL, webhook_url.into())
    }

    /// Insert an option, returning the previous value.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove an option.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Check whether an option is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no option is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Encode options as an `application/x-www-form-urlencoded` query string.
    ///
    /// Keys keep their insertion order. Strings are used as-is, numbers use
    /// their JSON form, booleans become `True`/`False`, `null` becomes `None`
    /// and nested values are encoded as compact JSON. Spaces are written as
    /// `+`, every other byte outside `A-Z a-z 0-9 - . _ ~` is percent-encoded.
    ///
    /// ```
    /// use urlbox_render::Options;
    ///
    /// let options = Options::new()
    ///     .url("http://example.com/~user")
    ///     .full_page(true)
    ///     .with("custom", "a*b c");
    ///
    /// assert_eq!(
    ///     options.to_query_string(),
    ///     "url=http%3A%2F%2Fexample.com%2F~user&full_page=True&custom=a%2Ab+c"
    /// );
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut s = String::new();
        for (k, v) in &self.0 {
            if !s.is_empty() {
                s.push('&');
            }
            s.push_str(&query_encode(k));
            s.push('=');
            s.push_str(&query_encode(&value_to_string(v)));
        }
        s
    }

    /// Check that options name something to render.
    pub(crate) fn ensure_target(&self) -> Result<()> {
        if self.contains_key(KEY_URL) || self.contains_key(KEY_HTML) {
            return Ok(());
        }
        Err(Error::missing_target(
            "options must contain either 'url' or 'html'",
        ))
    }

    /// Check that an asynchronous render has somewhere to deliver the result.
    pub(crate) fn ensure_webhook(&self) -> Result<()> {
        if self.contains_key(KEY_WEBHOOK_URL) {
            return Ok(());
        }
        Err(Error::missing_webhook("options must contain 'webhook_url'"))
    }

    /// Copy and normalize options for sending.
    ///
    /// - fails if neither `url` nor `html` is set
    /// - trims `url`, prefixes it with `http://` unless it starts with `http`,
    ///   and rejects it if it is not a well-formed url
    /// - sets `format` to `png` if absent
    pub(crate) fn normalize(&self) -> Result<Options> {
        self.ensure_target()?;

        let mut options = self.clone();
        if let Some(v) = options.get(KEY_URL) {
            let url = normalize_url(v)?;
            options.insert(KEY_URL, url);
        }
        if !options.contains_key(KEY_FORMAT) {
            options.insert(KEY_FORMAT, DEFAULT_FORMAT);
        }

        Ok(options)
    }

    /// Format as it appears in the request path, encoded as a single segment.
    ///
    /// Only meaningful on normalized options, which always carry a format.
    pub(crate) fn format_segment(&self) -> String {
        let format = self
            .get(KEY_FORMAT)
            .map(value_to_string)
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        utf8_percent_encode(&format, &URI_ENCODE_SET).to_string()
    }
}

impl From<Map<String, Value>> for Options {
    fn from(v: Map<String, Value>) -> Self {
        Self(v)
    }
}

impl From<Options> for Map<String, Value> {
    fn from(v: Options) -> Self {
        v.0
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl TryFrom<Value> for Options {
    type Error = Error;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::Object(map) => Ok(Self(map)),
            v => Err(Error::request_invalid(format!(
                "render options must be a json object, got: {v}"
            ))),
        }
    }
}

/// Stringify an option value for the query string.
pub(crate) fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        v => v.to_string(),
    }
}

/// Percent-encode a query key or value, writing spaces as `+`.
fn query_encode(s: &str) -> String {
    s.split(' ')
        .map(|part| utf8_percent_encode(part, &URI_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

fn normalize_url(v: &Value) -> Result<String> {
    let Value::String(raw) = v else {
        return Err(Error::invalid_url(value_to_string(v)));
    };

    let url = prepend_scheme(raw.trim());
    if !is_valid_url(&url) {
        return Err(Error::invalid_url(url));
    }

    debug!("normalized target url: {raw:?} -> {url:?}");
    Ok(url)
}

/// Prefix with `http://` unless the string already starts with `http`.
///
/// The check is a plain prefix match, so `httpbin.org` is left as-is.
fn prepend_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// A target is well formed when it parses as an absolute http(s) url whose
/// host is an ip address, `localhost`, or a domain with a top-level label.
fn is_valid_url(url: &str) -> bool {
    let Ok(u) = Url::parse(url) else {
        return false;
    };
    if !matches!(u.scheme(), "http" | "https") {
        return false;
    }

    match u.host() {
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        None => false,
    }
}

/// `example.com` and `xn--bcher-kva.xn--p1ai` pass, `example` and `example.1` don't.
fn is_valid_domain(domain: &str) -> bool {
    if domain == "localhost" {
        return true;
    }

    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !name.is_empty()
        && (tld.starts_with("xn--")
            || (tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;
    use urlbox_core::ErrorKind;

    #[test_case("example.com", "http://example.com"; "no scheme")]
    #[test_case("  example.com\n", "http://example.com"; "surrounding whitespace")]
    #[test_case("http://example.com", "http://example.com"; "http")]
    #[test_case("https://example.com/a?b=c", "https://example.com/a?b=c"; "https with path")]
    #[test_case("www.example.com/page", "http://www.example.com/page"; "path without scheme")]
    #[test_case("localhost:3000", "http://localhost:3000"; "localhost")]
    #[test_case("127.0.0.1:8080/a", "http://127.0.0.1:8080/a"; "ipv4")]
    #[test_case("http://[::1]/", "http://[::1]/"; "ipv6")]
    #[test_case("bücher.example", "http://bücher.example"; "idn")]
    fn test_normalize_url(input: &str, expected: &str) {
        let options = Options::new().url(input).normalize().unwrap();
        assert_eq!(options.get(KEY_URL), Some(&json!(expected)));
    }

    #[test_case("not a url", "http://not a url"; "spaces")]
    #[test_case("", "http://"; "empty")]
    #[test_case("httpbin.org", "httpbin.org"; "http prefix without scheme")]
    #[test_case("http//example.com", "http//example.com"; "broken scheme")]
    #[test_case("example", "http://example"; "single label")]
    #[test_case("http://example/page", "http://example/page"; "single label with path")]
    #[test_case("http://example.1", "http://example.1"; "numeric tld")]
    fn test_normalize_invalid_url(input: &str, offending: &str) {
        let err = Options::new().url(input).normalize().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert_eq!(err.url(), Some(offending));
    }

    #[test]
    fn test_normalize_non_string_url() {
        let err = Options::new().with("url", 42).normalize().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert_eq!(err.url(), Some("42"));
    }

    #[test]
    fn test_normalize_missing_target() {
        let err = Options::new()
            .format(Format::Png)
            .normalize()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingTarget);
    }

    #[test]
    fn test_normalize_html_only() {
        let options = Options::new().html("<h1>hi</h1>").normalize().unwrap();
        assert_eq!(
            options.to_query_string(),
            "html=%3Ch1%3Ehi%3C%2Fh1%3E&format=png"
        );
    }

    #[test]
    fn test_normalize_accepts_both_targets() {
        let options = Options::new()
            .url("example.com")
            .html("<p></p>")
            .normalize()
            .unwrap();
        assert!(options.contains_key(KEY_URL));
        assert!(options.contains_key(KEY_HTML));
    }

    #[test]
    fn test_normalize_keeps_format_and_position() {
        let options = Options::new()
            .format(Format::Jpeg)
            .url("example.com")
            .normalize()
            .unwrap();

        assert_eq!(
            options.to_query_string(),
            "format=jpeg&url=http%3A%2F%2Fexample.com"
        );
        assert_eq!(options.format_segment(), "jpeg");
    }

    #[test]
    fn test_normalize_does_not_touch_input() {
        let input = Options::new().url("  example.com ");
        let normalized = input.normalize().unwrap();

        assert_eq!(input.get(KEY_URL), Some(&json!("  example.com ")));
        assert!(!input.contains_key(KEY_FORMAT));
        assert_eq!(normalized.get(KEY_FORMAT), Some(&json!("png")));
    }

    #[test]
    fn test_query_string_value_forms() {
        let options = Options::new()
            .url("http://example.com")
            .full_page(true)
            .width(300)
            .with("quality", 0.8)
            .with("selector", Value::Null)
            .with("custom_words", "a b&c")
            .with("hide_selectors", json!([".ad", "#cookie"]));

        assert_eq!(
            options.to_query_string(),
            "url=http%3A%2F%2Fexample.com&full_page=True&width=300&quality=0.8&selector=None\
             &custom_words=a+b%26c&hide_selectors=%5B%22.ad%22%2C%22%23cookie%22%5D"
        );
    }

    #[test]
    fn test_query_string_matches_urlencode() {
        let options = Options::new()
            .url("http://example.com/~user")
            .full_page(true)
            .with("selector", Value::Null)
            .with("custom", "a*b")
            .with("block_ads", false)
            .with("caption", "café")
            .format(Format::Png);

        assert_eq!(
            options.to_query_string(),
            "url=http%3A%2F%2Fexample.com%2F~user&full_page=True&selector=None&custom=a%2Ab\
             &block_ads=False&caption=caf%C3%A9&format=png"
        );
    }

    #[test_case("png", "png"; "plain")]
    #[test_case("png/x", "png%2Fx"; "slash")]
    #[test_case("pdf?a=b", "pdf%3Fa%3Db"; "query chars")]
    fn test_format_segment_is_one_segment(format: &str, expected: &str) {
        let options = Options::new().with(KEY_FORMAT, format);
        assert_eq!(options.format_segment(), expected);
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut options = Options::new().url("a.com").width(100);
        let prev = options.insert("url", "b.com");

        assert_eq!(prev, Some(json!("a.com")));
        assert_eq!(options.to_query_string(), "url=b.com&width=100");
    }

    #[test]
    fn test_try_from_value() {
        let options = Options::try_from(json!({"url": "example.com", "width": 1280})).unwrap();
        assert_eq!(options.len(), 2);

        let err = Options::try_from(json!(["url"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_from_iter() {
        let options: Options = [("url", "example.com"), ("format", "webp")]
            .into_iter()
            .collect();
        assert_eq!(options.to_query_string(), "url=example.com&format=webp");
    }

    #[test_case("png", Format::Png)]
    #[test_case("jpg", Format::Jpg)]
    #[test_case("avif", Format::Avif)]
    #[test_case("html", Format::Html)]
    fn test_format_from_str(input: &str, expected: Format) {
        assert_eq!(input.parse::<Format>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_format_unknown() {
        assert!("gif".parse::<Format>().is_err());
        assert_eq!(Format::default(), Format::Png);
    }
}
