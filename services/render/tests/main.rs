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

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use urlbox_core::{Context, Error, ErrorKind, HttpSend, Result};
use urlbox_render::{token, Client, Credential, Format, Options};

/// HttpSend that records every request and answers with a fixed status.
#[derive(Debug, Clone)]
struct RecordingHttpSend {
    status: StatusCode,
    fail: bool,
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl RecordingHttpSend {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            fail: false,
            requests: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(StatusCode::OK)
        }
    }

    fn requests(&self) -> Vec<http::Request<Bytes>> {
        self.requests.lock().unwrap().drain(..).collect()
    }
}

#[async_trait]
impl HttpSend for RecordingHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        if self.fail {
            return Err(Error::unexpected("failed to send http request")
                .with_source(anyhow::anyhow!("connection reset by peer")));
        }

        Ok(http::Response::builder()
            .status(self.status)
            .header(CONTENT_TYPE, "image/png")
            .body(Bytes::from_static(b"\x89PNG"))?)
    }
}

fn init_client(secret: Option<&str>, http: RecordingHttpSend) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(http);
    Client::new(ctx, Credential::new("K", secret.map(|v| v.to_string())))
}

fn example_options() -> Options {
    Options::new().url("http://example.com").format(Format::Png)
}

#[tokio::test]
async fn test_get_unauthenticated() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(None, http.clone());

    let resp = client.get(&example_options()).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), b"\x89PNG");

    let reqs = http.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method(), Method::GET);
    assert_eq!(
        reqs[0].uri().to_string(),
        "https://api.urlbox.io/v1/K/png?url=http%3A%2F%2Fexample.com&format=png"
    );
    assert!(reqs[0].body().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_authenticated() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone());

    client.get(&example_options()).await?;
    client.get(&example_options()).await?;

    let reqs = http.requests();
    assert_eq!(reqs.len(), 2);
    let expected = "https://api.urlbox.io/v1/K/8e65067c743a7f92bf6e9b96e27e8de35efa5490/png?url=http%3A%2F%2Fexample.com&format=png";
    assert_eq!(reqs[0].uri().to_string(), expected);
    // Same input and secret, same token.
    assert_eq!(reqs[1].uri().to_string(), expected);
    assert!(reqs[0].headers().get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_get_token_matches_query() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone());

    let options = Options::new()
        .url(" www.example.com/pricing ")
        .full_page(true)
        .width(1280)
        .with("hide_cookie_banners", true);
    client.get(&options).await?;

    let reqs = http.requests();
    let uri = reqs[0].uri();
    let query = uri.query().unwrap();
    assert_eq!(
        query,
        "url=http%3A%2F%2Fwww.example.com%2Fpricing&full_page=True&width=1280&hide_cookie_banners=True&format=png"
    );
    assert_eq!(uri.path(), format!("/v1/K/{}/png", token("S", query)));
    Ok(())
}

#[tokio::test]
async fn test_get_query_encoding() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone());

    let options = Options::new()
        .url("http://example.com/~user")
        .full_page(true)
        .with("selector", serde_json::Value::Null)
        .with("custom", "a*b");

    let query = "url=http%3A%2F%2Fexample.com%2F~user&full_page=True&selector=None&custom=a%2Ab&format=png";
    assert_eq!(
        client.get_url(&options)?,
        format!("https://api.urlbox.io/v1/K/png?{query}")
    );

    client.get(&options).await?;
    let reqs = http.requests();
    assert_eq!(
        reqs[0].uri().to_string(),
        format!("https://api.urlbox.io/v1/K/334fb79621f35ed41256a9184acd1999f136880b/png?{query}")
    );
    Ok(())
}

#[tokio::test]
async fn test_get_format_stays_one_segment() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone());

    let options = Options::new()
        .url("http://example.com")
        .with("format", "png/x");
    client.get(&options).await?;

    let reqs = http.requests();
    let uri = reqs[0].uri();
    assert_eq!(
        uri.path(),
        "/v1/K/403414f7f58932cf769ffbcbd2b31906ec38bf89/png%2Fx"
    );
    assert_eq!(uri.query(), Some("url=http%3A%2F%2Fexample.com&format=png%2Fx"));
    Ok(())
}

#[tokio::test]
async fn test_get_does_not_mutate_options() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(None, http.clone());

    let options = Options::new().url("  example.com  ");
    client.get(&options).await?;

    assert_eq!(options.get("url"), Some(&json!("  example.com  ")));
    assert!(options.get("format").is_none());
    Ok(())
}

#[tokio::test]
async fn test_validation_happens_before_io() {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone());

    let err = client.get(&Options::new().width(300)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTarget);
    let err = client.head(&Options::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTarget);
    let err = client.post(&Options::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTarget);

    let err = client
        .get(&Options::new().url("not a url"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);
    assert_eq!(err.url(), Some("http://not a url"));

    let err = client
        .post(&Options::new().url("not a url").webhook_url("https://hook.example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);

    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_head_is_never_signed() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone());

    client.head(&example_options()).await?;

    let reqs = http.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method(), Method::HEAD);
    assert_eq!(
        reqs[0].uri().to_string(),
        "https://api.urlbox.io/v1/K/png?url=http%3A%2F%2Fexample.com&format=png"
    );
    assert!(reqs[0].headers().get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_post() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::CREATED);
    let client = init_client(Some("S"), http.clone());

    let options = Options::new()
        .url("example.com")
        .webhook_url("https://hook.example.com/urlbox")
        .full_page(true)
        .width(300);
    let resp = client.post(&options).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let reqs = http.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method(), Method::POST);
    assert_eq!(req.uri().to_string(), "https://api.urlbox.io/v1/render");
    assert_eq!(req.headers()[AUTHORIZATION], "Bearer S");
    assert_eq!(req.headers()[CONTENT_TYPE], "application/json");

    let body: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
    assert_eq!(
        body,
        json!({
            "url": "http://example.com",
            "webhook_url": "https://hook.example.com/urlbox",
            "full_page": true,
            "width": 300,
            "format": "png",
        })
    );
    // Key order follows the options.
    assert_eq!(
        std::str::from_utf8(req.body()).unwrap(),
        r#"{"url":"http://example.com","webhook_url":"https://hook.example.com/urlbox","full_page":true,"width":300,"format":"png"}"#
    );
    Ok(())
}

#[tokio::test]
async fn test_post_with_host_name() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::OK);
    let client = init_client(Some("S"), http.clone()).with_api_host_name("api-eu.urlbox.io");

    client
        .post(
            &Options::new()
                .html("<h1>Invoice</h1>")
                .format(Format::Pdf)
                .webhook_url("https://hook.example.com"),
        )
        .await?;

    let reqs = http.requests();
    assert_eq!(reqs[0].uri().to_string(), "https://api-eu.urlbox.io/render");
    Ok(())
}

#[tokio::test]
async fn test_post_requires_webhook_and_secret() {
    let http = RecordingHttpSend::new(StatusCode::OK);

    let client = init_client(Some("S"), http.clone());
    let err = client
        .post(&Options::new().url("example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingWebhook);

    let client = init_client(None, http.clone());
    let err = client
        .post(
            &Options::new()
                .url("example.com")
                .webhook_url("https://hook.example.com"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredential);

    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_status_is_not_interpreted() -> Result<()> {
    let http = RecordingHttpSend::new(StatusCode::UNAUTHORIZED);
    let client = init_client(Some("wrong"), http.clone());

    let resp = client.get(&example_options()).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_transport_error_is_passed_through() {
    let http = RecordingHttpSend::failing();
    let client = init_client(None, http.clone());

    let err = client.get(&example_options()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(
        std::error::Error::source(&err).map(|e| e.to_string()),
        Some("connection reset by peer".to_string())
    );
    assert_eq!(http.requests().len(), 1);
}
