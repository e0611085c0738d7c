use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use urlbox_core::Context;
use urlbox_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Renders can take a while, give them room
    let client = Client::builder()
        .timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .user_agent("urlbox-example/1.0")
        .build()?;

    println!("Created custom HTTP client with:");
    println!("  - 90 second timeout");
    println!("  - Max 10 idle connections per host");
    println!("  - Custom user agent");

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    // Unsigned HEAD render, the api answers with status and headers only
    let url = "https://api.urlbox.io/v1/demo-api-key/png?url=http%3A%2F%2Fexample.com&format=png";
    println!("\nSending HEAD {url}");

    let req = http::Request::head(url).body(Bytes::new())?;
    match ctx.http_send(req).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            println!("Response headers:");
            for (name, value) in resp.headers() {
                println!("  {name}: {value:?}");
            }
        }
        Err(e) => {
            eprintln!("Request failed: {e}");
        }
    }

    Ok(())
}
