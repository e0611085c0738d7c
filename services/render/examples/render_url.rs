use anyhow::Result;
use log::info;
use urlbox_core::{Context, OsEnv};
use urlbox_http_send_reqwest::ReqwestHttpSend;
use urlbox_render::{Client, Config, Format, Options};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    // Reads URLBOX_API_KEY, URLBOX_API_SECRET and URLBOX_API_HOST_NAME
    let config = Config::new().from_env(&ctx);
    if config.api_key.is_none() {
        eprintln!("URLBOX_API_KEY is not set, falling back to demo credentials");
    }
    let config = Config {
        api_key: config.api_key.or_else(|| Some("demo-api-key".to_string())),
        ..config
    };
    let client = Client::from_config(ctx, config)?;

    let options = Options::new()
        .url("example.com")
        .format(Format::Png)
        .full_page(true)
        .width(1280);

    // Example 1: build an url to embed somewhere, nothing is sent
    println!("Example 1: render url");
    println!("{}", client.get_url(&options)?);

    // Example 2: check the render without downloading it
    println!("\nExample 2: HEAD render");
    match client.head(&options).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            if let Some(ct) = resp.headers().get(http::header::CONTENT_TYPE) {
                println!("Content type: {ct:?}");
            }
        }
        Err(e) => eprintln!("Request failed: {e}"),
    }

    // Example 3: synchronous render, signed when a secret is configured
    println!("\nExample 3: GET render");
    match client.get(&options).await {
        Ok(resp) if resp.status().is_success() => {
            let path = "render.png";
            std::fs::write(path, resp.body())?;
            info!("wrote {} bytes", resp.body().len());
            println!("Saved render to {path}");
        }
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            println!("{}", String::from_utf8_lossy(resp.body()));
        }
        Err(e) => eprintln!("Request failed: {e}"),
    }

    // Example 4: asynchronous render, the result is delivered to the webhook
    println!("\nExample 4: POST render");
    let options = options.webhook_url("https://example.com/webhooks/urlbox");
    match client.post(&options).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            println!("{}", String::from_utf8_lossy(resp.body()));
        }
        Err(e) => eprintln!("Failed to start render: {e}"),
    }

    Ok(())
}
