//! Example of using ProvideCredentialChain with logging to see credential resolution

use async_trait::async_trait;
use log::{debug, info};
use urlbox_core::{Context, OsEnv, ProvideCredential, ProvideCredentialChain, Result};
use urlbox_render::{
    Client, Config, ConfigCredentialProvider, Credential, EnvCredentialProvider,
    StaticCredentialProvider,
};

/// Wrapper that logs when credentials are loaded
#[derive(Debug)]
struct LoggingProvider<P> {
    name: String,
    inner: P,
}

impl<P> LoggingProvider<P> {
    fn new(name: impl Into<String>, provider: P) -> Self {
        Self {
            name: name.into(),
            inner: provider,
        }
    }
}

#[async_trait]
impl<P> ProvideCredential for LoggingProvider<P>
where
    P: ProvideCredential<Credential = Credential> + Send + Sync,
{
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        info!("Attempting to load credentials from: {}", self.name);

        match self.inner.provide_credential(ctx).await {
            Ok(Some(cred)) => {
                info!("Successfully loaded credentials from: {}", self.name);
                debug!("Loaded credential: {cred:?}");
                if cred.api_secret.is_none() {
                    debug!("Credential has no api secret, GET requests will be unsigned");
                }
                Ok(Some(cred))
            }
            Ok(None) => {
                info!("No credentials found in: {}", self.name);
                Ok(None)
            }
            Err(e) => {
                info!("Error loading credentials from {}: {:?}", self.name, e);
                Err(e)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new().with_env(OsEnv);

    let chain = ProvideCredentialChain::new()
        .push(LoggingProvider::new(
            "Environment",
            EnvCredentialProvider::new(),
        ))
        .push(LoggingProvider::new(
            "Config",
            ConfigCredentialProvider::new(Config::new().from_env(&ctx)),
        ))
        .push(LoggingProvider::new(
            "Static",
            StaticCredentialProvider::new("demo-api-key"),
        ));

    info!("Starting credential resolution...");

    let client = Client::load(ctx, &chain).await?;
    println!("Resolved credential: {:?}", client.credential());
    println!("Base url: {}", client.base_url());

    Ok(())
}
