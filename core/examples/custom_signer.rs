use async_trait::async_trait;
use http::request::Parts;
use std::collections::HashMap;
use urlbox_core::hash::hex_hmac_sha1;
use urlbox_core::utils::Redact;
use urlbox_core::{
    Context, Error, ProvideCredential, Result, SignRequest, SigningCredential, StaticEnv,
};

// Define a custom credential type
#[derive(Clone)]
struct MyCredential {
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for MyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyCredential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("api_secret", &Redact::from(&self.api_secret))
            .finish()
    }
}

impl SigningCredential for MyCredential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Load credentials from the context env
#[derive(Debug)]
struct MyCredentialProvider;

#[async_trait]
impl ProvideCredential for MyCredentialProvider {
    type Credential = MyCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let (Some(api_key), Some(api_secret)) =
            (ctx.env_var("MY_API_KEY"), ctx.env_var("MY_API_SECRET"))
        else {
            return Ok(None);
        };

        Ok(Some(MyCredential {
            api_key,
            api_secret,
        }))
    }
}

// Append `key` and `signature` to the query
#[derive(Debug)]
struct MyRequestSigner;

#[async_trait]
impl SignRequest for MyRequestSigner {
    type Credential = MyCredential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential
            .filter(|c| c.is_valid())
            .ok_or_else(|| Error::missing_credential("no valid credential"))?;

        let query = req.uri.query().unwrap_or_default();
        let signature = hex_hmac_sha1(cred.api_secret.as_bytes(), query.as_bytes());

        let sep = if query.is_empty() { "" } else { "&" };
        let uri = format!(
            "{}?{query}{sep}key={}&signature={signature}",
            req.uri.path(),
            cred.api_key
        );
        let mut parts = req.uri.clone().into_parts();
        parts.path_and_query = Some(uri.parse()?);
        req.uri = http::Uri::from_parts(parts)?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([
            ("MY_API_KEY".to_string(), "demo-api-key".to_string()),
            ("MY_API_SECRET".to_string(), "demo-api-secret".to_string()),
        ]),
    });

    let cred = MyCredentialProvider.provide_credential(&ctx).await?;
    println!("Loaded credential: {cred:?}");

    let mut parts = http::Request::get("https://api.example.com/v1/render?url=example.com")
        .body(())?
        .into_parts()
        .0;

    MyRequestSigner
        .sign_request(&ctx, &mut parts, cred.as_ref())
        .await?;

    println!("Signed request: {} {}", parts.method, parts.uri);
    Ok(())
}
