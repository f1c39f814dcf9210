use redact::Secret;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Authority that signs the accepted bearer tokens.
    #[serde(default = "default_issuer")]
    pub issuer: Url,
    /// Audience the tokens must be minted for. Doubles as the fixed
    /// client_id handed out by dynamic client registration.
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(
        default = "default_client_secret",
        serialize_with = "redact::serde::redact_secret"
    )]
    pub client_secret: Secret<String>,
    /// Overrides the issuer-derived JWKS location.
    #[serde(default)]
    pub jwks_url: Option<Url>,
    /// Seconds before cached JWKS keys are refetched.
    #[serde(default = "default_jwks_ttl")]
    pub jwks_ttl: u64,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl AuthConfig {
    pub fn jwks_uri(&self) -> Result<Url, url::ParseError> {
        match &self.jwks_url {
            Some(url) => Ok(url.clone()),
            None => self.issuer.join("/.well-known/jwks.json"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            audience: default_audience(),
            client_secret: default_client_secret(),
            jwks_url: None,
            jwks_ttl: default_jwks_ttl(),
            scopes: default_scopes(),
        }
    }
}

fn default_issuer() -> Url {
    Url::parse("https://dev.example.com").expect("static url")
}

fn default_audience() -> String {
    "my-mcp-server".to_string()
}

fn default_client_secret() -> Secret<String> {
    Secret::from(String::new())
}

fn default_jwks_ttl() -> u64 {
    600
}

fn default_scopes() -> Vec<String> {
    vec!["read".to_string(), "write".to_string()]
}
