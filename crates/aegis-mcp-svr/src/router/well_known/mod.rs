pub mod jwks;
pub mod oauth_authorization_server;
pub mod oauth_protected_resource;
pub mod openid_configuration;

use axum::{routing::get, Router};

use aegis_mcp_auth::DevSigner;
use aegis_mcp_core::Config;

pub fn router(_config: &Config, signer: &DevSigner) -> Router<Config> {
    let mut router = Router::new()
        .route(
            "/oauth-authorization-server",
            get(oauth_authorization_server::handler),
        )
        .route("/openid-configuration", get(openid_configuration::handler))
        .route(
            "/oauth-protected-resource",
            get(oauth_protected_resource::handler),
        );
    if signer.0.is_some() {
        router = router.route("/jwks.json", get(jwks::handler));
    }
    router
}
