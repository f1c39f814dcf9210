use axum::{extract::State, Json};

use aegis_mcp_core::{AuthorizationServerMetadata, Config};

pub(crate) async fn handler(State(config): State<Config>) -> Json<AuthorizationServerMetadata> {
    let issuer = &config.auth.issuer;
    let authorization_endpoint = issuer.join("/oauth/authorize").unwrap();
    let token_endpoint = issuer.join("/oauth/token").unwrap();
    let jwks_uri = config.auth.jwks_uri().unwrap();
    // registration is the one endpoint this server implements itself
    let registration_endpoint = config.server.hostname.join("/register").unwrap();

    Json(AuthorizationServerMetadata {
        issuer: issuer.to_string(),
        authorization_endpoint: authorization_endpoint.to_string(),
        token_endpoint: token_endpoint.to_string(),
        jwks_uri: jwks_uri.to_string(),
        registration_endpoint: registration_endpoint.to_string(),
        response_types_supported: vec!["code".to_string()],
        code_challenge_methods_supported: vec!["S256".to_string()],
        token_endpoint_auth_methods_supported: vec!["client_secret_post".to_string()],
        grant_types_supported: vec![
            "authorization_code".to_string(),
            "refresh_token".to_string(),
        ],
    })
}
