use axum::{extract::State, Json};

use aegis_mcp_core::{Config, OpenIdConfiguration};

pub(crate) async fn handler(State(config): State<Config>) -> Json<OpenIdConfiguration> {
    let issuer = &config.auth.issuer;
    let authorization_endpoint = issuer.join("/oauth/authorize").unwrap();
    let token_endpoint = issuer.join("/oauth/token").unwrap();
    let jwks_uri = config.auth.jwks_uri().unwrap();

    Json(OpenIdConfiguration {
        issuer: issuer.to_string(),
        authorization_endpoint: authorization_endpoint.to_string(),
        token_endpoint: token_endpoint.to_string(),
        jwks_uri: jwks_uri.to_string(),
        response_types_supported: vec!["code".to_string()],
        subject_types_supported: vec!["public".to_string()],
        id_token_signing_alg_values_supported: vec!["RS256".to_string()],
    })
}
