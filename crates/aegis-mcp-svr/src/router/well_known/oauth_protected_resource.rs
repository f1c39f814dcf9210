use axum::{extract::State, Json};

use aegis_mcp_core::{Config, ProtectedResourceMetadata};

pub(crate) async fn handler(State(config): State<Config>) -> Json<ProtectedResourceMetadata> {
    let resource = &config.server.hostname;
    let jwks_uri = config.auth.jwks_uri().unwrap();
    let resource_documentation = resource.join("/docs").unwrap();

    Json(ProtectedResourceMetadata {
        resource: resource.to_string(),
        authorization_servers: vec![config.auth.issuer.to_string()],
        jwks_uri: jwks_uri.to_string(),
        bearer_methods_supported: vec!["header".to_string()],
        resource_documentation: resource_documentation.to_string(),
    })
}
