use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use aegis_mcp_auth::{BearerAuth, DevKeyPair, DevSigner};
use aegis_mcp_core::{Config, Error, Transport};

use crate::middlewares::{trace_layer, AuthLayer};
use crate::tools::ToolRegistry;

pub mod meta;
pub mod well_known;

pub mod dev_token;
pub mod mcp;
pub mod register;

pub fn router(cancel: CancellationToken, config: Config) -> Result<Router, Error> {
    let signer = if config.application.dev_token {
        DevSigner(Some(Arc::new(DevKeyPair::generate()?)))
    } else {
        DevSigner::default()
    };
    router_with_signer(cancel, config, signer)
}

/// Assembles the route table around an explicit signer so the
/// missing-key-pair path stays reachable.
pub fn router_with_signer(
    cancel: CancellationToken,
    config: Config,
    signer: DevSigner,
) -> Result<Router, Error> {
    let authn = BearerAuth::new(&config.auth, &signer)?;
    let registry = Arc::new(ToolRegistry::builtin());

    let mcp_route = match config.server.transport {
        Transport::Sse => get(mcp::sse_handler).post(mcp::handler),
        Transport::Http => post(mcp::handler),
    };

    let mut router = Router::new()
        .route("/register", post(register::handler))
        .route(&config.server.mcp_path(), mcp_route)
        .nest("/.well-known", well_known::router(&config, &signer))
        .merge(meta::router(&config));

    if config.application.dev_token {
        router = router.route("/dev/token", get(dev_token::handler));
    }

    let router = router
        .layer(Extension(cancel.clone()))
        .layer(Extension(registry))
        .layer(Extension(signer))
        .layer(AuthLayer::new(authn))
        .layer(trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(config);
    Ok(router)
}
