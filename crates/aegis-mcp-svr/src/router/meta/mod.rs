use axum::{routing::get, Router};

use aegis_mcp_core::Config;

pub fn router(config: &Config) -> Router<Config> {
    let mut router = Router::new();
    if config.application.health_check {
        router = router.route("/health", get(health));
    }
    router
}

async fn health() -> &'static str {
    "OK"
}
