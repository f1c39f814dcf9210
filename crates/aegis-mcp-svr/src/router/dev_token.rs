use axum::{extract::State, Extension, Json};
use chrono::Duration;

use aegis_mcp_auth::DevSigner;
use aegis_mcp_core::{Config, DevTokenResponse, Error, FatalError};

const DEV_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Mints a short-lived bearer token for local testing. Routed only when
/// the `dev_token` gate is on; never expose this in production.
pub async fn handler(
    State(config): State<Config>,
    Extension(signer): Extension<DevSigner>,
) -> Result<Json<DevTokenResponse>, Error> {
    let Some(keypair) = signer.0.as_ref() else {
        tracing::error!("dev token requested but no signing key pair is available");
        return Err(FatalError::KeyPairUnavailable.into());
    };

    let token = keypair.mint(
        "dev-user",
        &config.auth.issuer,
        &config.auth.audience,
        &config.auth.scopes,
        Duration::seconds(DEV_TOKEN_LIFETIME_SECS),
    )?;

    Ok(Json(DevTokenResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: DEV_TOKEN_LIFETIME_SECS as u64,
        scope: config.auth.scopes.join(" "),
    }))
}
