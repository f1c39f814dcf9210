use axum::{Extension, Json};

use aegis_mcp_auth::{DevSigner, JsonWebKeySet};
use aegis_mcp_core::{Error, FatalError};

/// Serves the local dev public key. Only routed while a signer exists.
pub(crate) async fn handler(
    Extension(signer): Extension<DevSigner>,
) -> Result<Json<JsonWebKeySet>, Error> {
    let Some(keypair) = signer.0.as_ref() else {
        return Err(FatalError::KeyPairUnavailable.into());
    };
    Ok(Json(keypair.jwks()))
}
