use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use http::{HeaderMap, StatusCode};

use aegis_mcp_core::{
    ClientRegistrationRecord, ClientRegistrationRequest, Config, RegistrationError,
};

/// OAuth 2.0 Dynamic Client Registration.
///
/// Returns the fixed credentials from configuration for every caller and
/// echoes the supplied OAuth parameters back, defaulting the absent ones.
/// The body is parsed by hand so malformed input always comes back as a
/// 400 with a diagnostic JSON object, never a 5xx.
pub async fn handler(State(config): State<Config>, headers: HeaderMap, body: Bytes) -> Response {
    tracing::info!(headers = ?headers, "/register headers");
    tracing::info!(body = %String::from_utf8_lossy(&body), "/register raw body");

    let data = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) if value.is_object() => value,
        Ok(value) => {
            tracing::error!(body = %value, "registration body is not a JSON object");
            return bad_request("expected a JSON object");
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to parse JSON body");
            return bad_request(&err.to_string());
        }
    };
    let request = match serde_json::from_value::<ClientRegistrationRequest>(data) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!(error = %err, "failed to parse JSON body");
            return bad_request(&err.to_string());
        }
    };
    tracing::info!(data = ?request, "/register parsed body");

    let now = Utc::now().timestamp();
    let record = ClientRegistrationRecord {
        client_id: config.auth.audience.clone(),
        client_secret: config.auth.client_secret.expose_secret().clone(),
        client_id_issued_at: now,
        client_secret_expires_at: 0, // 0 means no expiration
        redirect_uris: request.redirect_uris.unwrap_or_default(),
        token_endpoint_auth_method: request
            .token_endpoint_auth_method
            .unwrap_or_else(|| "client_secret_post".to_string()),
        grant_types: request
            .grant_types
            .unwrap_or_else(|| vec!["authorization_code".to_string()]),
        response_types: request
            .response_types
            .unwrap_or_else(|| vec!["code".to_string()]),
        client_name: request.client_name.unwrap_or_default(),
        scope: request.scope.unwrap_or_default(),
    };

    tracing::info!(response = ?record, "/register response");
    (StatusCode::CREATED, Json(record)).into_response()
}

fn bad_request(details: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(RegistrationError {
            error: "Invalid JSON body".to_string(),
            details: details.to_string(),
        }),
    )
        .into_response()
}
