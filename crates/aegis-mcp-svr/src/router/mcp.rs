use std::{convert::Infallible, sync::Arc};

use axum::{
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::Stream;
use tokio_util::sync::CancellationToken;

use aegis_mcp_core::{
    CallToolParams, CallToolResult, Claims, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ToolsListResult, JSONRPC_VERSION,
};

use crate::{middlewares::HttpAuthentication, tools::ToolRegistry};

/// JSON-RPC exchange on the protected endpoint. Every request must carry a
/// valid bearer token; protocol-level problems are answered in-band.
pub async fn handler(
    Extension(registry): Extension<Arc<ToolRegistry>>,
    HttpAuthentication(claims): HttpAuthentication,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    Json(dispatch(&registry, &claims, request))
}

fn dispatch(registry: &ToolRegistry, claims: &Claims, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::failure(
            request.id,
            JsonRpcError::invalid_request("expected jsonrpc \"2.0\""),
        );
    }
    tracing::debug!(subject = %claims.sub, method = %request.method, "dispatching protocol request");

    match request.method.as_str() {
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => {
            let result = ToolsListResult {
                tools: registry.descriptors(),
            };
            JsonRpcResponse::success(request.id, serde_json::to_value(result).unwrap())
        }
        "tools/call" => {
            let params = match serde_json::from_value::<CallToolParams>(request.params) {
                Ok(params) => params,
                Err(err) => {
                    return JsonRpcResponse::failure(
                        request.id,
                        JsonRpcError::invalid_params(err.to_string()),
                    )
                }
            };
            match registry.call(&params.name, &params.arguments) {
                None => JsonRpcResponse::failure(
                    request.id,
                    JsonRpcError::invalid_params(format!("tool not found: {}", params.name)),
                ),
                Some(Err(err)) => {
                    JsonRpcResponse::failure(request.id, JsonRpcError::invalid_params(err))
                }
                Some(Ok(value)) => {
                    let text = match value {
                        serde_json::Value::String(text) => text,
                        other => other.to_string(),
                    };
                    JsonRpcResponse::success(
                        request.id,
                        serde_json::to_value(CallToolResult::text(text)).unwrap(),
                    )
                }
            }
        }
        method => JsonRpcResponse::failure(request.id, JsonRpcError::method_not_found(method)),
    }
}

/// Server event stream for the `sse` transport. Carries no messages in
/// this demo; keepalive comments hold the connection open until shutdown.
pub async fn sse_handler(
    Extension(cancel): Extension<CancellationToken>,
    HttpAuthentication(claims): HttpAuthentication,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(subject = %claims.sub, "opening server event stream");
    let stream = futures::stream::once(async move {
        cancel.cancelled_owned().await;
        Ok::<Event, Infallible>(Event::default().comment("server shutting down"))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
