use url::Url;

use aegis_mcp_core::JsonRpcError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registration failed with status {status}: {body}")]
    Registration { status: u16, body: String },

    #[error("Protocol error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Protocol response carried neither result nor error")]
    EmptyResponse,

    #[error(
        "no development token endpoint on this server; \
         complete the interactive flow at {authorize_url}"
    )]
    InteractiveAuthRequired { authorize_url: Url },
}

impl From<JsonRpcError> for ClientError {
    fn from(err: JsonRpcError) -> Self {
        Self::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}
