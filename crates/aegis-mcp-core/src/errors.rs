use axum::{body::Body, response::IntoResponse};
use http::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Normal Http Errors
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] Error401),

    // Special Errors, expected 500
    #[error("Fatal error: {0}")]
    Fatal(#[from] FatalError),

    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Url error: {0}")]
    UrlError(#[from] url::ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error401 {
    #[error("Missing Authorization header")]
    MissingAuthorization,

    #[error("Invalid header string data {0}")]
    InvalidHeaderString(http::header::HeaderName),

    #[error("'Bearer' type expected, but got {0}")]
    BearerTokenExpected(String),

    #[error("Invalid token: {0}")]
    InvalidToken(&'static str),

    #[error("Token validation failed: {0}")]
    TokenValidation(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("Key pair not available")]
    KeyPairUnavailable,

    #[error("Key pair error: {0}")]
    KeyPair(String),

    #[error("Token signing error: {0}")]
    TokenSigning(jsonwebtoken::errors::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        match self {
            Self::Unauthorized(e) => Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .body(Body::from(e.to_string()))
                .unwrap(),
            Self::Fatal(e) => Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from(e.to_string()))
                .unwrap(),
            _ => Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap(),
        }
    }
}
