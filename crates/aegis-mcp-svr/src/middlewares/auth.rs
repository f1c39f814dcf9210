use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    response::{IntoResponse, Response},
};
use http::{request::Parts, StatusCode};
use tower::{Layer, Service};

use aegis_mcp_auth::BearerAuth;
use aegis_mcp_core::{Claims, GeneralAuthn};

/// Extractor that runs bearer authentication for a protected route.
/// Rejects with the status carried by the authentication error (401 for
/// every token problem).
pub struct HttpAuthentication(pub Claims);

impl<S> FromRequestParts<S> for HttpAuthentication
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let Some(authn) = parts.extensions.get::<BearerAuth>().cloned() else {
            tracing::error!("auth middleware not found");
            return Err(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap());
        };
        let claims = authn.authenticate(parts).await.map_err(|err| {
            tracing::info!(error = %err, "bearer authentication failed");
            err.into_response()
        })?;
        Ok(Self(claims))
    }
}

#[derive(Clone)]
pub struct AuthLayer {
    pub(crate) authn: BearerAuth,
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    pub(crate) authn: BearerAuth,
}

impl AuthLayer {
    pub fn new(authn: BearerAuth) -> Self {
        Self { authn }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            authn: self.authn.clone(),
        }
    }
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn call(&mut self, mut req: Request) -> Self::Future {
        req.extensions_mut().insert(self.authn.clone());
        self.inner.call(req)
    }

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }
}
