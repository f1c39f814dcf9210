use std::{ops::Deref, sync::Arc, time::Duration};

use http::{header, request};
use jsonwebtoken::{DecodingKey, Validation};
use url::Url;

use aegis_mcp_core::{AuthConfig, Claims, Error, Error401, GeneralAuthn};

use crate::{DevSigner, JwksCache};

/// Bearer-token authenticator: verifies signature against the issuer's
/// JWKS (plus the local dev key when present), then issuer and audience.
#[derive(Clone)]
pub struct BearerAuth(pub(crate) Arc<InnerAuthn>);

impl Deref for BearerAuth {
    type Target = InnerAuthn;

    fn deref(&self) -> &Self::Target {
        Arc::as_ref(&self.0)
    }
}

pub struct InnerAuthn {
    pub(crate) issuer: Url,
    pub(crate) audience: String,
    pub(crate) jwks: JwksCache,
    pub(crate) local_keys: Vec<(String, DecodingKey)>,
}

impl BearerAuth {
    pub fn new(config: &AuthConfig, signer: &DevSigner) -> Result<Self, Error> {
        let jwks = JwksCache::new(config.jwks_uri()?, Duration::from_secs(config.jwks_ttl));
        let local_keys = signer
            .0
            .iter()
            .map(|keypair| (keypair.kid().to_string(), keypair.decoding_key().clone()))
            .collect();

        Ok(BearerAuth(Arc::new(InnerAuthn {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            jwks,
            local_keys,
        })))
    }
}

impl InnerAuthn {
    async fn verification_keys(&self, header: &jsonwebtoken::Header) -> Vec<DecodingKey> {
        if let Some(kid) = &header.kid {
            if let Some((_, key)) = self.local_keys.iter().find(|(local, _)| local == kid) {
                return vec![key.clone()];
            }
            if let Some(key) = self.jwks.find(kid).await {
                return vec![key];
            }
        }
        // no kid, or a kid nobody recognizes: try every trusted key
        let mut keys: Vec<DecodingKey> =
            self.local_keys.iter().map(|(_, key)| key.clone()).collect();
        keys.extend(self.jwks.all().await);
        keys
    }

    fn prepare_validator(&self, header: &jsonwebtoken::Header) -> Validation {
        let mut validator = Validation::new(header.alg);
        validator.set_required_spec_claims(&["exp", "iss", "aud"]);
        validator.set_issuer(&[self.issuer.as_str()]);
        validator.set_audience(&[&self.audience]);
        validator
    }
}

impl GeneralAuthn for BearerAuth {
    fn issuer_url(&self) -> Url {
        self.issuer.clone()
    }

    fn audience(&self) -> &str {
        &self.audience
    }

    async fn authenticate(&self, target: &request::Parts) -> Result<Claims, Error> {
        let Some(authorization) = target.headers.get(header::AUTHORIZATION) else {
            return Err(Error401::MissingAuthorization.into());
        };
        let data = authorization
            .to_str()
            .map_err(|_| Error401::InvalidHeaderString(header::AUTHORIZATION))?;

        let mut data_splited = data.split_whitespace();
        let scheme = data_splited.next().unwrap_or_default();
        let token = data_splited.next().unwrap_or_default();
        if !scheme.trim().eq_ignore_ascii_case("bearer") {
            return Err(Error401::BearerTokenExpected(scheme.to_string()).into());
        }

        let header = jsonwebtoken::decode_header(token)
            .map_err(|_| Error401::InvalidToken("invalid token header"))?;
        let validator = self.prepare_validator(&header);
        let keys = self.verification_keys(&header).await;
        if keys.is_empty() {
            return Err(Error401::InvalidToken("no verification key available").into());
        }

        let mut failures = Vec::new();
        for key in &keys {
            match jsonwebtoken::decode::<Claims>(token, key, &validator) {
                Ok(data) => return Ok(data.claims),
                Err(err) => failures.push(err),
            }
        }
        tracing::info!(failures = ?failures, "failed to validate bearer token");
        match failures.into_iter().next() {
            Some(err) => Err(Error401::TokenValidation(err).into()),
            None => Err(Error401::InvalidToken("no valid key for jwt token").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, OnceLock};

    use chrono::Duration;

    use crate::DevKeyPair;

    use super::*;

    fn shared_keypair() -> Arc<DevKeyPair> {
        static KEYPAIR: OnceLock<Arc<DevKeyPair>> = OnceLock::new();
        KEYPAIR
            .get_or_init(|| Arc::new(DevKeyPair::generate().unwrap()))
            .clone()
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            // port 9 (discard) is never listening, so remote fetches fail fast
            jwks_url: Some(Url::parse("http://127.0.0.1:9/jwks.json").unwrap()),
            ..AuthConfig::default()
        }
    }

    fn authn() -> BearerAuth {
        let signer = DevSigner(Some(shared_keypair()));
        BearerAuth::new(&test_config(), &signer).unwrap()
    }

    fn parts(authorization: Option<&str>) -> request::Parts {
        let mut builder = http::Request::builder().uri("/mcp");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn mint(audience: &str, lifetime: Duration) -> String {
        let config = test_config();
        shared_keypair()
            .mint(
                "dev-user",
                &config.issuer,
                audience,
                &config.scopes,
                lifetime,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let token = mint("my-mcp-server", Duration::seconds(3600));
        let claims = authn()
            .authenticate(&parts(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(claims.sub, "dev-user");
        assert_eq!(claims.aud, vec!["my-mcp-server"]);
        assert!(claims.has_scope("read"));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = authn().authenticate(&parts(None)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Unauthorized(Error401::MissingAuthorization)
        ));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let err = authn()
            .authenticate(&parts(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Unauthorized(Error401::BearerTokenExpected(_))
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let err = authn()
            .authenticate(&parts(Some("Bearer not-a-jwt")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        // two minutes past expiry clears the default 60s leeway
        let token = mint("my-mcp-server", Duration::seconds(-120));
        let err = authn()
            .authenticate(&parts(Some(&format!("Bearer {token}"))))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let token = mint("someone-else", Duration::seconds(3600));
        let err = authn()
            .authenticate(&parts(Some(&format!("Bearer {token}"))))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn token_from_unknown_key_is_rejected() {
        let foreign = DevKeyPair::generate().unwrap();
        let config = test_config();
        let token = foreign
            .mint(
                "dev-user",
                &config.issuer,
                "my-mcp-server",
                &config.scopes,
                Duration::seconds(3600),
            )
            .unwrap();
        let err = authn()
            .authenticate(&parts(Some(&format!("Bearer {token}"))))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }
}
