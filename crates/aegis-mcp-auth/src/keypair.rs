use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use rand::rngs::OsRng;
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    traits::PublicKeyParts,
    RsaPrivateKey, RsaPublicKey,
};
use serde::{Deserialize, Serialize};
use url::Url;

use aegis_mcp_core::{Claims, Error, FatalError};

// 2048 bits keeps local startup fast; these keys never leave a dev machine.
const RSA_KEY_SIZE: usize = 2048;

/// Public JWK as distributed through the JWKS document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub kid: String,
    pub alg: String,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

/// Locally generated RSA key pair backing the development token endpoint.
pub struct DevKeyPair {
    kid: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    jwk: JsonWebKey,
}

/// Shared handle to the optional dev signer, injected as a request
/// extension. `None` when token minting is not available.
#[derive(Clone, Default)]
pub struct DevSigner(pub Option<Arc<DevKeyPair>>);

impl DevKeyPair {
    pub fn generate() -> Result<Self, Error> {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_SIZE)
            .map_err(|err| FatalError::KeyPair(err.to_string()))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|err| FatalError::KeyPair(err.to_string()))?;
        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|err| FatalError::KeyPair(err.to_string()))?;

        let encoding_key =
            EncodingKey::from_rsa_pem(private_pem.as_bytes()).map_err(FatalError::TokenSigning)?;
        let decoding_key =
            DecodingKey::from_rsa_pem(public_pem.as_bytes()).map_err(FatalError::TokenSigning)?;

        let kid = format!("dev-{}", Utc::now().timestamp());
        let jwk = JsonWebKey {
            kty: "RSA".to_string(),
            key_use: "sig".to_string(),
            kid: kid.clone(),
            alg: "RS256".to_string(),
            n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        };

        Ok(Self {
            kid,
            encoding_key,
            decoding_key,
            jwk,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn jwks(&self) -> JsonWebKeySet {
        JsonWebKeySet {
            keys: vec![self.jwk.clone()],
        }
    }

    /// Mint a signed bearer token for local testing.
    pub fn mint(
        &self,
        subject: &str,
        issuer: &Url,
        audience: &str,
        scopes: &[String],
        lifetime: Duration,
    ) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            aud: vec![audience.to_string()],
            exp: (now + lifetime).timestamp(),
            iat: Some(now.timestamp()),
            scope: if scopes.is_empty() {
                None
            } else {
                Some(scopes.join(" "))
            },
            extra: Default::default(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.kid.clone());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(FatalError::TokenSigning)?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwks_document_carries_the_public_key() {
        let keypair = DevKeyPair::generate().unwrap();
        let jwks = keypair.jwks();
        assert_eq!(jwks.keys.len(), 1);

        let jwk = &jwks.keys[0];
        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.key_use, "sig");
        assert_eq!(jwk.alg, "RS256");
        assert_eq!(jwk.kid, keypair.kid());
        assert!(!jwk.n.is_empty());
        assert!(!jwk.e.is_empty());
    }

    #[test]
    fn minted_token_has_kid_header() {
        let keypair = DevKeyPair::generate().unwrap();
        let issuer = Url::parse("https://dev.example.com").unwrap();
        let token = keypair
            .mint(
                "dev-user",
                &issuer,
                "my-mcp-server",
                &["read".to_string(), "write".to_string()],
                Duration::seconds(3600),
            )
            .unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some(keypair.kid()));
    }
}
