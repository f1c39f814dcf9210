use serde::{Deserialize, Serialize};

/// OAuth 2.1 Authorization Server Metadata (RFC 8414 subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub registration_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
}

/// OpenID Connect Discovery document subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub response_types_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
}

/// OAuth 2.1 Protected Resource Metadata (RFC 9728 subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResourceMetadata {
    pub resource: String,
    pub authorization_servers: Vec<String>,
    pub jwks_uri: String,
    pub bearer_methods_supported: Vec<String>,
    pub resource_documentation: String,
}

/// Body accepted by dynamic client registration. Every OAuth parameter is
/// optional; unknown extra fields are accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRegistrationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint_auth_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Registration response per OAuth 2.0 Dynamic Client Registration.
///
/// The credentials are constant across callers; only the echoed request
/// parameters vary. Documented simplification, not multi-tenant storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistrationRecord {
    pub client_id: String,
    pub client_secret: String,
    pub client_id_issued_at: i64,
    /// 0 means the secret never expires.
    pub client_secret_expires_at: i64,
    pub redirect_uris: Vec<String>,
    pub token_endpoint_auth_method: String,
    pub grant_types: Vec<String>,
    pub response_types: Vec<String>,
    pub client_name: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub scope: String,
}

/// Error body returned for malformed registration requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationError {
    pub error: String,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_request_skips_absent_fields() {
        let request = ClientRegistrationRequest {
            client_name: Some("demo".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"client_name": "demo"}));
    }

    #[test]
    fn registration_request_ignores_unknown_fields() {
        let request: ClientRegistrationRequest = serde_json::from_value(serde_json::json!({
            "client_name": "demo",
            "client_uri": "https://example.com",
            "logo_uri": "https://example.com/logo.png",
        }))
        .unwrap();
        assert_eq!(request.client_name.as_deref(), Some("demo"));
        assert!(request.redirect_uris.is_none());
    }
}
