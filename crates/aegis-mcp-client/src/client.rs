use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, CsrfToken, PkceCodeChallenge, RedirectUrl, Scope,
    TokenUrl,
};
use serde_json::Value;
use url::Url;

use aegis_mcp_core::{
    AuthorizationServerMetadata, CallToolResult, ClientRegistrationRequest, DevTokenResponse,
    JsonRpcRequest, JsonRpcResponse, ToolDescriptor, ToolsListResult,
};

use crate::ClientError;

const CLIENT_NAME: &str = "aegis-mcp client";
const REDIRECT_URI: &str = "http://127.0.0.1/callback";

/// Client credentials, either cached from an earlier run or freshly
/// obtained through dynamic registration.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Option<String>,
}

/// Authenticated handle to a protected tool server.
pub struct McpClient {
    http: reqwest::Client,
    mcp_url: Url,
    token: String,
    pub metadata: AuthorizationServerMetadata,
    pub credentials: Credentials,
}

impl McpClient {
    /// OAuth handshake against the server's advertised endpoints:
    /// discovery, then registration (unless cached credentials are
    /// supplied), then token acquisition.
    pub async fn connect(
        base_url: Url,
        mcp_path: &str,
        cached: Option<Credentials>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::new();

        let metadata = Self::discover(&http, &base_url).await?;
        tracing::info!(issuer = %metadata.issuer, "discovered authorization server metadata");

        let credentials = match cached {
            Some(credentials) => {
                tracing::info!(client_id = %credentials.client_id, "reusing cached client registration");
                credentials
            }
            None => Self::register(&http, &metadata).await?,
        };

        let token = Self::obtain_token(&http, &base_url, &metadata, &credentials).await?;

        let mcp_url = base_url.join(mcp_path)?;
        Ok(Self {
            http,
            mcp_url,
            token,
            metadata,
            credentials,
        })
    }

    async fn discover(
        http: &reqwest::Client,
        base_url: &Url,
    ) -> Result<AuthorizationServerMetadata, ClientError> {
        let url = base_url.join("/.well-known/oauth-authorization-server")?;
        let metadata = http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(metadata)
    }

    async fn register(
        http: &reqwest::Client,
        metadata: &AuthorizationServerMetadata,
    ) -> Result<Credentials, ClientError> {
        let body = ClientRegistrationRequest {
            redirect_uris: Some(vec![REDIRECT_URI.to_string()]),
            token_endpoint_auth_method: Some("client_secret_post".to_string()),
            grant_types: Some(vec!["authorization_code".to_string()]),
            response_types: Some(vec!["code".to_string()]),
            client_name: Some(CLIENT_NAME.to_string()),
            scope: Some("read write".to_string()),
        };

        let response = http
            .post(metadata.registration_endpoint.as_str())
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Registration { status, body });
        }

        let record: aegis_mcp_core::ClientRegistrationRecord = response.json().await?;
        tracing::info!(client_id = %record.client_id, "registered dynamic client");
        Ok(Credentials {
            client_id: record.client_id,
            client_secret: Some(record.client_secret),
        })
    }

    /// Token acquisition. The development endpoint is the only
    /// non-interactive path; without it the caller gets the PKCE
    /// authorization URL to complete in a browser.
    async fn obtain_token(
        http: &reqwest::Client,
        base_url: &Url,
        metadata: &AuthorizationServerMetadata,
        credentials: &Credentials,
    ) -> Result<String, ClientError> {
        let dev_url = base_url.join("/dev/token")?;
        match http.get(dev_url).send().await {
            Ok(response) if response.status().is_success() => {
                let issued: DevTokenResponse = response.json().await?;
                tracing::info!(
                    scope = %issued.scope,
                    expires_in = issued.expires_in,
                    "obtained development token"
                );
                return Ok(issued.access_token);
            }
            Ok(response) => {
                tracing::debug!(status = %response.status(), "development token endpoint unavailable");
            }
            Err(err) => {
                tracing::debug!(error = %err, "development token endpoint unreachable");
            }
        }

        Err(ClientError::InteractiveAuthRequired {
            authorize_url: Self::authorize_url(metadata, credentials)?,
        })
    }

    fn authorize_url(
        metadata: &AuthorizationServerMetadata,
        credentials: &Credentials,
    ) -> Result<Url, ClientError> {
        let (pkce_challenge, _pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
            .set_auth_uri(AuthUrl::from_url(Url::parse(
                &metadata.authorization_endpoint,
            )?))
            .set_token_uri(TokenUrl::from_url(Url::parse(&metadata.token_endpoint)?))
            .set_redirect_uri(RedirectUrl::from_url(Url::parse(REDIRECT_URI)?));

        let (auth_url, _csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge)
            .add_scopes([
                Scope::new("read".to_string()),
                Scope::new("write".to_string()),
            ])
            .url();
        Ok(auth_url)
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let request = JsonRpcRequest::new(1, method, params);
        let response: JsonRpcResponse = self
            .http
            .post(self.mcp_url.clone())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(error.into());
        }
        response.result.ok_or(ClientError::EmptyResponse)
    }

    /// Liveness probe against the protected endpoint.
    pub async fn ping(&self) -> Result<(), ClientError> {
        self.rpc("ping", Value::Null).await.map(|_| ())
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ClientError> {
        let result = self.rpc("tools/list", Value::Null).await?;
        let list: ToolsListResult = serde_json::from_value(result)?;
        Ok(list.tools)
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ClientError> {
        let result = self
            .rpc(
                "tools/call",
                serde_json::json!({"name": name, "arguments": arguments}),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> AuthorizationServerMetadata {
        AuthorizationServerMetadata {
            issuer: "https://dev.example.com/".to_string(),
            authorization_endpoint: "https://dev.example.com/oauth/authorize".to_string(),
            token_endpoint: "https://dev.example.com/oauth/token".to_string(),
            jwks_uri: "https://dev.example.com/.well-known/jwks.json".to_string(),
            registration_endpoint: "http://127.0.0.1:8000/register".to_string(),
            response_types_supported: vec!["code".to_string()],
            code_challenge_methods_supported: vec!["S256".to_string()],
            token_endpoint_auth_methods_supported: vec!["client_secret_post".to_string()],
            grant_types_supported: vec!["authorization_code".to_string()],
        }
    }

    #[test]
    fn authorize_url_carries_pkce_and_client_id() {
        let credentials = Credentials {
            client_id: "my-mcp-server".to_string(),
            client_secret: None,
        };
        let url = McpClient::authorize_url(&sample_metadata(), &credentials).unwrap();

        assert!(url.as_str().starts_with("https://dev.example.com/oauth/authorize"));
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(query.iter().any(|(k, _)| k == "code_challenge"));
        assert!(query
            .iter()
            .any(|(k, v)| k == "code_challenge_method" && v == "S256"));
        assert!(query
            .iter()
            .any(|(k, v)| k == "client_id" && v == "my-mcp-server"));
        assert!(query
            .iter()
            .any(|(k, v)| k == "scope" && v == "read write"));
    }
}
