use serde::{Deserialize, Serialize};
use serde_with::{formats::PreferOne, serde_as, OneOrMany};

/// Claims carried by an accepted bearer token.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    #[serde_as(as = "OneOrMany<_, PreferOne>")]
    pub aud: Vec<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .collect()
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().iter().any(|s| *s == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aud_accepts_single_string_and_array() {
        let single: Claims = serde_json::from_value(serde_json::json!({
            "sub": "dev-user",
            "iss": "https://dev.example.com/",
            "aud": "my-mcp-server",
            "exp": 4102444800i64,
        }))
        .unwrap();
        assert_eq!(single.aud, vec!["my-mcp-server"]);

        let many: Claims = serde_json::from_value(serde_json::json!({
            "sub": "dev-user",
            "iss": "https://dev.example.com/",
            "aud": ["a", "b"],
            "exp": 4102444800i64,
        }))
        .unwrap();
        assert_eq!(many.aud, vec!["a", "b"]);
    }

    #[test]
    fn scope_string_splits_into_scopes() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "dev-user",
            "iss": "https://dev.example.com/",
            "aud": "my-mcp-server",
            "exp": 4102444800i64,
            "scope": "read write",
        }))
        .unwrap();
        assert_eq!(claims.scopes(), vec!["read", "write"]);
        assert!(claims.has_scope("read"));
        assert!(!claims.has_scope("admin"));
    }
}
