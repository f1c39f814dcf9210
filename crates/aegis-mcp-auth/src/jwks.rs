use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use jsonwebtoken::{jwk::JwkSet, DecodingKey};
use tokio::sync::RwLock;
use url::Url;

use aegis_mcp_core::Error;

/// Verification keys fetched from the issuer's JWKS endpoint, cached for a
/// bounded TTL with an on-miss refetch for unknown key ids.
pub struct JwksCache {
    url: Url,
    ttl: Duration,
    http: reqwest::Client,
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    kid_map: HashMap<String, DecodingKey>,
    no_kid_keys: Vec<DecodingKey>,
    fetched_at: Option<Instant>,
}

impl JwksCache {
    pub fn new(url: Url, ttl: Duration) -> Self {
        Self {
            url,
            ttl,
            http: reqwest::Client::new(),
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn find(&self, kid: &str) -> Option<DecodingKey> {
        self.refresh_if_stale().await;
        if let Some(key) = self.state.read().await.kid_map.get(kid).cloned() {
            return Some(key);
        }
        // unknown kid: the issuer may have rotated, refetch once
        self.refresh().await;
        self.state.read().await.kid_map.get(kid).cloned()
    }

    pub async fn all(&self) -> Vec<DecodingKey> {
        self.refresh_if_stale().await;
        let state = self.state.read().await;
        state
            .no_kid_keys
            .iter()
            .chain(state.kid_map.values())
            .cloned()
            .collect()
    }

    async fn refresh_if_stale(&self) {
        let stale = {
            let state = self.state.read().await;
            match state.fetched_at {
                None => true,
                Some(at) => at.elapsed() > self.ttl,
            }
        };
        if stale {
            self.refresh().await;
        }
    }

    async fn refresh(&self) {
        match self.fetch().await {
            Ok((kid_map, no_kid_keys)) => {
                let mut state = self.state.write().await;
                state.kid_map = kid_map;
                state.no_kid_keys = no_kid_keys;
                state.fetched_at = Some(Instant::now());
            }
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "failed to fetch JWKS");
                // keep whatever keys we already have, but record the attempt
                let mut state = self.state.write().await;
                state.fetched_at = Some(Instant::now());
            }
        }
    }

    async fn fetch(&self) -> Result<(HashMap<String, DecodingKey>, Vec<DecodingKey>), Error> {
        let jwks: JwkSet = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .json()
            .await?;

        let mut kid_map = HashMap::new();
        let mut no_kid_keys = Vec::new();
        for key in &jwks.keys {
            let decoded = match DecodingKey::from_jwk(key) {
                Ok(decoded) => decoded,
                Err(err) => {
                    tracing::warn!(kid = ?key.common.key_id, error = %err, "skipping unsupported JWK");
                    continue;
                }
            };
            match &key.common.key_id {
                Some(kid) => {
                    kid_map.insert(kid.clone(), decoded);
                }
                None => no_kid_keys.push(decoded),
            }
        }
        Ok((kid_map, no_kid_keys))
    }
}
