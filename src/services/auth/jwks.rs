//! JWKS key provider.
//!
//! Responsibility:
//! - Fetch the identity provider's public signing keys from the
//!   well-known JWKS endpoint and hand out `DecodingKey`s by `kid`.
//! - Cache the key set with a TTL so verification does not hit the
//!   network per request.
//! - Single-flight refresh: concurrent cold-cache requests share one
//!   fetch instead of stampeding the provider.
//!
//! Failure reasons stay distinct (network vs malformed document vs
//! unknown `kid`) because the verifier maps them to different
//! authorization error codes.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use jsonwebtoken::{DecodingKey, jwk::JwkSet};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("failed to fetch JWKS: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("JWKS endpoint answered HTTP {status}")]
    Status { status: u16 },

    #[error("malformed JWKS document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("no signing key matches kid {kid:?}")]
    KeyNotFound { kid: String },

    #[error("signing key {kid:?} cannot be used for verification")]
    UnsupportedKey {
        kid: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

#[derive(Clone)]
struct CachedKeys {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Caching client for the identity provider's JWKS endpoint.
///
/// Shared across requests via `AppState`; all mutation happens behind
/// the internal locks, so `&self` is enough everywhere.
pub struct JwksClient {
    http: reqwest::Client,
    url: Url,
    ttl: Duration,
    cached: tokio::sync::RwLock<Option<CachedKeys>>,
    // Held for the duration of a refresh. Waiters re-check the cache
    // after acquiring it, so N cold-cache callers produce one fetch.
    refresh: tokio::sync::Mutex<()>,
}

impl JwksClient {
    pub fn new(url: Url, ttl: Duration, fetch_timeout: Duration) -> Result<Self, JwksError> {
        let http = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(JwksError::Fetch)?;

        Ok(Self {
            http,
            url,
            ttl,
            cached: tokio::sync::RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
        })
    }

    /// Resolve `kid` to a decoding key, refreshing the cached key set
    /// if it has expired (or was never fetched).
    ///
    /// A fresh key set that simply does not contain `kid` is a token
    /// problem, not a reason to re-fetch; forcing a fetch per unknown
    /// `kid` would let arbitrary bad tokens hammer the provider.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        let keys = self.current_keys().await?;

        let jwk = keys
            .find(kid)
            .ok_or_else(|| JwksError::KeyNotFound { kid: kid.to_owned() })?;

        DecodingKey::from_jwk(jwk).map_err(|source| JwksError::UnsupportedKey {
            kid: kid.to_owned(),
            source,
        })
    }

    async fn current_keys(&self) -> Result<Arc<JwkSet>, JwksError> {
        if let Some(keys) = self.fresh_snapshot().await {
            return Ok(keys);
        }

        let _refresh = self.refresh.lock().await;

        // Another task may have finished the fetch while we waited.
        if let Some(keys) = self.fresh_snapshot().await {
            return Ok(keys);
        }

        let fetched = Arc::new(self.fetch().await?);
        *self.cached.write().await = Some(CachedKeys {
            keys: fetched.clone(),
            fetched_at: Instant::now(),
        });

        tracing::debug!(keys = fetched.keys.len(), "refreshed JWKS");
        Ok(fetched)
    }

    async fn fresh_snapshot(&self) -> Option<Arc<JwkSet>> {
        let cached = self.cached.read().await;
        cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.keys.clone())
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(JwksError::Fetch)?;

        if !response.status().is_success() {
            return Err(JwksError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(JwksError::Fetch)?;
        serde_json::from_slice(&body).map_err(JwksError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Router, extract::State, routing::get};

    use super::*;

    const TTL: Duration = Duration::from_secs(300);
    const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

    /// Serve `body` at `/.well-known/jwks.json`, counting hits.
    async fn spawn_key_server(body: &'static str, hits: Arc<AtomicUsize>) -> Url {
        async fn handler(State((hits, body)): State<(Arc<AtomicUsize>, &'static str)>) -> String {
            hits.fetch_add(1, Ordering::SeqCst);
            body.to_owned()
        }

        let app = Router::new()
            .route("/.well-known/jwks.json", get(handler))
            .with_state((hits, body));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}/.well-known/jwks.json").parse().unwrap()
    }

    const EMPTY_KEY_SET: &str = r#"{"keys":[]}"#;

    #[tokio::test]
    async fn unknown_kid_in_fresh_key_set_is_key_not_found() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_key_server(EMPTY_KEY_SET, hits.clone()).await;
        let client = JwksClient::new(url, TTL, FETCH_TIMEOUT).unwrap();

        let err = client.decoding_key("nope").await.unwrap_err();
        assert!(matches!(err, JwksError::KeyNotFound { kid } if kid == "nope"));

        // The miss must not trigger a second fetch while the cache is fresh.
        let _ = client.decoding_key("nope").await.unwrap_err();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_document_is_reported_as_such() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_key_server("not json at all", hits.clone()).await;
        let client = JwksClient::new(url, TTL, FETCH_TIMEOUT).unwrap();

        let err = client.decoding_key("any").await.unwrap_err();
        assert!(matches!(err, JwksError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_fetch_error() {
        // Bind-then-drop gives us a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url: Url = format!("http://{addr}/.well-known/jwks.json").parse().unwrap();
        let client = JwksClient::new(url, TTL, FETCH_TIMEOUT).unwrap();

        let err = client.decoding_key("any").await.unwrap_err();
        assert!(matches!(err, JwksError::Fetch(_)));
    }

    #[tokio::test]
    async fn concurrent_cold_cache_lookups_fetch_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_key_server(EMPTY_KEY_SET, hits.clone()).await;
        let client = Arc::new(JwksClient::new(url, TTL, FETCH_TIMEOUT).unwrap());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.decoding_key("k").await })
            })
            .collect();

        for task in tasks {
            // Every caller gets a definitive answer from the shared fetch.
            let err = task.await.unwrap().unwrap_err();
            assert!(matches!(err, JwksError::KeyNotFound { .. }));
        }

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
