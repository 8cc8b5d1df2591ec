//! Caching decorators for the model-backed ports.
//!
//! Entries are keyed by `<namespace>:v1:<sha256(input \u{1f} history)>`.
//! Cache failures are logged and bypassed; only successful upstream answers
//! are stored.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{AiError, ClaimValidator, IntentClassifier, ResponseCache};

pub const CLASSIFIER_NAMESPACE: &str = "chatgpt";
pub const VALIDATOR_NAMESPACE: &str = "chatgpt_validar";

/// Builds the cache key for one model call.
pub fn cache_key(namespace: &str, input: &str, history: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.update([0x1f]);
    hasher.update(history.as_bytes());
    format!("{}:v1:{:x}", namespace, hasher.finalize())
}

#[derive(Clone)]
struct Memo {
    cache: Arc<dyn ResponseCache>,
    namespace: &'static str,
    ttl: Duration,
}

impl Memo {
    async fn lookup(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(hit) => {
                if hit.is_some() {
                    tracing::debug!(key, "Model answer served from cache");
                }
                hit
            }
            Err(e) => {
                tracing::warn!(error = %e, key, "Cache read failed, calling upstream");
                None
            }
        }
    }

    async fn store(&self, key: &str, value: &str) {
        if let Err(e) = self.cache.put(key, value, self.ttl).await {
            tracing::warn!(error = %e, key, "Cache write failed");
        }
    }
}

/// `IntentClassifier` that memoises answers in a `ResponseCache`.
#[derive(Clone)]
pub struct CachedIntentClassifier {
    inner: Arc<dyn IntentClassifier>,
    memo: Memo,
}

impl CachedIntentClassifier {
    pub fn new(
        inner: Arc<dyn IntentClassifier>,
        cache: Arc<dyn ResponseCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            inner,
            memo: Memo {
                cache,
                namespace: CLASSIFIER_NAMESPACE,
                ttl,
            },
        }
    }
}

#[async_trait]
impl IntentClassifier for CachedIntentClassifier {
    async fn classify(&self, text: &str, history: &str) -> Result<String, AiError> {
        let key = cache_key(self.memo.namespace, text, history);
        if let Some(hit) = self.memo.lookup(&key).await {
            return Ok(hit);
        }

        let answer = self.inner.classify(text, history).await?;
        self.memo.store(&key, &answer).await;
        Ok(answer)
    }
}

/// `ClaimValidator` that memoises verdicts in a `ResponseCache`.
#[derive(Clone)]
pub struct CachedClaimValidator {
    inner: Arc<dyn ClaimValidator>,
    memo: Memo,
}

impl CachedClaimValidator {
    pub fn new(inner: Arc<dyn ClaimValidator>, cache: Arc<dyn ResponseCache>, ttl: Duration) -> Self {
        Self {
            inner,
            memo: Memo {
                cache,
                namespace: VALIDATOR_NAMESPACE,
                ttl,
            },
        }
    }
}

#[async_trait]
impl ClaimValidator for CachedClaimValidator {
    async fn validate(&self, description: &str, history: &str) -> Result<String, AiError> {
        let key = cache_key(self.memo.namespace, description, history);
        if let Some(hit) = self.memo.lookup(&key).await {
            return Ok(hit);
        }

        let answer = self.inner.validate(description, history).await?;
        self.memo.store(&key, &answer).await;
        Ok(answer)
    }
}

impl std::fmt::Debug for CachedIntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedIntentClassifier")
            .field("ttl", &self.memo.ttl)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for CachedClaimValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedClaimValidator")
            .field("ttl", &self.memo.ttl)
            .finish_non_exhaustive()
    }
}
