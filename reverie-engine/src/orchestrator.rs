//! Analysis orchestration
//!
//! **Flow:** exact cache hit → similar cache hit → external analyzer →
//! cache write. Any analyzer failure (quota, network, bad response) is
//! absorbed here: the offline analyzer's result is returned instead and is
//! never written to the cache, so a later request can still reach the
//! external service.
//!
//! # Concurrency
//! Caches sit behind `tokio::sync::Mutex` and are never locked across the
//! external call. A per-key in-flight table makes identical concurrent
//! requests wait for the first one, which then leaves its result in the
//! cache for the others to pick up.

use crate::cache::{AnalysisCache, CacheStats};
use crate::fallback::analyze_offline;
use crate::types::{
    AnalysisResult, AnalyzerError, EngineError, EngineResult, TextAnalyzer, MAX_SUGGESTED_TAGS,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Default similarity threshold for near-duplicate cache hits
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

// ============================================================================
// In-flight de-duplication
// ============================================================================

type KeyLock = Arc<Mutex<()>>;

/// Per-key async locks; entries are dropped once no request holds or awaits them
#[derive(Default)]
pub(crate) struct InFlight {
    locks: StdMutex<HashMap<String, KeyLock>>,
}

impl InFlight {
    /// Wait for exclusive use of `key`
    pub(crate) async fn acquire(&self, key: &str) -> InFlightGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        InFlightGuard {
            owner: self,
            key: key.to_string(),
            _guard: guard,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub(crate) struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.owner.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the table and this guard still reference the lock
        let idle = locks
            .get(&self.key)
            .map_or(false, |lock| Arc::strong_count(lock) <= 2);
        if idle {
            locks.remove(&self.key);
        }
    }
}

// ============================================================================
// Analysis Orchestrator
// ============================================================================

/// Where a returned analysis came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Cache,
    SimilarCache,
    External,
    Offline,
}

/// Cache → external analyzer → offline analyzer
pub struct AnalysisOrchestrator {
    analyzer: Option<Arc<dyn TextAnalyzer>>,
    cache: Mutex<AnalysisCache>,
    in_flight: InFlight,
    similarity_threshold: f64,
}

impl AnalysisOrchestrator {
    /// `analyzer = None` runs fully offline (results are still never cached)
    pub fn new(analyzer: Option<Arc<dyn TextAnalyzer>>, cache: AnalysisCache) -> Self {
        Self {
            analyzer,
            cache: Mutex::new(cache),
            in_flight: InFlight::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Analyze a journal entry
    ///
    /// Only blank input is an error; every analysis failure falls back.
    pub async fn analyze(&self, title: &str, content: &str) -> EngineResult<AnalysisResult> {
        self.analyze_with_source(title, content)
            .await
            .map(|(result, _)| result)
    }

    /// [`analyze`](Self::analyze) that also reports where the result came from
    pub async fn analyze_with_source(
        &self,
        title: &str,
        content: &str,
    ) -> EngineResult<(AnalysisResult, AnalysisSource)> {
        if title.trim().is_empty() && content.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "journal entry has neither title nor content".to_string(),
            ));
        }

        let key = AnalysisCache::key_for(title, content);
        if let Some(hit) = self.lookup_cache(&key, title, content).await {
            return Ok(hit);
        }

        let Some(analyzer) = self.analyzer.as_ref() else {
            debug!("No external analyzer configured, analyzing offline");
            return Ok((offline_result(title, content)?, AnalysisSource::Offline));
        };

        let _guard = self.in_flight.acquire(&key).await;
        // A concurrent request for the same key may have finished meanwhile
        if let Some(result) = self.cache.lock().await.get(&key) {
            return Ok((result, AnalysisSource::Cache));
        }

        match analyzer.analyze(title, content).await.and_then(accept) {
            Ok(result) => {
                info!(analyzer = analyzer.name(), key = %key, "External analysis complete");
                self.cache
                    .lock()
                    .await
                    .set_with_key(key, title, content, result.clone());
                Ok((result, AnalysisSource::External))
            }
            Err(e) => {
                if e.is_quota_exhausted() {
                    warn!(analyzer = analyzer.name(), error = %e, "Analysis quota exhausted, using offline analyzer");
                } else {
                    warn!(analyzer = analyzer.name(), error = %e, "External analysis failed, using offline analyzer");
                }
                Ok((offline_result(title, content)?, AnalysisSource::Offline))
            }
        }
    }

    async fn lookup_cache(
        &self,
        key: &str,
        title: &str,
        content: &str,
    ) -> Option<(AnalysisResult, AnalysisSource)> {
        let mut cache = self.cache.lock().await;
        if let Some(result) = cache.get(key) {
            return Some((result, AnalysisSource::Cache));
        }
        cache
            .find_similar(title, content, self.similarity_threshold)
            .map(|result| (result, AnalysisSource::SimilarCache))
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }
}

/// Offline analysis, held to the same shape external results must have
fn offline_result(title: &str, content: &str) -> EngineResult<AnalysisResult> {
    ensure_well_formed(analyze_offline(title, content))
}

fn ensure_well_formed(result: AnalysisResult) -> EngineResult<AnalysisResult> {
    if result.is_well_formed() {
        return Ok(result);
    }
    Err(EngineError::Internal(format!(
        "offline analysis produced {} tags and sentiment {:?}",
        result.suggested_tags.len(),
        result.sentiment
    )))
}

/// Normalize an external result; reject what cannot be normalized
fn accept(mut result: AnalysisResult) -> Result<AnalysisResult, AnalyzerError> {
    result.suggested_tags.truncate(MAX_SUGGESTED_TAGS);
    if !result.sentiment.is_normalized() {
        return Err(AnalyzerError::InvalidResponse(format!(
            "sentiment does not sum to 100: {:?}",
            result.sentiment
        )));
    }
    Ok(result)
}
