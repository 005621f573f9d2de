//! Analysis result cache
//!
//! Exact hits are keyed by a SHA-256 of the normalized title and content.
//! Short entries can also hit through [`AnalysisCache::find_similar`], a
//! Jaccard comparison over word sets that is computed once at insertion.

use super::{hash_fields, normalize_text, CacheStats, TtlCache};
use crate::types::AnalysisResult;
use chrono::Duration;
use reverie_common::config::{AnalysisSettings, MAX_TTL_HOURS};
use reverie_common::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Default entry lifetime (7 days)
pub const DEFAULT_TTL_HOURS: i64 = 168;

/// Default maximum number of cached results
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Entries with longer content never take part in similarity matching
pub const SIMILARITY_CONTENT_LIMIT: usize = 1000;

/// Tokens shorter than this are ignored for similarity
const MIN_TOKEN_LEN: usize = 4;

#[derive(Debug, Clone)]
struct StoredAnalysis {
    result: AnalysisResult,
    tokens: HashSet<String>,
}

/// Cache of analysis results keyed by entry content
pub struct AnalysisCache {
    inner: TtlCache<StoredAnalysis>,
}

impl AnalysisCache {
    /// Cache with the default 7-day TTL and 100-entry cap
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(
            Duration::hours(DEFAULT_TTL_HOURS),
            DEFAULT_MAX_ENTRIES,
            clock,
        )
    }

    pub fn with_limits(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: TtlCache::new(ttl, Some(max_entries.max(1)), clock),
        }
    }

    /// Build from the `[analysis]` config section
    pub fn from_settings(settings: &AnalysisSettings, clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(
            Duration::hours(settings.ttl_hours.clamp(1, MAX_TTL_HOURS)),
            settings.max_entries,
            clock,
        )
    }

    /// Content key for a journal entry
    ///
    /// Title and content are trimmed, lowercased and whitespace-collapsed, so
    /// inputs differing only in those respects share a key.
    pub fn key_for(title: &str, content: &str) -> String {
        hash_fields(&[&normalize_text(title), &normalize_text(content)])
    }

    /// Exact lookup by precomputed key
    pub fn get(&mut self, key: &str) -> Option<AnalysisResult> {
        let hit = self.inner.get(key).map(|stored| stored.result);
        debug!(key, hit = hit.is_some(), "Analysis cache lookup");
        hit
    }

    /// Store a result under its content key
    pub fn set(&mut self, title: &str, content: &str, result: AnalysisResult) {
        let key = Self::key_for(title, content);
        self.set_with_key(key, title, content, result);
    }

    pub fn set_with_key(
        &mut self,
        key: impl Into<String>,
        title: &str,
        content: &str,
        result: AnalysisResult,
    ) {
        let tokens = tokenize(title, content);
        self.inner.set(key, StoredAnalysis { result, tokens });
    }

    /// Best live entry whose word set is at least `threshold` similar
    ///
    /// Skipped entirely when `content` exceeds [`SIMILARITY_CONTENT_LIMIT`]
    /// characters. Ties go to the earliest-inserted entry. Matching does not
    /// refresh the matched entry's TTL.
    pub fn find_similar(
        &mut self,
        title: &str,
        content: &str,
        threshold: f64,
    ) -> Option<AnalysisResult> {
        if content.chars().count() > SIMILARITY_CONTENT_LIMIT {
            return None;
        }

        let query = tokenize(title, content);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &AnalysisResult)> = None;
        for (_, entry) in self.inner.iter_live() {
            let score = jaccard(&query, &entry.value.tokens);
            if score >= threshold && best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, &entry.value.result));
            }
        }

        let found = best.map(|(score, result)| {
            debug!(score, "Similar analysis found in cache");
            result.clone()
        });
        if found.is_some() {
            self.inner.record_similar_hit();
        }
        found
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn purge_expired(&mut self) -> usize {
        self.inner.purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

/// Word set used for similarity: punctuation stripped, lowercased, short words dropped
pub fn tokenize(title: &str, content: &str) -> HashSet<String> {
    let text: String = format!("{} {}", title, content)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    text.split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
