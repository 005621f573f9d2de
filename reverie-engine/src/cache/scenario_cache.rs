//! Practice-session cache
//!
//! Same pattern as the analysis cache without a size cap; entries live for
//! 24 hours by default. Distortion order does not affect the key.

use super::{hash_fields, normalize_text, CacheStats, TtlCache};
use crate::scenarios::{PracticeSession, ScenarioRequest};
use chrono::Duration;
use reverie_common::config::{ScenarioSettings, MAX_TTL_HOURS};
use reverie_common::Clock;
use std::sync::Arc;
use tracing::debug;

/// Default entry lifetime
pub const DEFAULT_SCENARIO_TTL_HOURS: i64 = 24;

pub struct ScenarioCache {
    inner: TtlCache<PracticeSession>,
}

impl ScenarioCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_SCENARIO_TTL_HOURS), clock)
    }

    pub fn with_ttl(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: TtlCache::new(ttl, None, clock),
        }
    }

    pub fn from_settings(settings: &ScenarioSettings, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(Duration::hours(settings.ttl_hours.clamp(1, MAX_TTL_HOURS)), clock)
    }

    /// Key over thought, distortion set, emotion and custom instructions
    pub fn key_for(request: &ScenarioRequest) -> String {
        let mut distortions: Vec<String> = request
            .distortions
            .iter()
            .map(|d| normalize_text(d))
            .filter(|d| !d.is_empty())
            .collect();
        distortions.sort();
        distortions.dedup();

        let emotion = request
            .emotion
            .as_deref()
            .map(normalize_text)
            .unwrap_or_default();
        let instructions = request
            .instructions
            .as_deref()
            .map(normalize_text)
            .unwrap_or_default();

        hash_fields(&[
            &normalize_text(&request.thought),
            &distortions.join(","),
            &emotion,
            &instructions,
        ])
    }

    pub fn get(&mut self, key: &str) -> Option<PracticeSession> {
        let hit = self.inner.get(key);
        debug!(key, hit = hit.is_some(), "Scenario cache lookup");
        hit
    }

    pub fn set(&mut self, key: impl Into<String>, session: PracticeSession) {
        self.inner.set(key, session);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::build_offline_session;
    use reverie_common::ManualClock;

    fn request(distortions: &[&str]) -> ScenarioRequest {
        ScenarioRequest {
            thought: "I always mess everything up".to_string(),
            distortions: distortions.iter().map(|d| d.to_string()).collect(),
            emotion: Some("anxious".to_string()),
            instructions: None,
        }
    }

    #[test]
    fn test_key_ignores_distortion_order_and_case() {
        let a = ScenarioCache::key_for(&request(&["Overgeneralization", "Labeling"]));
        let b = ScenarioCache::key_for(&request(&["labeling", "overgeneralization", "Labeling"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_depends_on_every_field() {
        let base = request(&["Labeling"]);
        let base_key = ScenarioCache::key_for(&base);

        let mut other = base.clone();
        other.emotion = None;
        assert_ne!(ScenarioCache::key_for(&other), base_key);

        let mut other = base.clone();
        other.instructions = Some("workplace examples".to_string());
        assert_ne!(ScenarioCache::key_for(&other), base_key);

        let mut other = base;
        other.thought = "Nobody likes me".to_string();
        assert_ne!(ScenarioCache::key_for(&other), base_key);
    }

    #[test]
    fn test_expires_after_a_day() {
        let clock = Arc::new(ManualClock::default());
        let mut cache = ScenarioCache::new(clock.clone());
        let req = request(&["Labeling"]);
        let key = ScenarioCache::key_for(&req);
        cache.set(key.clone(), build_offline_session(&req));

        clock.advance(Duration::hours(23));
        assert!(cache.get(&key).is_some());
        clock.advance(Duration::hours(1));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_from_settings_clamps_non_positive_ttl() {
        let clock = Arc::new(ManualClock::default());
        let settings = ScenarioSettings { ttl_hours: -5 };
        let mut cache = ScenarioCache::from_settings(&settings, clock.clone());
        let req = request(&[]);
        let key = ScenarioCache::key_for(&req);
        cache.set(key.clone(), build_offline_session(&req));

        assert!(cache.get(&key).is_some());
        clock.advance(Duration::hours(1));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_unbounded() {
        let clock = Arc::new(ManualClock::default());
        let mut cache = ScenarioCache::new(clock);
        for i in 0..150 {
            let mut req = request(&["Labeling"]);
            req.thought = format!("thought {}", i);
            cache.set(ScenarioCache::key_for(&req), build_offline_session(&req));
        }
        assert_eq!(cache.len(), 150);
    }
}
