//! Bounded-lifetime record of already-printed posts.
//!
//! The feed returns overlapping windows of recent posts on every poll; this
//! cache is the only thing preventing duplicate prints. Entries expire after
//! [`RETENTION_HOURS`] so the map cannot grow without bound over a run that
//! lasts weeks. Eviction is batched (the loop calls it every few cycles), so
//! an expired entry may linger briefly past the window.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// How long a post id is remembered before it may print again.
pub const RETENTION_HOURS: i64 = 10;

#[derive(Debug, Default)]
pub struct DedupCache {
    seen: HashMap<String, DateTime<Utc>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.seen.contains_key(post_id)
    }

    /// Remember a post id. Re-recording refreshes the timestamp.
    pub fn record(&mut self, post_id: &str, seen_at: DateTime<Utc>) {
        self.seen.insert(post_id.to_string(), seen_at);
    }

    /// Drop every entry older than the retention window. Returns how many
    /// entries were removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::hours(RETENTION_HOURS);
        let before = self.seen.len();
        self.seen.retain(|_, seen_at| *seen_at >= cutoff);
        before - self.seen.len()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn records_and_checks_membership() {
        let mut cache = DedupCache::new();
        assert!(!cache.contains("a"));
        cache.record("a", t0());
        assert!(cache.contains("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entry_survives_until_the_window_closes() {
        let mut cache = DedupCache::new();
        cache.record("a", t0());

        let removed = cache.evict_expired(t0() + Duration::hours(9));
        assert_eq!(removed, 0);
        assert!(cache.contains("a"));
    }

    #[test]
    fn entry_at_exactly_the_window_boundary_stays() {
        let mut cache = DedupCache::new();
        cache.record("a", t0());

        cache.evict_expired(t0() + Duration::hours(RETENTION_HOURS));
        assert!(cache.contains("a"));
    }

    #[test]
    fn entry_past_the_window_is_evicted() {
        let mut cache = DedupCache::new();
        cache.record("a", t0());
        cache.record("b", t0() + Duration::hours(5));

        let removed = cache.evict_expired(t0() + Duration::hours(11));
        assert_eq!(removed, 1);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn evicted_id_can_be_recorded_again() {
        let mut cache = DedupCache::new();
        cache.record("a", t0());
        cache.evict_expired(t0() + Duration::hours(11));
        assert!(cache.is_empty());

        cache.record("a", t0() + Duration::hours(11));
        assert!(cache.contains("a"));
    }

    #[test]
    fn re_recording_refreshes_the_timestamp() {
        let mut cache = DedupCache::new();
        cache.record("a", t0());
        cache.record("a", t0() + Duration::hours(8));

        // Would have expired under the first timestamp.
        cache.evict_expired(t0() + Duration::hours(12));
        assert!(cache.contains("a"));
    }
}
