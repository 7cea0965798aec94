//! Snapshot cache with TTL-based expiry
//!
//! Holds the most recently installed snapshot behind a reader/writer lock.
//! Snapshots are immutable and swapped wholesale, so a reader sees either the
//! previous snapshot or the new one, never a mix.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::models::Snapshot;

#[derive(Debug, Default)]
struct CacheEntry {
    snapshot: Option<Arc<Snapshot>>,
    /// When the snapshot was installed
    last_write: Option<Instant>,
}

impl CacheEntry {
    fn age(&self) -> Option<Duration> {
        self.last_write.map(|at| at.elapsed())
    }
}

/// Latest snapshot plus its install time and TTL
#[derive(Debug)]
pub struct SnapshotCache {
    entry: RwLock<CacheEntry>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(CacheEntry::default()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the cached snapshot
    ///
    /// The write lock is held only for the pointer swap.
    pub async fn install(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let mut entry = self.entry.write().await;
        entry.snapshot = Some(snapshot);
        entry.last_write = Some(Instant::now());
    }

    /// The cached snapshot, unless it is missing or older than the TTL
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        let entry = self.entry.read().await;
        match entry.age() {
            Some(age) if age <= self.ttl => entry.snapshot.clone(),
            _ => None,
        }
    }

    /// Time since the last install, `None` if nothing was ever installed
    pub async fn age(&self) -> Option<Duration> {
        self.entry.read().await.age()
    }

    /// Whether the cache is older than `multiple` TTLs, or empty
    pub async fn is_stale(&self, multiple: u32) -> bool {
        match self.age().await {
            Some(age) => age > self.ttl * multiple,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{App, Snapshot};

    fn snapshot_with_app(name: &str) -> Snapshot {
        Snapshot::new(
            Vec::new(),
            vec![App {
                name: name.to_string(),
                primary_version: "1".to_string(),
                variants: vec!["1".to_string()],
            }],
        )
    }

    #[tokio::test]
    async fn test_empty_cache() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        assert!(cache.current().await.is_none());
        assert!(cache.age().await.is_none());
        assert!(cache.is_stale(2).await);
    }

    #[tokio::test]
    async fn test_install_replaces_snapshot() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        cache.install(snapshot_with_app("first")).await;
        cache.install(snapshot_with_app("second")).await;

        let current = cache.current().await.unwrap();
        assert_eq!(current.apps[0].name, "second");
        assert!(!cache.is_stale(2).await);
    }

    #[tokio::test]
    async fn test_expired_snapshot_is_not_current() {
        let cache = SnapshotCache::new(Duration::from_millis(10));
        cache.install(snapshot_with_app("old")).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.current().await.is_none());
        assert!(cache.is_stale(2).await);
        assert!(cache.age().await.unwrap() >= Duration::from_millis(30));
    }
}
