use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lexigraph_vecstore::{CACHE_SCHEMA_VERSION, CacheEntry, Cluster, VectorStore};
use tracing::{debug, warn};

use crate::card::{Card, CardProvider, HydratedCluster, rehydrate};
use crate::engine::Clusterer;
use crate::error::ClusterError;

type Pending = Shared<BoxFuture<'static, Arc<Vec<Cluster>>>>;

/// Per-key cluster cache with single-flight computation.
///
/// Entries hold word keys only and are joined against live cards on every
/// read. Concurrent misses for one key share a single
/// [`Clusterer::cluster`] call; different keys compute independently.
/// Entries never expire on their own.
pub struct ClusterCache {
    engine: Arc<dyn Clusterer>,
    store: Arc<dyn VectorStore>,
    inflight: Mutex<HashMap<String, Pending>>,
}

impl ClusterCache {
    pub fn new(engine: Arc<dyn Clusterer>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            engine,
            store,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Clusters for `key`, hydrated with the cards `cards` lists for it.
    ///
    /// A readable cache entry is used unless `force_refresh` is set;
    /// unreadable or outdated entries count as misses. Only a card provider
    /// failure is returned as an error.
    pub async fn get(
        &self,
        key: &str,
        cards: &dyn CardProvider,
        force_refresh: bool,
    ) -> Result<Vec<HydratedCluster>, ClusterError> {
        if !force_refresh {
            if let Some(entry) = self.read_entry(key) {
                debug!(key, clusters = entry.clusters.len(), "cluster: cache hit");
                let live = cards.list_cards(key).await?;
                return Ok(rehydrate(&entry.clusters, &live));
            }
        }

        let live = cards.list_cards(key).await?;
        let clusters = self.compute(key, &live, force_refresh).await;
        Ok(rehydrate(&clusters, &live))
    }

    /// Drop the stored entry for `key`.
    pub fn invalidate(&self, key: &str) -> Result<(), ClusterError> {
        self.store.delete_cluster_cache(key)?;
        Ok(())
    }

    /// Number of keys with a computation in flight.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    fn read_entry(&self, key: &str) -> Option<CacheEntry> {
        match self.store.get_cluster_cache(key) {
            Ok(Some(entry)) if entry.version == CACHE_SCHEMA_VERSION && entry.key == key => {
                Some(entry)
            }
            Ok(Some(entry)) => {
                debug!(key, version = entry.version, "cluster: ignoring outdated cache entry");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cluster: cache read failed, recomputing");
                None
            }
        }
    }

    /// Join the computation in flight for `key`, or start one.
    ///
    /// A flight writes its entry before leaving the map, so a caller that
    /// finds no flight re-checks the store under the lock: a burst member
    /// that missed earlier but arrives after the flight finished reuses its
    /// result instead of computing again.
    async fn compute(&self, key: &str, live: &[Card], force_refresh: bool) -> Arc<Vec<Cluster>> {
        let pending = {
            let mut inflight = self.lock();
            match inflight.get(key) {
                Some(p) => {
                    debug!(key, "cluster: joining in-flight computation");
                    p.clone()
                }
                None => {
                    if !force_refresh {
                        if let Some(entry) = self.read_entry(key) {
                            debug!(key, "cluster: entry written by a finished computation");
                            return Arc::new(entry.clusters);
                        }
                    }
                    let p = self.start(key, live);
                    inflight.insert(key.to_string(), p.clone());
                    p
                }
            }
        };

        let clusters = pending.clone().await;

        let mut inflight = self.lock();
        if inflight.get(key).is_some_and(|p| p.ptr_eq(&pending)) {
            inflight.remove(key);
        }
        clusters
    }

    fn start(&self, key: &str, live: &[Card]) -> Pending {
        let mut words: Vec<String> = Vec::with_capacity(live.len());
        let mut seen = HashSet::with_capacity(live.len());
        for card in live {
            let w = card.key();
            if !w.is_empty() && seen.insert(w.clone()) {
                words.push(w);
            }
        }

        let engine = Arc::clone(&self.engine);
        let store = Arc::clone(&self.store);
        let key = key.to_string();
        async move {
            debug!(key = %key, words = words.len(), "cluster: computing");
            let clusters = engine.cluster(&words).await;
            let entry = CacheEntry::new(&key, clusters.clone(), words.len());
            if let Err(e) = store.put_cluster_cache(&key, &entry) {
                warn!(key = %key, error = %e, "cluster: cache write failed");
            }
            Arc::new(clusters)
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Pending>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
