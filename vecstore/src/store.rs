use std::sync::Arc;

use lexigraph_kv::KVStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cosine::normalized;
use crate::error::StoreError;
use crate::keys::{cluster_cache_key, edge_key, edge_prefix, vector_key, vector_prefix};
use crate::types::{CacheEntry, SimilarityEdge};

/// Durable word -> vector and word -> adjacency storage, plus the cluster
/// cache.
///
/// Writes must be durable before returning. Per-word writes are independent;
/// concurrent writers of the same word resolve last-write-wins.
pub trait VectorStore: Send + Sync {
    /// Stored vector for `word`, if any.
    fn get_vector(&self, word: &str) -> Result<Option<Vec<f32>>, StoreError>;

    /// Store `vector` for `word`. The vector is normalized before writing.
    fn put_vector(&self, word: &str, vector: &[f32]) -> Result<(), StoreError>;

    /// Words that have a stored vector, sorted.
    fn vector_words(&self) -> Result<Vec<String>, StoreError>;

    /// Stored adjacency list for `word`. Empty when none was stored.
    fn get_edges(&self, word: &str) -> Result<Vec<SimilarityEdge>, StoreError>;

    /// Replace the adjacency list for `word`.
    fn put_edges(&self, word: &str, edges: &[SimilarityEdge]) -> Result<(), StoreError>;

    /// Words that have a stored adjacency list, sorted.
    fn edge_words(&self) -> Result<Vec<String>, StoreError>;

    fn get_cluster_cache(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    fn put_cluster_cache(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError>;

    fn delete_cluster_cache(&self, key: &str) -> Result<(), StoreError>;
}

/// [`VectorStore`] over any [`KVStore`], with msgpack-encoded values.
pub struct KvVectorStore {
    kv: Arc<dyn KVStore>,
    prefix: String,
}

impl KvVectorStore {
    pub fn new(kv: Arc<dyn KVStore>, prefix: &str) -> Self {
        Self {
            kv,
            prefix: prefix.to_string(),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(key)? {
            Some(bytes) => Ok(Some(rmp_serde::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = rmp_serde::to_vec_named(value)?;
        self.kv.set(key, &bytes)?;
        Ok(())
    }

    fn words_under(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .kv
            .scan_keys(prefix)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(prefix).map(str::to_string))
            .collect())
    }
}

impl VectorStore for KvVectorStore {
    fn get_vector(&self, word: &str) -> Result<Option<Vec<f32>>, StoreError> {
        self.read(&vector_key(&self.prefix, word))
    }

    fn put_vector(&self, word: &str, vector: &[f32]) -> Result<(), StoreError> {
        self.write(&vector_key(&self.prefix, word), &normalized(vector))
    }

    fn vector_words(&self) -> Result<Vec<String>, StoreError> {
        self.words_under(&vector_prefix(&self.prefix))
    }

    fn get_edges(&self, word: &str) -> Result<Vec<SimilarityEdge>, StoreError> {
        Ok(self
            .read(&edge_key(&self.prefix, word))?
            .unwrap_or_default())
    }

    fn put_edges(&self, word: &str, edges: &[SimilarityEdge]) -> Result<(), StoreError> {
        self.write(&edge_key(&self.prefix, word), edges)
    }

    fn edge_words(&self) -> Result<Vec<String>, StoreError> {
        self.words_under(&edge_prefix(&self.prefix))
    }

    fn get_cluster_cache(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        self.read(&cluster_cache_key(&self.prefix, key))
    }

    fn put_cluster_cache(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        self.write(&cluster_cache_key(&self.prefix, key), entry)
    }

    fn delete_cluster_cache(&self, key: &str) -> Result<(), StoreError> {
        self.kv.delete(&cluster_cache_key(&self.prefix, key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cluster;
    use lexigraph_kv::{MemoryStore, RedbStore};

    fn memory_store() -> (MemoryStore, KvVectorStore) {
        let kv = MemoryStore::new();
        let store = KvVectorStore::new(Arc::new(kv.clone()), "lx");
        (kv, store)
    }

    #[test]
    fn vectors_are_normalized_on_write() {
        let (_, store) = memory_store();
        store.put_vector("apple", &[3.0, 4.0]).unwrap();
        let v = store.get_vector("apple").unwrap().unwrap();
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(store.get_vector("pear").unwrap(), None);
    }

    #[test]
    fn edges_round_trip_and_enumerate() {
        let (_, store) = memory_store();
        let edges = vec![SimilarityEdge::new("apple", "banana", 0.9)];
        store.put_edges("apple", &edges).unwrap();
        store.put_edges("banana", &edges).unwrap();
        store.put_vector("cherry", &[1.0]).unwrap();

        assert_eq!(store.get_edges("apple").unwrap(), edges);
        assert!(store.get_edges("cherry").unwrap().is_empty());
        assert_eq!(store.edge_words().unwrap(), vec!["apple", "banana"]);
        assert_eq!(store.vector_words().unwrap(), vec!["cherry"]);
    }

    #[test]
    fn corrupt_cache_entry_is_a_decode_error() {
        let (kv, store) = memory_store();
        kv.set("lx:cc:deck", b"\xc1not msgpack").unwrap();
        assert!(matches!(
            store.get_cluster_cache("deck"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn cluster_cache_persists_in_redb() {
        let dir = tempfile::tempdir().unwrap();
        let kv = RedbStore::open(dir.path().join("lx.redb")).unwrap();
        let store = KvVectorStore::new(Arc::new(kv), "lx");

        let entry = CacheEntry::new(
            "deck-1",
            vec![Cluster {
                label: "apple".into(),
                items: vec!["apple".into(), "banana".into()],
                unembedded: false,
            }],
            2,
        );
        store.put_cluster_cache("deck-1", &entry).unwrap();
        assert_eq!(store.get_cluster_cache("deck-1").unwrap(), Some(entry));

        store.delete_cluster_cache("deck-1").unwrap();
        assert_eq!(store.get_cluster_cache("deck-1").unwrap(), None);
    }
}
