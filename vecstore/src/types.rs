use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema tag written into every [`CacheEntry`]. Entries carrying any other
/// value are ignored on read.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// A word key paired with its L2-normalized embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordVector {
    pub word: String,
    pub vector: Vec<f32>,
}

/// Undirected similarity link between two distinct words.
///
/// Constructed through [`SimilarityEdge::new`], which orders the endpoints so
/// that `a < b`; two edges over the same pair therefore compare equal on
/// [`SimilarityEdge::pair_key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub a: String,
    pub b: String,
    pub similarity: f32,
}

impl SimilarityEdge {
    pub fn new(x: &str, y: &str, similarity: f32) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            a: a.to_string(),
            b: b.to_string(),
            similarity,
        }
    }

    pub fn pair_key(&self) -> String {
        pair_key(&self.a, &self.b)
    }

    /// The endpoint opposite `word`, or `None` if `word` is not an endpoint.
    pub fn other(&self, word: &str) -> Option<&str> {
        if self.a == word {
            Some(&self.b)
        } else if self.b == word {
            Some(&self.a)
        } else {
            None
        }
    }
}

/// Order-independent key for a word pair.
pub fn pair_key(x: &str, y: &str) -> String {
    if x <= y {
        format!("{x}|{y}")
    } else {
        format!("{y}|{x}")
    }
}

/// A thematic group of word keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Representative member.
    pub label: String,

    /// Member word keys, 1 to 30 of them.
    pub items: Vec<String>,

    /// Set on the fallback cluster holding words without a vector.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unembedded: bool,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Persisted result of one clustering run for a cache key (typically a deck).
///
/// Holds word keys only; live card records are joined in at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: u32,
    pub key: String,
    pub clusters: Vec<Cluster>,
    pub updated_at: DateTime<Utc>,
    /// Number of distinct words the clusters were computed from.
    pub source_size: usize,
}

impl CacheEntry {
    pub fn new(key: &str, clusters: Vec<Cluster>, source_size: usize) -> Self {
        Self {
            version: CACHE_SCHEMA_VERSION,
            key: key.to_string(),
            clusters,
            updated_at: Utc::now(),
            source_size,
        }
    }
}
