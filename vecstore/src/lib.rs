pub mod cosine;
pub mod error;
pub mod keys;
pub mod store;
pub mod types;

pub use cosine::{cosine_distance, dot, normalize, normalized};
pub use error::StoreError;
pub use store::{KvVectorStore, VectorStore};
pub use types::{CACHE_SCHEMA_VERSION, CacheEntry, Cluster, SimilarityEdge, WordVector, pair_key};
