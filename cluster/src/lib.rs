//! Thematic clustering of vocabulary words.
//!
//! [`ClusterEngine`] partitions a word set into clusters of 1 to 30 words:
//! connected components of a strong similarity graph, oversized components
//! bisected with k-means, undersized ones pooled and rebalanced with
//! k-means. Words without a vector land in an explicit unembedded cluster.
//!
//! [`ClusterCache`] sits in front of the engine per deck: it stores word
//! keys only, joins them against live [`Card`]s on every read, and makes
//! concurrent requests for the same deck share a single computation.

mod cache;
mod card;
mod engine;
mod error;
mod kmeans;

pub use cache::ClusterCache;
pub use card::{Card, CardProvider, HydratedCluster, LearningState, MemoryCards, rehydrate};
pub use engine::{ClusterConfig, ClusterEngine, Clusterer};
pub use error::ClusterError;
pub use kmeans::kmeans;
