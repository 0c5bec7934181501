//! Similarity graph construction.
//!
//! [`EdgeBuilder`] resolves a vector for every word (embedding and persisting
//! the missing ones) and selects undirected [`SimilarityEdge`]s by threshold,
//! topping up each word to a minimum number of connections.
//!
//! [`SimilarityEdge`]: lexigraph_vecstore::SimilarityEdge

mod components;
mod edges;
mod resolve;
mod words;

#[cfg(test)]
pub(crate) mod testutil;

pub use components::connected_components;
pub use edges::{EdgeBuilder, EdgeConfig, compute_edges};
pub use resolve::VectorMap;
pub use words::normalize_words;
