//! Vocabulary embedding core.
//!
//! A [`Lexicon`] owns the vector store, the optional embedder and the card
//! source, and exposes every operation over them: similarity edges, bounded
//! thematic clusters (cached per deck), study ordering, and graph projections
//! for visualization.
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use lexigraph_lexicon::{Lexicon, LexiconConfig};
//! # async fn run(cfg: LexiconConfig) -> Result<(), lexigraph_lexicon::LexiconError> {
//! let lex = Lexicon::new(cfg);
//! lex.build_edges(&["apple", "banana", "cherry"], 0.65, 1).await;
//! let order = lex.sequence(&["apple", "cherry", "banana"]).await;
//! let decks = lex.get_clusters("deck-1", false).await?;
//! # Ok(()) }
//! ```

mod error;
mod lexicon;
mod view;


pub use error::LexiconError;
pub use lexicon::{DEFAULT_NEIGHBOR_LIMIT, Lexicon, LexiconConfig};
pub use view::{GraphLink, GraphNode, GraphView};

pub use lexigraph_chain::JumpConfig;
pub use lexigraph_cluster::{
    Card, CardProvider, ClusterConfig, HydratedCluster, LearningState, MemoryCards,
};
pub use lexigraph_graph::EdgeConfig;
pub use lexigraph_vecstore::{Cluster, SimilarityEdge, WordVector};
