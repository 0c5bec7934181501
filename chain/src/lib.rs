//! Study-order sequencing.
//!
//! [`ChainSequencer`] orders a word set so consecutive words tend to be
//! semantically related: a depth-first walk over the dense similarity graph
//! that always steps to the most similar unvisited neighbor, with a
//! recency-weighted global jump when the walk gets stuck. This is a greedy
//! heuristic, not an optimal path.

mod sequencer;

pub use sequencer::{ChainSequencer, JumpConfig};
