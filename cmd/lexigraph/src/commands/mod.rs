//! CLI commands module.

mod cluster;
mod config;
mod graph;
mod sequence;
mod util;
mod vectors;

pub use cluster::{ClusterCommand, ClustersCommand};
pub use config::ConfigCommand;
pub use graph::{GraphCommand, NeighborsCommand};
pub use sequence::SequenceCommand;
pub use vectors::{EdgesCommand, ImportCommand};

pub(crate) use util::*;
