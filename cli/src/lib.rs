//! CLI utilities for lexigraph.
//!
//! Configuration lives in `~/.lexigraph/config.yaml`; the vector database
//! defaults to `~/.lexigraph/data/lexigraph.redb`.

pub mod config;
pub mod output;
pub mod paths;

pub use config::{Config, load_config, mask_api_key};
pub use output::{Output, OutputFormat, print_info, print_success};
pub use paths::Paths;
