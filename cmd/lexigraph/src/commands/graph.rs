//! Read-only views over stored edges.

use clap::Args;
use lexigraph_lexicon::DEFAULT_NEIGHBOR_LIMIT;

use super::{get_config, open_lexicon, output, parse_word_list, read_input};
use crate::Cli;

/// Stored neighbors of a word, most similar first.
#[derive(Args)]
pub struct NeighborsCommand {
    /// Word to look up
    word: String,

    /// Maximum neighbors to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_NEIGHBOR_LIMIT)]
    limit: usize,
}

impl NeighborsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let lex = open_lexicon(&cfg, None)?;
        let edges = lex.get_neighbors(&self.word, self.limit)?;
        output(cli).write(&edges)
    }
}

/// Node/link graph for visualization.
///
/// Without words, every stored adjacency list contributes its strongest
/// links. With words, only links inside that set are shown.
#[derive(Args)]
pub struct GraphCommand {
    /// Restrict the graph to these words
    words: Vec<String>,

    /// Read the subset from a file, one word per line ("-" for stdin)
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Links kept per word in the global graph
    #[arg(long, default_value_t = 5)]
    max_links: usize,
}

impl GraphCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let mut words = self.words.clone();
        if let Some(path) = &self.file {
            words.extend(parse_word_list(&read_input(path)?));
        }

        let lex = open_lexicon(&cfg, None)?;
        let view = if words.is_empty() {
            lex.global_graph(self.max_links)?
        } else {
            lex.graph_for_subset(&words)
        };
        output(cli).write(&view)
    }
}
