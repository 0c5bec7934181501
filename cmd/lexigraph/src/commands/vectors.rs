//! Vector import and edge building.

use clap::Args;
use lexigraph_lexicon::WordVector;

use super::{WordsArgs, get_config, open_lexicon, output, print_success, read_input};
use crate::Cli;

/// Import precomputed word vectors.
///
/// The input is a JSON array of `{"word": ..., "vector": [...]}` objects.
/// Vectors are normalized before they are stored; existing vectors for the
/// same words are replaced.
#[derive(Args)]
pub struct ImportCommand {
    /// JSON file with word vectors ("-" for stdin)
    path: String,
}

impl ImportCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let vectors: Vec<WordVector> = serde_json::from_str(&read_input(&self.path)?)?;
        let lex = open_lexicon(&cfg, None)?;
        let written = lex.import_vectors(&vectors)?;
        print_success(&format!("Imported {written} vectors"));
        Ok(())
    }
}

/// Build similarity edges and store each word's adjacency.
///
/// Words without a stored vector are embedded first when an embedding
/// endpoint is configured.
#[derive(Args)]
pub struct EdgesCommand {
    #[command(flatten)]
    words: WordsArgs,

    /// Minimum similarity (default from config)
    #[arg(long)]
    threshold: Option<f32>,

    /// Minimum edges per word (default from config)
    #[arg(long)]
    min_connections: Option<usize>,
}

impl EdgesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let words = self.words.load()?;
        let threshold = self.threshold.unwrap_or(cfg.edges.threshold);
        let min_connections = self.min_connections.unwrap_or(cfg.edges.min_connections);

        let lex = open_lexicon(&cfg, None)?;
        let edges = lex.build_edges(&words, threshold, min_connections).await;
        print_success(&format!("Stored {} edges over {} words", edges.len(), words.len()));
        output(cli).write(&edges)
    }
}
