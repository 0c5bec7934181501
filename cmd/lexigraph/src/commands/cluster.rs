//! Clustering commands.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use lexigraph_lexicon::{Card, CardProvider, MemoryCards};

use super::{WordsArgs, get_config, open_lexicon, output, print_info, print_success, read_input};
use crate::Cli;

/// Partition words into thematic clusters (not cached).
#[derive(Args)]
pub struct ClusterCommand {
    #[command(flatten)]
    words: WordsArgs,
}

impl ClusterCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let words = self.words.load()?;
        let lex = open_lexicon(&cfg, None)?;
        let clusters = lex.cluster(&words).await;
        print_info(&format!("{} words in {} clusters", words.len(), clusters.len()));
        output(cli).write(&clusters)
    }
}

/// Cached clusters of a deck, joined against its cards.
///
/// The deck file is a JSON array of cards:
/// `{"id": ..., "word": ..., "learning_state": "review", "is_familiar": false}`.
#[derive(Args)]
pub struct ClustersCommand {
    /// JSON file with the deck's cards ("-" for stdin)
    deck: String,

    /// Cache key (default: the deck file name without extension)
    #[arg(long)]
    key: Option<String>,

    /// Recompute even when a cached partition exists
    #[arg(long)]
    refresh: bool,

    /// Drop the cached partition and exit
    #[arg(long, conflicts_with = "refresh")]
    invalidate: bool,
}

impl ClustersCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let key = self.cache_key()?;

        if self.invalidate {
            let lex = open_lexicon(&cfg, None)?;
            lex.invalidate_clusters(&key)?;
            print_success(&format!("Dropped cached clusters for \"{key}\""));
            return Ok(());
        }

        let cards: Vec<Card> = serde_json::from_str(&read_input(&self.deck)?)?;
        let provider = MemoryCards::new();
        provider.set_deck(&key, cards)?;

        let lex = open_lexicon(&cfg, Some(Arc::new(provider) as Arc<dyn CardProvider>))?;
        let clusters = lex.get_clusters(&key, self.refresh).await?;
        output(cli).write(&clusters)
    }

    fn cache_key(&self) -> anyhow::Result<String> {
        if let Some(k) = &self.key {
            return Ok(k.clone());
        }
        Path::new(&self.deck)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty() && *s != "-")
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("--key is required when reading the deck from stdin"))
    }
}
