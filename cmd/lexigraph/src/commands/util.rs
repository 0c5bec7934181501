//! Shared helpers for commands.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;
use lexigraph_cli::{Config, Output, OutputFormat, load_config};
use lexigraph_embed::{Embedder, OpenAI};
use lexigraph_kv::RedbStore;
use lexigraph_lexicon::{CardProvider, Lexicon, LexiconConfig, MemoryCards};
use lexigraph_vecstore::{KvVectorStore, VectorStore};

use crate::Cli;

pub use lexigraph_cli::{print_info, print_success};

/// Words given inline or read from a file.
#[derive(Args, Debug, Clone)]
pub struct WordsArgs {
    /// Words to process
    pub words: Vec<String>,

    /// Read words from a file, one per line ("-" for stdin)
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,
}

impl WordsArgs {
    pub fn load(&self) -> anyhow::Result<Vec<String>> {
        let mut words = self.words.clone();
        if let Some(path) = &self.file {
            let text = read_input(path)?;
            words.extend(parse_word_list(&text));
        }
        if words.is_empty() {
            anyhow::bail!("no words given; pass them as arguments or with --file");
        }
        Ok(words)
    }
}

/// One word per line; blank lines and `#` comments are skipped.
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads a file, or stdin for "-".
pub fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

/// Gets the configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Output settings from global flags.
pub fn output(cli: &Cli) -> Output {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    Output::new(format, cli.output.clone())
}

/// Opens the configured store and builds a [`Lexicon`] over it.
pub fn open_lexicon(cfg: &Config, cards: Option<Arc<dyn CardProvider>>) -> anyhow::Result<Lexicon> {
    let path = cfg.resolved_store_path()?;
    let kv = RedbStore::open(&path)
        .with_context(|| format!("failed to open store {}", path.display()))?;
    let store: Arc<dyn VectorStore> =
        Arc::new(KvVectorStore::new(Arc::new(kv), cfg.resolved_prefix()));

    let embedder = if cfg.embed.is_configured() {
        Some(Arc::new(OpenAI::from_config(cfg.embed.clone())) as Arc<dyn Embedder>)
    } else {
        tracing::debug!("no embedding endpoint configured, using stored vectors only");
        None
    };

    Ok(Lexicon::new(LexiconConfig {
        store,
        embedder,
        cards: cards.unwrap_or_else(|| Arc::new(MemoryCards::new())),
        edge: cfg.edges.clone(),
        cluster: cfg.cluster.clone(),
        chain: cfg.chain.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_list_skips_blanks_and_comments() {
        let words = parse_word_list("apple\n\n  # fruit\n banana \n");
        assert_eq!(words, vec!["apple", "banana"]);
    }

    #[test]
    fn words_from_args_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "cherry\n").unwrap();

        let args = WordsArgs {
            words: vec!["apple".into()],
            file: Some(path.to_string_lossy().into_owned()),
        };
        assert_eq!(args.load().unwrap(), vec!["apple", "cherry"]);

        let empty = WordsArgs {
            words: vec![],
            file: None,
        };
        assert!(empty.load().is_err());
    }
}
