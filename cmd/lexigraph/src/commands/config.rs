//! Configuration management commands.

use clap::{Args, Subcommand};
use lexigraph_cli::{Config, Output, OutputFormat, mask_api_key};

use super::{get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Configuration is stored in ~/.lexigraph/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration (API key masked)
    Show,
    /// Configure the embedding endpoint
    #[command(name = "set-embed")]
    SetEmbed {
        /// API key
        #[arg(long)]
        api_key: Option<String>,
        /// API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Embedding model
        #[arg(long)]
        model: Option<String>,
        /// Vector dimension
        #[arg(long)]
        dimension: Option<usize>,
    },
    /// Set the vector database path
    #[command(name = "set-store")]
    SetStore {
        /// Path to the redb file
        path: String,
        /// Key prefix inside the database
        #[arg(long)]
        prefix: Option<String>,
    },
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::Init { force } => {
                let cfg = get_config(cli)?;
                if cfg.path().exists() && !force {
                    anyhow::bail!(
                        "{} already exists; pass --force to overwrite",
                        cfg.path().display()
                    );
                }
                cfg.save()?;
                print_success(&format!("Wrote {}", cfg.path().display()));
                Ok(())
            }

            ConfigSubcommand::Show => {
                let cfg = get_config(cli)?;
                println!("# {}", cfg.path().display());
                print!("{}", masked_yaml(&cfg)?);
                Ok(())
            }

            ConfigSubcommand::SetEmbed {
                api_key,
                base_url,
                model,
                dimension,
            } => {
                let mut cfg = get_config(cli)?;
                if let Some(v) = api_key {
                    cfg.embed.api_key = v.clone();
                }
                if let Some(v) = base_url {
                    cfg.embed.base_url = v.clone();
                }
                if let Some(v) = model {
                    cfg.embed.model = v.clone();
                }
                if let Some(v) = dimension {
                    cfg.embed.dimension = *v;
                }
                cfg.save()?;
                print_success("Embedding endpoint updated");
                Ok(())
            }

            ConfigSubcommand::SetStore { path, prefix } => {
                let mut cfg = get_config(cli)?;
                cfg.store_path = path.clone();
                if let Some(p) = prefix {
                    cfg.prefix = p.clone();
                }
                cfg.save()?;
                print_success(&format!("Store set to {path}"));
                Ok(())
            }
        }
    }
}

fn masked_yaml(cfg: &Config) -> anyhow::Result<String> {
    let mut shown = cfg.clone();
    if !shown.embed.api_key.is_empty() {
        shown.embed.api_key = mask_api_key(&shown.embed.api_key);
    }
    Output::new(OutputFormat::Yaml, None).render(&shown)
}
