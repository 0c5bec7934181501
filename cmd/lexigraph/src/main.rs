//! lexigraph - similarity graphs, thematic clusters and study order for
//! vocabulary decks.
//!
//! Vectors are read from a local redb database and, when an embedding
//! endpoint is configured, generated for unknown words on demand.
//!
//! Configuration is stored in ~/.lexigraph/config.yaml.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    ClusterCommand, ClustersCommand, ConfigCommand, EdgesCommand, GraphCommand, ImportCommand,
    NeighborsCommand, SequenceCommand,
};

#[derive(Parser)]
#[command(name = "lexigraph")]
#[command(about = "Vocabulary similarity graph, clustering and sequencing")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.lexigraph/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Import precomputed word vectors
    Import(ImportCommand),
    /// Build and store similarity edges
    Edges(EdgesCommand),
    /// Partition words into thematic clusters
    Cluster(ClusterCommand),
    /// Cached clusters of a deck
    Clusters(ClustersCommand),
    /// Order words for a study session
    Sequence(SequenceCommand),
    /// Stored neighbors of a word
    Neighbors(NeighborsCommand),
    /// Graph projection for visualization
    Graph(GraphCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Import(cmd) => cmd.run(&cli).await,
        Commands::Edges(cmd) => cmd.run(&cli).await,
        Commands::Cluster(cmd) => cmd.run(&cli).await,
        Commands::Clusters(cmd) => cmd.run(&cli).await,
        Commands::Sequence(cmd) => cmd.run(&cli).await,
        Commands::Neighbors(cmd) => cmd.run(&cli).await,
        Commands::Graph(cmd) => cmd.run(&cli).await,
    }
}
