use clap::Args;

use super::{WordsArgs, get_config, open_lexicon, output};
use crate::Cli;

/// Order words so consecutive ones are related.
#[derive(Args)]
pub struct SequenceCommand {
    #[command(flatten)]
    words: WordsArgs,
}

impl SequenceCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let words = self.words.load()?;
        let lex = open_lexicon(&cfg, None)?;
        let order = lex.sequence(&words).await;
        output(cli).write(&order)
    }
}
