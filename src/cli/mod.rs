pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "atrium")]
#[command(about = "Atrium CLI - administrative tooling for the Atrium API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Retire a user: deactivate the account, scrub auth records, drop from the search index"
    )]
    RetireUser(commands::retire::RetireUserArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::RetireUser(args) => commands::retire::execute(args).await,
    }
}
