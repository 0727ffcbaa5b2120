pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cf-scope")]
#[command(about = "Inspect path access rules and tenant query scoping offline")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Classify request paths against the configured deny/allow rules")]
    Classify(commands::classify::ClassifyArgs),

    #[command(about = "Inject tenant-scoping clauses into a query document")]
    Scope(commands::scope::ScopeArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Classify(args) => commands::classify::handle(args, output_format),
        Commands::Scope(args) => commands::scope::handle(args, output_format),
    }
}
