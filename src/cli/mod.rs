mod auth;
mod run;
mod show;

use crate::error::Result;
use clap::{Parser, Subcommand};

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "sheet-loader")]
#[command(about = "Load SQL query results into Google Sheets ranges", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Run { loader } => run::execute(loader.as_deref()).await,
            Commands::Auth { reset } => auth::execute(*reset).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the configured loaders against cached credentials
    Run {
        /// Only run the named loader
        #[arg(long)]
        loader: Option<String>,
    },
    /// Bootstrap Google credentials interactively
    Auth {
        /// Delete cached tokens before authenticating
        #[arg(long)]
        reset: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
