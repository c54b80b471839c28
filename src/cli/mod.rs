pub mod commands;
pub mod config;
pub mod session;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use session::CliSession;

#[derive(Parser)]
#[command(name = "rentease")]
#[command(about = "RentEase CLI - browse and manage rental listings from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign up and manage the saved session")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse available listings")]
    Properties {
        #[command(subcommand)]
        cmd: commands::properties::PropertiesCommands,
    },

    #[command(about = "Manage your own listings (owner role)")]
    Owner {
        #[command(subcommand)]
        cmd: commands::owner::OwnerCommands,
    },

    #[command(about = "Moderate users, listings and messages (admin role)")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Send a message to the RentEase team")]
    Contact(commands::contact::ContactArgs),

    #[command(about = "Show the navigation available to the current session")]
    Nav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Properties { cmd } => commands::properties::handle(cmd, output_format).await,
        Commands::Owner { cmd } => commands::owner::handle(cmd, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, output_format).await,
        Commands::Contact(args) => commands::contact::handle(args, output_format).await,
        Commands::Nav => commands::nav::handle(output_format).await,
    }
}
