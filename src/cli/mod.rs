pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "smart-credit")]
#[command(about = "Smart Credit CLI - browse cards and spending bonuses from the terminal")]
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
    #[command(about = "Login, registration and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse the card catalog and add cards you own")]
    Cards {
        #[command(subcommand)]
        cmd: commands::cards::CardsCommands,
    },

    #[command(about = "Show spending bonuses for your cards")]
    Home,

    #[command(about = "Find offers near a location")]
    Nearby {
        #[arg(long, allow_hyphen_values = true, help = "Latitude in degrees")]
        lat: f64,
        #[arg(long, allow_hyphen_values = true, help = "Longitude in degrees")]
        lon: f64,
    },

    #[command(about = "Inspect client configuration")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
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

pub async fn run(cli: Cli, app_config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Config { cmd } => commands::config::handle(cmd, &app_config, output_format),
        Commands::Auth { cmd } => {
            let ctx = config::build_context(app_config, false)?;
            commands::auth::handle(cmd, &ctx, output_format).await
        }
        Commands::Cards { cmd } => {
            let ctx = config::build_context(app_config, true)?;
            commands::cards::handle(cmd, &ctx, output_format).await
        }
        Commands::Home => {
            let ctx = config::build_context(app_config, true)?;
            commands::home::handle(&ctx, output_format).await
        }
        Commands::Nearby { lat, lon } => {
            let ctx = config::build_context(app_config, false)?;
            commands::nearby::handle(&ctx, lat, lon, output_format).await
        }
    }
}
