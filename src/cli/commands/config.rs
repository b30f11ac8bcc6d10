use clap::Subcommand;
use serde_json::json;

use crate::cli::config::session_file;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show,
}

pub fn handle(
    cmd: ConfigCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let session_path = session_file(config)?;
            let api_key_set = !config.identity.api_key.is_empty();

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "environment": config.environment,
                        "api_url": config.api.base_url.as_str(),
                        "identity_url": config.identity.identity_url.as_str(),
                        "secure_token_url": config.identity.secure_token_url.as_str(),
                        "firebase_api_key_set": api_key_set,
                        "session_file": session_path,
                    }))?);
                }
                OutputFormat::Text => {
                    println!("Environment: {:?}", config.environment);
                    println!("API URL: {}", config.api.base_url);
                    println!("Identity URL: {}", config.identity.identity_url);
                    println!("Secure token URL: {}", config.identity.secure_token_url);
                    println!("Firebase API key: {}", if api_key_set { "set" } else { "not set" });
                    println!("Session file: {}", session_path.display());
                }
            }
            Ok(())
        }
    }
}
