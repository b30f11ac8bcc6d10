use clap::Parser;
use smart_credit::cli::utils::output_client_error;
use smart_credit::cli::{Cli, OutputFormat};
use smart_credit::config::AppConfig;
use smart_credit::ClientError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so SMART_CREDIT_API_URL and friends can live next to the binary
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    let result = match AppConfig::from_env() {
        Ok(config) => smart_credit::cli::run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        match e.downcast_ref::<ClientError>() {
            Some(client_error) => output_client_error(&output_format, client_error)?,
            None => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
