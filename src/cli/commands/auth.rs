use clap::Subcommand;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in with email and password")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Create an account")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and remove the local session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user profile")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let auth = ctx.auth();

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = prompt_if_missing(password, "Password")?;
            let route = auth.login(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "email": email, "next": route })),
            )
        }
        AuthCommands::Register { name, email, password } => {
            let password = prompt_if_missing(password, "Password")?;
            let route = auth.register(&name, &email, &password).await?;
            output_success(
                &output_format,
                &format!(
                    "Account created for {}. Next: add the cards you own with `smart-credit cards list`",
                    email
                ),
                Some(json!({ "email": email, "next": route })),
            )
        }
        AuthCommands::Logout => {
            let route = auth.sign_out().await?;
            output_success(&output_format, "Signed out", Some(json!({ "next": route })))
        }
        AuthCommands::Status => {
            let status = auth.status()?;
            match output_format {
                OutputFormat::Json => print_json(&status)?,
                OutputFormat::Text => {
                    if status.signed_in {
                        println!("Signed in as {}", status.email.as_deref().unwrap_or("unknown"));
                    } else {
                        println!("Not signed in");
                    }
                    let stored = |present: bool| if present { "stored" } else { "none" };
                    println!("Access token: {}", stored(status.has_access_token));
                    println!("Refresh token: {}", stored(status.has_refresh_token));
                }
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let profile = auth.profile().await?;
            match output_format {
                OutputFormat::Json => print_json(&profile)?,
                OutputFormat::Text => {
                    println!("Name: {}", profile.display_name);
                    println!("Email: {}", profile.email);
                    if let Some(photo) = &profile.photo_url {
                        println!("Photo: {}", photo);
                    }
                }
            }
            Ok(())
        }
    }
}
