use clap::Subcommand;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum CardsCommands {
    #[command(about = "List catalog cards grouped by issuer")]
    List {
        #[arg(long, help = "Only issuers with a card name containing this text")]
        search: Option<String>,
    },

    #[command(about = "Add a card you own by its card key")]
    Add {
        #[arg(help = "Card key as shown by `cards list`")]
        card_key: String,
    },
}

pub async fn handle(
    cmd: CardsCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut controller = ctx.add_card();
    controller.activate().await;

    match cmd {
        CardsCommands::List { search } => {
            controller.set_search_term(search.unwrap_or_default());
            let grouped = controller.sections();

            if grouped.sections.is_empty() {
                return output_empty_collection(&output_format, "sections", "No cards found");
            }

            match output_format {
                OutputFormat::Json => print_json(&grouped)?,
                OutputFormat::Text => {
                    for section in &grouped.sections {
                        println!("{}", section.card_issuer);
                        for card in &section.card {
                            println!("  {:<30} {}", card.card_key, card.card_name);
                        }
                    }
                    if !grouped.skipped.is_empty() {
                        println!();
                        println!("({} malformed catalog entries hidden)", grouped.skipped.len());
                    }
                }
            }
            Ok(())
        }
        CardsCommands::Add { card_key } => {
            let response = controller.add_card(&card_key).await?;
            output_success(
                &output_format,
                &format!("Added {}", card_key),
                Some(json!({ "card_key": card_key, "response": response })),
            )
        }
    }
}
