use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

pub async fn handle(ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut home = ctx.home();
    let feed = home.on_activate().await?;

    if feed.is_empty() {
        return output_empty_collection(
            &output_format,
            "cards",
            "No cards yet. Add one with `smart-credit cards add <card_key>`",
        );
    }

    match output_format {
        OutputFormat::Json => print_json(&feed)?,
        OutputFormat::Text => {
            for item in feed {
                println!("{}", item.card_name);
                for category in &item.spend_bonus_categories {
                    match &category.spend_bonus_category_name {
                        Some(name) => println!("  [{}] {}", name, category.spend_bonus_desc),
                        None => println!("  {}", category.spend_bonus_desc),
                    }
                }
            }
        }
    }
    Ok(())
}
