use crate::app::nearby::nearby_offers;
use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::location::FixedLocation;

pub async fn handle(
    ctx: &AppContext,
    lat: f64,
    lon: f64,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let location = FixedLocation::new(lat, lon)?;
    let offers = nearby_offers(ctx, &location).await?;

    match output_format {
        OutputFormat::Json => print_json(&offers)?,
        OutputFormat::Text => match offers.as_array() {
            Some(items) if items.is_empty() => println!("No offers nearby"),
            Some(items) => {
                for item in items {
                    println!("{}", serde_json::to_string(item)?);
                }
            }
            None => print_json(&offers)?,
        },
    }
    Ok(())
}
