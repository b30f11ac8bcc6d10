use serde_json::Value;
use tracing::debug;

use super::AppContext;
use crate::error::ClientResult;
use crate::location::{locate, LocationProvider};

/// Offers near the device's current position
pub async fn nearby_offers(
    ctx: &AppContext,
    location: &dyn LocationProvider,
) -> ClientResult<Value> {
    let position = locate(location).await?;
    debug!(
        "Requesting offers near {:.4}, {:.4}",
        position.latitude, position.longitude
    );
    ctx.api.nearby_offers(&position).await
}
