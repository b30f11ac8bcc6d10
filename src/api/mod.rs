pub mod client;

pub use client::ApiClient;

/// Sent on every request so the development tunnel serves JSON, not its interstitial page
pub const TUNNEL_HEADER: &str = "ngrok-skip-browser-warning";
pub const TUNNEL_HEADER_VALUE: &str = "69420";

pub const CATALOG_PATH: &str = "/api/credit-cards";
pub const TOKEN_EXCHANGE_PATH: &str = "/playground/login/";
pub const ADD_CARD_PATH: &str = "/playground/card/";
pub const HOME_FEED_PATH: &str = "/homeviewapi/";
pub const NEARBY_PATH: &str = "/nearbyapi/";
