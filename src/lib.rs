pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod location;
pub mod session;
pub mod types;
pub mod validation;

pub use app::{AppContext, Route};
pub use error::{ClientError, ClientResult};
