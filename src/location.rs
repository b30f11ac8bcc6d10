use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::types::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Device geolocation: one permission prompt and one position read
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> ClientResult<PermissionStatus>;

    async fn current_position(&self) -> ClientResult<Coordinates>;
}

/// Position supplied up front (command-line flags); permission is implied
#[derive(Debug, Clone)]
pub struct FixedLocation {
    position: Coordinates,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> ClientResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ClientError::config(format!("latitude {} is out of range", latitude)));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ClientError::config(format!("longitude {} is out of range", longitude)));
        }

        Ok(Self {
            position: Coordinates {
                latitude,
                longitude,
                accuracy: None,
            },
        })
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_permission(&self) -> ClientResult<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self) -> ClientResult<Coordinates> {
        Ok(self.position)
    }
}

/// Read one position after asking for permission; a denial is an error
pub async fn locate(provider: &dyn LocationProvider) -> ClientResult<Coordinates> {
    match provider.request_permission().await? {
        PermissionStatus::Granted => provider.current_position().await,
        PermissionStatus::Denied => Err(ClientError::permission_denied(
            "Permission to access location was denied",
        )),
    }
}
