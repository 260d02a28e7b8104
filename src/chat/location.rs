use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::Coordinates;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the device position attached to each submission.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Position fixed in configuration (`DIAGNOAI_LATITUDE`/`DIAGNOAI_LONGITUDE`).
pub struct ConfiguredLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Used when the platform offers no position at all.
pub struct UnavailableLocation;

#[async_trait]
impl LocationProvider for UnavailableLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Denied)
    }
}

/// Ask `provider` for a position, never failing.
///
/// Denial, errors and timeouts all yield [`Coordinates::UNKNOWN`] so that a
/// submission always goes out.
pub async fn resolve_coordinates(provider: &dyn LocationProvider, timeout: Duration) -> Coordinates {
    match tokio::time::timeout(timeout, provider.locate()).await {
        Ok(Ok(coordinates)) => coordinates,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "location unavailable, sending zero coordinates");
            Coordinates::UNKNOWN
        }
        Err(_) => {
            tracing::warn!(?timeout, "location request timed out, sending zero coordinates");
            Coordinates::UNKNOWN
        }
    }
}
