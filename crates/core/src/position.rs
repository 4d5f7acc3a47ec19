//! Position source collaborator.
//!
//! A [`PositionSource`] yields one fresh, best-effort coordinate per request.
//! Implementations must not hand back cached fixes: a stale fix would let a
//! guard prove presence from somewhere they no longer are.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::types::Timestamp;

/// Upper bound on how long a session waits for a position fix.
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// A single position reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters, when the device reports one.
    #[serde(default)]
    pub accuracy_m: Option<f64>,
    /// When the device produced the reading.
    pub fixed_at: Timestamp,
}

/// Why no coordinate could be obtained.
///
/// Every variant means "no reading", which the session renders differently
/// from "reading obtained but too far away".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Geolocation is not supported on this device")]
    Unsupported,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out waiting for a position fix")]
    TimedOut,
}

/// Device capability that produces position fixes.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Request a fresh fix. May wait for the device to produce one.
    async fn current_fix(&self) -> Result<PositionFix, PositionError>;
}

/// Request a fix from `source`, giving up after `timeout`.
///
/// Expiry resolves to [`PositionError::TimedOut`] rather than hanging.
pub async fn acquire_fix(
    source: &dyn PositionSource,
    timeout: Duration,
) -> Result<PositionFix, PositionError> {
    match tokio::time::timeout(timeout, source.current_fix()).await {
        Ok(result) => result,
        Err(_) => Err(PositionError::TimedOut),
    }
}

/// Source that always resolves to the same outcome.
///
/// Useful for tests and for fixed installations (kiosk check-in terminals).
#[derive(Debug, Clone)]
pub struct StaticPositionSource {
    outcome: Result<PositionFix, PositionError>,
}

impl StaticPositionSource {
    pub fn fix(fix: PositionFix) -> Self {
        Self { outcome: Ok(fix) }
    }

    pub fn failing(error: PositionError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl PositionSource for StaticPositionSource {
    async fn current_fix(&self) -> Result<PositionFix, PositionError> {
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    struct NeverResolves;

    #[async_trait]
    impl PositionSource for NeverResolves {
        async fn current_fix(&self) -> Result<PositionFix, PositionError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn static_source_returns_its_fix() {
        let fix = PositionFix {
            coordinate: Coordinate::new(40.7128, -74.0060),
            accuracy_m: Some(4.0),
            fixed_at: Utc::now(),
        };
        let source = StaticPositionSource::fix(fix.clone());
        assert_eq!(acquire_fix(&source, DEFAULT_POSITION_TIMEOUT).await, Ok(fix));
    }

    #[tokio::test]
    async fn static_source_returns_its_failure() {
        let source = StaticPositionSource::failing(PositionError::PermissionDenied);
        assert_eq!(
            acquire_fix(&source, DEFAULT_POSITION_TIMEOUT).await,
            Err(PositionError::PermissionDenied)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hung_source_times_out() {
        let result = acquire_fix(&NeverResolves, DEFAULT_POSITION_TIMEOUT).await;
        assert_eq!(result, Err(PositionError::TimedOut));
    }
}
