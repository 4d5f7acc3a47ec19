//! File-backed position source.
//!
//! The device's location daemon writes its latest reading to a JSON file:
//!
//! ```json
//! { "latitude": 40.7128, "longitude": -74.006, "accuracy_m": 4.0,
//!   "fixed_at": "2026-03-01T09:00:00Z" }
//! ```
//!
//! A request only accepts a reading produced at or after the moment it was
//! made; older readings are treated as not-yet-updated and the file is
//! polled again. The caller bounds the wait with
//! [`acquire_fix`](guardpost_core::position::acquire_fix).

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use guardpost_core::clock::{Clock, SystemClock};
use guardpost_core::position::{PositionError, PositionFix, PositionSource};

/// Delay between reads while waiting for a fresh reading.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct FilePositionSource {
    path: PathBuf,
    poll_interval: Duration,
    clock: Arc<dyn Clock>,
}

impl FilePositionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Use `clock` to decide which readings count as fresh.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn read_fix(&self) -> Result<PositionFix, PositionError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::PermissionDenied => PositionError::PermissionDenied,
                ErrorKind::NotFound => PositionError::Unavailable(format!(
                    "no position file at {}",
                    self.path.display()
                )),
                _ => PositionError::Unavailable(err.to_string()),
            })?;

        let fix: PositionFix = serde_json::from_str(&contents)
            .map_err(|err| PositionError::Unavailable(format!("malformed position file: {err}")))?;

        if !fix.coordinate.is_finite() {
            return Err(PositionError::Unavailable(
                "position file holds a non-finite coordinate".to_string(),
            ));
        }
        Ok(fix)
    }
}

#[async_trait]
impl PositionSource for FilePositionSource {
    async fn current_fix(&self) -> Result<PositionFix, PositionError> {
        let requested_at = self.clock.now();
        loop {
            let fix = self.read_fix().await?;
            if fix.fixed_at >= requested_at {
                return Ok(fix);
            }
            tracing::debug!(
                fixed_at = %fix.fixed_at,
                %requested_at,
                "Position reading is older than the request, waiting for a fresh one"
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
