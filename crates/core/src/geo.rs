//! Proximity engine: great-circle distance and the check-in radius test.
//!
//! Distances use the haversine formula on a spherical Earth. The error of
//! the spherical model is well under a meter at the scale of the check-in
//! radius, which is all this module is used for.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum distance in meters between a reported position and a checkpoint
/// for a check-in to be accepted.
///
/// Policy value shared by the session state machine and every record store.
pub const CHECK_IN_RADIUS_M: f64 = 50.0;

const DEG_TO_RAD: f64 = PI / 180.0;

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite numbers.
    ///
    /// Range is deliberately not checked here; out-of-range but finite values
    /// still yield a (meaningless) finite distance.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Great-circle distance between two points in meters.
///
/// Symmetric, and zero for coincident points.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude * DEG_TO_RAD;
    let phi2 = b.latitude * DEG_TO_RAD;
    let delta_phi = (b.latitude - a.latitude) * DEG_TO_RAD;
    let delta_lambda = (b.longitude - a.longitude) * DEG_TO_RAD;

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push `h` a hair outside [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Inclusive radius test: a distance of exactly `radius_m` qualifies.
pub fn is_within_radius(distance_m: f64, radius_m: f64) -> bool {
    distance_m <= radius_m
}

/// Whole meters for display ("You are 73m away").
pub fn whole_meters(distance_m: f64) -> i64 {
    distance_m.round() as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
