//! Distance and arrival-time estimates for the overlay.
#![expect(
    clippy::float_arithmetic,
    reason = "haversine distance and ETA derivation are floating-point maths"
)]

use std::fmt;

use crate::Coordinate;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, haversine_km};
///
/// let a = Coordinate::new(0.0, 0.0)?;
/// let b = Coordinate::new(0.0, 1.0)?;
/// assert!((haversine_km(a, b) - 111.19).abs() < 0.01);
/// # Ok::<(), wayline_core::CoordinateError>(())
/// ```
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlat = (b.latitude() - a.latitude()).to_radians();
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push `h` fractionally above one for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// Read-only distance and ETA snapshot for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteMetrics {
    /// Estimated road distance in kilometres, rounded to one decimal.
    pub distance_km: f64,
    /// Estimated travel time in whole minutes.
    pub eta_minutes: u32,
}

impl RouteMetrics {
    /// Metrics for a zero-length route.
    pub const ZERO: Self = Self {
        distance_km: 0.0,
        eta_minutes: 0,
    };

    /// Distance with exactly one decimal place, e.g. `"2.6"`.
    #[must_use]
    pub fn formatted_distance(&self) -> String {
        format!("{:.1}", self.distance_km)
    }

    /// One-line overlay text, e.g. `"2.6 km · 3 min"`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RouteMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km · {} min", self.distance_km, self.eta_minutes)
    }
}

/// Constants for [`RouteMetricsCalculator`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Multiplier turning great-circle distance into road distance.
    pub inflation_factor: f64,
    /// Assumed average travel speed.
    pub average_speed_kmh: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            inflation_factor: 1.2,
            average_speed_kmh: 50.0,
        }
    }
}

impl MetricsConfig {
    /// Set the assumed average speed.
    #[must_use]
    pub const fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }
}

/// Derives [`RouteMetrics`] from a coordinate pair.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, RouteMetricsCalculator};
///
/// let origin = Coordinate::new(57.70887, 11.97456)?;
/// let metrics = RouteMetricsCalculator::default().compute(origin, origin);
/// assert_eq!(metrics.distance_km, 0.0);
/// assert_eq!(metrics.eta_minutes, 0);
/// # Ok::<(), wayline_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteMetricsCalculator {
    config: MetricsConfig,
}

impl RouteMetricsCalculator {
    /// Construct a calculator with explicit constants.
    #[must_use]
    pub const fn with_config(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Great-circle distance scaled by the inflation factor, unrounded.
    #[must_use]
    pub fn road_distance_km(&self, origin: Coordinate, destination: Coordinate) -> f64 {
        haversine_km(origin, destination) * self.config.inflation_factor
    }

    /// Compute distance and ETA for the pair.
    #[must_use]
    pub fn compute(&self, origin: Coordinate, destination: Coordinate) -> RouteMetrics {
        let road_km = self.road_distance_km(origin, destination);
        RouteMetrics {
            distance_km: (road_km * 10.0).round() / 10.0,
            eta_minutes: self.eta_minutes(road_km),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "minutes are rounded and range-checked before casting"
    )]
    fn eta_minutes(&self, road_km: f64) -> u32 {
        let minutes = (road_km / self.config.average_speed_kmh * 60.0).round();
        if !minutes.is_finite() || minutes <= 0.0 {
            0
        } else if minutes >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            minutes as u32
        }
    }
}
