//! Synthetic, deterministic route geometry.
//!
//! With no routing service available, a ride path is approximated by a
//! quadratic Bezier curve between the endpoints. A single control point is
//! pushed sideways from the midpoint to suggest road curvature, and interior
//! waypoints receive a small sinusoidal offset derived from their index so the
//! line does not look ruler-straight. The same inputs always produce the same
//! sequence; nothing here draws on a random source.
//!
//! Distances are measured in planar degree space. That is adequate for
//! city-scale previews and deliberately not a geodesic.
#![expect(
    clippy::float_arithmetic,
    reason = "curve interpolation is floating-point geometry"
)]

use geo::{BoundingRect, Coord, LineString, Rect};
use log::debug;
use thiserror::Error;

use crate::Coordinate;

/// An ordered path from origin to destination with at least two points.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, Waypoints};
///
/// let a = Coordinate::new(0.0, 0.0)?;
/// let b = Coordinate::new(0.0, 1.0)?;
/// let path = Waypoints::direct(a, b);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.origin(), a);
/// assert_eq!(path.destination(), b);
/// # Ok::<(), wayline_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Waypoints {
    origin: Coordinate,
    destination: Coordinate,
    points: Vec<Coordinate>,
}

impl Waypoints {
    /// The two-point straight line between `origin` and `destination`.
    #[must_use]
    pub fn direct(origin: Coordinate, destination: Coordinate) -> Self {
        Self::with_interior(origin, Vec::new(), destination)
    }

    fn with_interior(origin: Coordinate, interior: Vec<Coordinate>, destination: Coordinate) -> Self {
        let mut points = Vec::with_capacity(interior.len() + 2);
        points.push(origin);
        points.extend(interior);
        points.push(destination);
        Self {
            origin,
            destination,
            points,
        }
    }

    /// First waypoint.
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Last waypoint.
    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Number of waypoints, endpoints included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a path holds at least its two endpoints.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the path is the bare two-point line.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.points.len() == 2
    }

    /// All waypoints in order.
    #[must_use]
    pub const fn as_slice(&self) -> &[Coordinate] {
        self.points.as_slice()
    }

    /// Iterate waypoints in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.points.iter()
    }

    /// Waypoints strictly between the endpoints.
    #[must_use]
    pub fn interior(&self) -> &[Coordinate] {
        let end = self.points.len().saturating_sub(1);
        self.points.get(1..end).unwrap_or_default()
    }

    /// The path as a `geo` line string (`x = longitude`).
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        self.points.iter().copied().map(Coord::from).collect()
    }

    /// Axis-aligned bounds of every waypoint.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.to_line_string().bounding_rect()
    }
}

impl<'a> IntoIterator for &'a Waypoints {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors returned by [`GeometryConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryConfigError {
    /// Fewer than two waypoints were allowed.
    #[error("minimum waypoint count must be at least 2, got {0}")]
    TooFewWaypoints(u16),
    /// The waypoint bounds were inverted.
    #[error("minimum waypoint count {min} exceeds maximum {max}")]
    InvertedBounds {
        /// Configured minimum.
        min: u16,
        /// Configured maximum.
        max: u16,
    },
    /// A tuning constant was negative or not finite.
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidConstant {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
}

/// Tuning constants for [`RouteGeometryGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
    /// Separation in degrees below which the direct line is returned.
    pub degenerate_threshold: f64,
    /// Lower bound on generated waypoints.
    pub min_waypoints: u16,
    /// Upper bound on generated waypoints.
    pub max_waypoints: u16,
    /// Waypoints per degree of separation before clamping.
    pub density_per_degree: f64,
    /// Sideways offset of the Bezier control point in degrees.
    pub curvature_offset: f64,
    /// Peak jitter applied to interior waypoints in degrees.
    pub jitter_amplitude: f64,
    /// Angular step of the jitter per waypoint index, in radians.
    pub jitter_frequency: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            degenerate_threshold: 1.0e-6,
            min_waypoints: 10,
            max_waypoints: 50,
            density_per_degree: 1000.0,
            curvature_offset: 0.002,
            jitter_amplitude: 0.000_1,
            jitter_frequency: 0.7,
        }
    }
}

impl GeometryConfig {
    /// Check the bounds and constants.
    ///
    /// # Errors
    /// Returns [`GeometryConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), GeometryConfigError> {
        if self.min_waypoints < 2 {
            return Err(GeometryConfigError::TooFewWaypoints(self.min_waypoints));
        }
        if self.min_waypoints > self.max_waypoints {
            return Err(GeometryConfigError::InvertedBounds {
                min: self.min_waypoints,
                max: self.max_waypoints,
            });
        }
        for (field, value) in [
            ("degenerate_threshold", self.degenerate_threshold),
            ("density_per_degree", self.density_per_degree),
            ("curvature_offset", self.curvature_offset),
            ("jitter_amplitude", self.jitter_amplitude),
            ("jitter_frequency", self.jitter_frequency),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryConfigError::InvalidConstant { field, value });
            }
        }
        Ok(())
    }

    /// Set the waypoint bounds.
    #[must_use]
    pub const fn with_waypoint_bounds(mut self, min: u16, max: u16) -> Self {
        self.min_waypoints = min;
        self.max_waypoints = max;
        self
    }

    /// Set the jitter amplitude; zero disables jitter.
    #[must_use]
    pub const fn with_jitter_amplitude(mut self, amplitude: f64) -> Self {
        self.jitter_amplitude = amplitude;
        self
    }
}

/// Generates curved waypoint sequences between two coordinates.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, RouteGeometryGenerator};
///
/// let generator = RouteGeometryGenerator::default();
/// let origin = Coordinate::new(57.70887, 11.97456)?;
/// let destination = Coordinate::new(57.70713, 11.93829)?;
/// let path = generator.generate(origin, destination);
///
/// assert_eq!(path.origin(), origin);
/// assert_eq!(path.destination(), destination);
/// assert_eq!(path, generator.generate(origin, destination));
/// # Ok::<(), wayline_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteGeometryGenerator {
    config: GeometryConfig,
}

impl RouteGeometryGenerator {
    /// Construct a generator with validated configuration.
    ///
    /// # Errors
    /// Propagates [`GeometryConfig::validate`] failures.
    pub fn with_config(config: GeometryConfig) -> Result<Self, GeometryConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Waypoint count for a planar separation of `magnitude` degrees.
    ///
    /// Non-decreasing in `magnitude` and always within the configured bounds.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the scaled value is range-checked against u16 bounds before casting"
    )]
    pub fn waypoint_count(&self, magnitude: f64) -> u16 {
        let min = self.config.min_waypoints;
        let max = self.config.max_waypoints;
        let scaled = (magnitude * self.config.density_per_degree).floor();
        if scaled.is_nan() || scaled <= f64::from(min) {
            min
        } else if scaled >= f64::from(max) {
            max
        } else {
            scaled as u16
        }
    }

    /// Generate the waypoint sequence from `origin` to `destination`.
    #[must_use]
    pub fn generate(&self, origin: Coordinate, destination: Coordinate) -> Waypoints {
        let dx = destination.longitude() - origin.longitude();
        let dy = destination.latitude() - origin.latitude();
        let magnitude = dx.hypot(dy);
        if magnitude < self.config.degenerate_threshold {
            debug!("Degenerate route {origin} -> {destination}; drawing a direct line");
            return Waypoints::direct(origin, destination);
        }

        let count = self.waypoint_count(magnitude);
        let control = self.control_point(origin, destination, dx, dy, magnitude);
        let last = f64::from(count - 1);
        let interior = (1..count - 1)
            .filter_map(|index| {
                let t = f64::from(index) / last;
                let (latitude, longitude) = quadratic_bezier(origin, control, destination, t);
                let (jitter_lat, jitter_lng) = self.jitter(index);
                Coordinate::clamped(latitude + jitter_lat, longitude + jitter_lng)
            })
            .collect();
        Waypoints::with_interior(origin, interior, destination)
    }

    /// Midpoint displaced along the unit normal of the displacement.
    fn control_point(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        dx: f64,
        dy: f64,
        magnitude: f64,
    ) -> (f64, f64) {
        let mid_lat = (origin.latitude() + destination.latitude()) / 2.0;
        let mid_lng = (origin.longitude() + destination.longitude()) / 2.0;
        // Normal of (dx, dy) rotated a quarter turn anticlockwise.
        let normal_lng = -dy / magnitude;
        let normal_lat = dx / magnitude;
        (
            mid_lat + normal_lat * self.config.curvature_offset,
            mid_lng + normal_lng * self.config.curvature_offset,
        )
    }

    /// Offset for interior waypoint `index`; a function of the index alone.
    fn jitter(&self, index: u16) -> (f64, f64) {
        let phase = f64::from(index) * self.config.jitter_frequency;
        let amplitude = self.config.jitter_amplitude;
        (amplitude * phase.sin(), amplitude * phase.cos())
    }
}

fn quadratic_bezier(
    start: Coordinate,
    control: (f64, f64),
    end: Coordinate,
    t: f64,
) -> (f64, f64) {
    let u = 1.0 - t;
    let w0 = u * u;
    let w1 = 2.0 * u * t;
    let w2 = t * t;
    (
        w0 * start.latitude() + w1 * control.0 + w2 * end.latitude(),
        w0 * start.longitude() + w1 * control.1 + w2 * end.longitude(),
    )
}
