//! Geographic value types shared by every stage of the render pipeline.
//!
//! Coordinates are WGS84 degrees. Conversions to [`geo::Coord`] follow the
//! `geo` convention of `x = longitude` and `y = latitude`.

use std::fmt;

use geo::Coord;
use thiserror::Error;

/// Inclusive latitude bounds in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
/// Inclusive longitude bounds in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinate components must be finite (latitude {latitude}, longitude {longitude})")]
    NonFinite {
        /// Latitude as supplied.
        latitude: f64,
        /// Longitude as supplied.
        longitude: f64,
    },
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated latitude/longitude pair.
///
/// # Examples
/// ```
/// use wayline_core::Coordinate;
///
/// let centre = Coordinate::new(57.70887, 11.97456)?;
/// assert_eq!(centre.latitude(), 57.70887);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok::<(), wayline_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawCoordinate", into = "RawCoordinate")
)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate and construct a coordinate.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when either component is non-finite or out
    /// of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite {
                latitude,
                longitude,
            });
        }
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Construct a coordinate by clamping finite components into range.
    ///
    /// Returns `None` when either component is NaN or infinite.
    #[must_use]
    pub fn clamped(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Self {
            latitude: latitude.clamp(*LATITUDE_RANGE.start(), *LATITUDE_RANGE.end()),
            longitude: longitude.clamp(*LONGITUDE_RANGE.start(), *LONGITUDE_RANGE.end()),
        })
    }

    /// Construct from constants already known to be finite and in range.
    pub(crate) const fn from_trusted(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether both components lie within `tolerance` degrees of `other`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "tolerance comparison needs component differences"
    )]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance
            && (self.longitude - other.longitude).abs() <= tolerance
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

/// Unvalidated latitude/longitude pair as received from a data provider.
///
/// Values may be NaN or out of range; [`Coordinate::try_from`] filters them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawCoordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

/// A coordinate paired with its display name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedLocation {
    /// Display name, also used as the registry key.
    pub name: String,
    /// Resolved position.
    pub coordinate: Coordinate,
}

impl NamedLocation {
    /// Pair a name with a coordinate.
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// A location as handed over by the embedding UI.
///
/// The name is always present. Live selections may also carry a position,
/// which is kept unvalidated until the resolver filters it.
///
/// # Examples
/// ```
/// use wayline_core::LocationInput;
///
/// let by_name = LocationInput::named("Liseberg");
/// assert!(by_name.position.is_none());
///
/// let live = LocationInput::with_position("Pickup", f64::NAN, 11.9);
/// assert!(live.position.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationInput {
    /// Display name of the location.
    pub name: String,
    /// Optional position supplied alongside the name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<RawCoordinate>,
}

impl LocationInput {
    /// A location identified by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
        }
    }

    /// A location carrying its own, not yet validated, position.
    pub fn with_position(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            position: Some(RawCoordinate {
                latitude,
                longitude,
            }),
        }
    }

    /// Whether no location has been selected yet.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.position.is_none()
    }
}

impl From<NamedLocation> for LocationInput {
    fn from(value: NamedLocation) -> Self {
        Self {
            name: value.name,
            position: Some(value.coordinate.into()),
        }
    }
}
