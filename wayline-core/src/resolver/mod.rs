//! Resolve location identifiers to coordinates.
//!
//! Resolution never fails: a name missing from the registry resolves to the
//! configured default coordinate and a warning is logged. Callers inspect
//! [`ResolutionSource`] to tell a genuine hit from the fallback.
//!
//! Positions supplied by a live selection are validated here so that NaN or
//! out-of-range values never reach the geometry and metrics stages.

mod registry;

use log::warn;

use crate::{Coordinate, LocationInput, NamedLocation};

pub use registry::{LocationRegistry, RegistryError};

/// Latitude of the default fallback location.
const DEFAULT_LATITUDE: f64 = 57.708_87;
/// Longitude of the default fallback location.
const DEFAULT_LONGITUDE: f64 = 11.974_56;

/// How a [`Resolution`] obtained its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The input carried a valid position.
    Supplied,
    /// The name matched a registry entry.
    Registry,
    /// Nothing matched; the default coordinate was substituted.
    Fallback,
}

/// Outcome of resolving a single [`LocationInput`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Display name paired with the coordinate used for rendering.
    pub location: NamedLocation,
    /// Where the coordinate came from.
    pub source: ResolutionSource,
}

impl Resolution {
    /// Whether the default coordinate stands in for an unknown location.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Fallback
    }

    /// The resolved coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.location.coordinate
    }
}

/// Configuration for [`CoordinateResolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Location substituted for unknown names.
    pub default_location: NamedLocation,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_location: NamedLocation::new("Centralstationen", default_coordinate()),
        }
    }
}

impl ResolverConfig {
    /// Replace the fallback location.
    #[must_use]
    pub fn with_default_location(mut self, location: NamedLocation) -> Self {
        self.default_location = location;
        self
    }
}

const fn default_coordinate() -> Coordinate {
    Coordinate::from_trusted(DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
}

/// Deterministic, I/O-free name to coordinate lookup.
///
/// # Examples
/// ```
/// use wayline_core::{CoordinateResolver, ResolverConfig};
///
/// let resolver = CoordinateResolver::builtin();
/// let fallback = ResolverConfig::default().default_location.coordinate;
/// assert_eq!(resolver.resolve("NonexistentPlace"), fallback);
/// ```
#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    registry: LocationRegistry,
    config: ResolverConfig,
}

impl CoordinateResolver {
    /// Construct a resolver over `registry` with default configuration.
    #[must_use]
    pub fn new(registry: LocationRegistry) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// Construct a resolver with explicit configuration.
    #[must_use]
    pub const fn with_config(registry: LocationRegistry, config: ResolverConfig) -> Self {
        Self { registry, config }
    }

    /// Resolver over the built-in registry.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(LocationRegistry::builtin())
    }

    /// The registry backing this resolver.
    #[must_use]
    pub const fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    /// The coordinate substituted for unknown names.
    #[must_use]
    pub const fn default_coordinate(&self) -> Coordinate {
        self.config.default_location.coordinate
    }

    /// Resolve a name, falling back to the default coordinate on a miss.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Coordinate {
        self.lookup(name).coordinate()
    }

    /// Resolve a location input, preferring a valid supplied position.
    #[must_use]
    pub fn resolve_input(&self, input: &LocationInput) -> Resolution {
        if let Some(raw) = input.position {
            match Coordinate::try_from(raw) {
                Ok(coordinate) => {
                    return Resolution {
                        location: NamedLocation::new(input.name.clone(), coordinate),
                        source: ResolutionSource::Supplied,
                    };
                }
                Err(err) => {
                    warn!(
                        "Discarding supplied position for {:?}: {err}; resolving by name",
                        input.name
                    );
                }
            }
        }
        self.lookup(&input.name)
    }

    fn lookup(&self, name: &str) -> Resolution {
        if let Some(coordinate) = self.registry.get(name) {
            return Resolution {
                location: NamedLocation::new(name, coordinate),
                source: ResolutionSource::Registry,
            };
        }
        warn!(
            "Unknown location {name:?}; substituting default {}",
            self.config.default_location.coordinate
        );
        Resolution {
            location: NamedLocation::new(name, self.config.default_location.coordinate),
            source: ResolutionSource::Fallback,
        }
    }
}

impl Default for CoordinateResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn resolver() -> CoordinateResolver {
        CoordinateResolver::builtin()
    }

    #[rstest]
    fn resolves_known_name(resolver: CoordinateResolver) {
        let coordinate = resolver.resolve("Lindholmen");
        assert_eq!(coordinate.latitude(), 57.707_13);
        assert_eq!(coordinate.longitude(), 11.938_29);
    }

    #[rstest]
    fn unknown_name_falls_back(resolver: CoordinateResolver) {
        let resolution = resolver.resolve_input(&LocationInput::named("NonexistentPlace"));
        assert!(resolution.is_fallback());
        assert_eq!(resolution.coordinate(), resolver.default_coordinate());
        assert_eq!(resolution.location.name, "NonexistentPlace");
    }

    #[rstest]
    fn supplied_position_wins(resolver: CoordinateResolver) {
        let input = LocationInput::with_position("Lindholmen", 10.0, 20.0);
        let resolution = resolver.resolve_input(&input);
        assert_eq!(resolution.source, ResolutionSource::Supplied);
        assert_eq!(resolution.coordinate().latitude(), 10.0);
    }

    #[rstest]
    #[case(f64::NAN, 11.0)]
    #[case(57.0, 181.0)]
    fn invalid_position_resolves_by_name(
        resolver: CoordinateResolver,
        #[case] latitude: f64,
        #[case] longitude: f64,
    ) {
        let input = LocationInput::with_position("Liseberg", latitude, longitude);
        let resolution = resolver.resolve_input(&input);
        assert_eq!(resolution.source, ResolutionSource::Registry);
        assert_eq!(resolution.coordinate(), resolver.resolve("Liseberg"));
    }

    #[rstest]
    fn custom_default_location_is_used() {
        let fallback = NamedLocation::new("Origin", Coordinate::new(0.0, 0.0).expect("valid"));
        let resolver = CoordinateResolver::with_config(
            LocationRegistry::default(),
            ResolverConfig::default().with_default_location(fallback.clone()),
        );
        assert_eq!(resolver.resolve("anything"), fallback.coordinate);
    }
}
