//! Static registry of known named locations.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{Coordinate, NamedLocation};

/// Errors returned while building a [`LocationRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two entries shared the same name.
    #[error("location {name:?} is registered more than once")]
    DuplicateName {
        /// Name that appeared twice.
        name: String,
    },
    /// An entry had an empty name.
    #[error("location names must not be empty")]
    EmptyName,
}

/// Known locations keyed by exact display name.
///
/// Lookups are case-sensitive and do not trim whitespace, matching how the
/// names are produced by the upstream selection lists.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, LocationRegistry, NamedLocation};
///
/// let registry = LocationRegistry::from_locations([NamedLocation::new(
///     "Depot",
///     Coordinate::new(57.7, 11.9)?,
/// )])?;
/// assert!(registry.get("Depot").is_some());
/// assert!(registry.get("depot").is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationRegistry {
    entries: BTreeMap<String, Coordinate>,
}

/// Gothenburg locations used by the reference deployment.
const BUILTIN_LOCATIONS: &[(&str, f64, f64)] = &[
    ("Centralstationen", 57.708_87, 11.974_56),
    ("Lindholmen", 57.707_13, 11.938_29),
    ("Liseberg", 57.695_34, 11.992_47),
    ("Chalmers", 57.689_74, 11.974_18),
    ("Götaplatsen", 57.697_45, 11.979_66),
    ("Järntorget", 57.699_76, 11.953_38),
    ("Linnéplatsen", 57.690_37, 11.951_77),
    ("Korsvägen", 57.696_86, 11.986_89),
    ("Frölunda Torg", 57.652_88, 11.911_05),
    ("Landvetter Airport", 57.668_80, 12.292_30),
];

impl LocationRegistry {
    /// Build a registry, rejecting duplicate or empty names.
    ///
    /// # Errors
    /// Returns [`RegistryError`] for the first offending entry.
    pub fn from_locations<I>(locations: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = NamedLocation>,
    {
        let mut entries = BTreeMap::new();
        for location in locations {
            if location.name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if entries.contains_key(&location.name) {
                return Err(RegistryError::DuplicateName {
                    name: location.name,
                });
            }
            entries.insert(location.name, location.coordinate);
        }
        Ok(Self { entries })
    }

    /// The built-in Gothenburg registry.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_LOCATIONS
            .iter()
            .filter_map(|&(name, latitude, longitude)| {
                Coordinate::new(latitude, longitude)
                    .ok()
                    .map(|coordinate| (name.to_owned(), coordinate))
            })
            .collect();
        Self { entries }
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Coordinate> {
        self.entries.get(name).copied()
    }

    /// Number of registered locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate registered locations in name order.
    pub fn iter(&self) -> impl Iterator<Item = NamedLocation> + '_ {
        self.entries
            .iter()
            .map(|(name, coordinate)| NamedLocation::new(name.clone(), *coordinate))
    }
}
