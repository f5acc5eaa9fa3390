//! Load a [`LocationRegistry`] from JSON.
//!
//! The file holds an array of objects:
//!
//! ```json
//! [
//!   { "name": "Centralstationen", "latitude": 57.70887, "longitude": 11.97456 },
//!   { "name": "Lindholmen", "latitude": 57.70713, "longitude": 11.93829 }
//! ]
//! ```
//!
//! Entries are validated one by one so errors name the offending location.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use thiserror::Error;
use wayline_core::{Coordinate, CoordinateError, LocationRegistry, NamedLocation, RegistryError};

use crate::fs;

/// Errors raised while loading a registry file.
#[derive(Debug, Error)]
pub enum RegistryFileError {
    /// The file could not be read.
    #[error("failed to read location registry {path}")]
    Read {
        /// File that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The contents were not a JSON array of locations.
    #[error("location registry is not valid JSON")]
    Parse(#[source] serde_json::Error),
    /// An entry carried an invalid coordinate.
    #[error("location {name:?} has an invalid coordinate")]
    InvalidCoordinate {
        /// Entry name.
        name: String,
        /// Validation failure.
        #[source]
        source: CoordinateError,
    },
    /// The entries could not form a registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryEntry {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RegistryEntry> for NamedLocation {
    type Error = RegistryFileError;

    fn try_from(entry: RegistryEntry) -> Result<Self, Self::Error> {
        match Coordinate::new(entry.latitude, entry.longitude) {
            Ok(coordinate) => Ok(Self::new(entry.name, coordinate)),
            Err(source) => Err(RegistryFileError::InvalidCoordinate {
                name: entry.name,
                source,
            }),
        }
    }
}

/// Parse registry JSON.
///
/// # Errors
/// Returns [`RegistryFileError`] when the JSON is malformed, an entry has an
/// invalid coordinate, or names are empty or duplicated.
///
/// # Examples
/// ```
/// use wayline_data::parse_registry;
///
/// let registry = parse_registry(r#"[{"name": "Harbour", "latitude": 57.7, "longitude": 11.9}]"#)?;
/// assert!(registry.get("Harbour").is_some());
/// # Ok::<(), wayline_data::RegistryFileError>(())
/// ```
pub fn parse_registry(json: &str) -> Result<LocationRegistry, RegistryFileError> {
    let entries: Vec<RegistryEntry> =
        serde_json::from_str(json).map_err(RegistryFileError::Parse)?;
    let locations = entries
        .into_iter()
        .map(NamedLocation::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LocationRegistry::from_locations(locations)?)
}

/// Read and parse a registry file.
///
/// # Errors
/// Returns [`RegistryFileError::Read`] when the file cannot be read, and the
/// errors of [`parse_registry`] otherwise.
pub fn load_registry(path: &Utf8Path) -> Result<LocationRegistry, RegistryFileError> {
    let json = fs::read_to_string(path).map_err(|source| RegistryFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = parse_registry(&json)?;
    debug!("Loaded {} locations from {path}", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_entries() {
        let registry = parse_registry(
            r#"[
                {"name": "Centralstationen", "latitude": 57.70887, "longitude": 11.97456},
                {"name": "Lindholmen", "latitude": 57.70713, "longitude": 11.93829}
            ]"#,
        )
        .expect("valid registry");
        assert_eq!(registry.len(), 2);
        let lindholmen = registry.get("Lindholmen").expect("entry present");
        assert!((lindholmen.latitude() - 57.70713).abs() < 1e-12);
    }

    #[rstest]
    fn empty_array_is_an_empty_registry() {
        let registry = parse_registry("[]").expect("valid registry");
        assert!(registry.is_empty());
    }

    #[rstest]
    fn invalid_coordinate_names_the_entry() {
        let err = parse_registry(r#"[{"name": "Nowhere", "latitude": 91.0, "longitude": 0.0}]"#)
            .expect_err("latitude out of range");
        assert!(matches!(
            err,
            RegistryFileError::InvalidCoordinate { ref name, .. } if name == "Nowhere"
        ));
    }

    #[rstest]
    fn duplicates_are_rejected() {
        let err = parse_registry(
            r#"[
                {"name": "Dock", "latitude": 1.0, "longitude": 1.0},
                {"name": "Dock", "latitude": 2.0, "longitude": 2.0}
            ]"#,
        )
        .expect_err("duplicate name");
        assert!(matches!(
            err,
            RegistryFileError::Registry(RegistryError::DuplicateName { .. })
        ));
    }

    #[rstest]
    #[case::not_an_array(r#"{"name": "Dock"}"#)]
    #[case::missing_field(r#"[{"name": "Dock", "latitude": 1.0}]"#)]
    #[case::unknown_field(r#"[{"name": "Dock", "latitude": 1.0, "longitude": 1.0, "zoom": 3}]"#)]
    fn malformed_json_is_a_parse_error(#[case] json: &str) {
        let err = parse_registry(json).expect_err("malformed");
        assert!(matches!(err, RegistryFileError::Parse(_)));
    }

    #[rstest]
    fn loads_from_disk() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("places.json"))
            .expect("temp paths are UTF-8");
        fs::write_string(
            &path,
            r#"[{"name": "Harbour", "latitude": 57.7, "longitude": 11.9}]"#,
        )
        .expect("write registry");
        let registry = load_registry(&path).expect("load registry");
        assert!(registry.get("Harbour").is_some());
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let err = load_registry(Utf8Path::new("/definitely/not/here.json")).expect_err("missing");
        assert!(matches!(err, RegistryFileError::Read { .. }));
    }
}
