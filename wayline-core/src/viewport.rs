//! Map centre and zoom selection for a coordinate pair.
#![expect(
    clippy::float_arithmetic,
    reason = "midpoint and separation are floating-point maths"
)]

use thiserror::Error;

use crate::Coordinate;

/// Centre and discrete zoom level applied to the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSpec {
    /// Point the map is centred on.
    pub center: Coordinate,
    /// Tile zoom level.
    pub zoom: u8,
}

/// One row of a [`ZoomTable`]: separations below `threshold_deg` use `zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep {
    /// Exclusive upper bound on the separation in degrees.
    pub threshold_deg: f64,
    /// Zoom applied when the separation falls under the threshold.
    pub zoom: u8,
}

impl ZoomStep {
    /// Construct a step.
    #[must_use]
    pub const fn new(threshold_deg: f64, zoom: u8) -> Self {
        Self {
            threshold_deg,
            zoom,
        }
    }
}

/// Errors returned by [`ZoomTable::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoomTableError {
    /// A threshold was NaN, infinite or not positive.
    #[error("zoom threshold {0} must be finite and positive")]
    InvalidThreshold(f64),
    /// Thresholds were not strictly increasing.
    #[error("zoom thresholds must strictly increase ({previous} then {next})")]
    UnorderedThresholds {
        /// Threshold of the earlier row.
        previous: f64,
        /// Threshold of the later row.
        next: f64,
    },
    /// A wider separation was given a closer zoom.
    #[error("zoom must not increase with separation ({previous} then {next})")]
    IncreasingZoom {
        /// Zoom of the earlier row.
        previous: u8,
        /// Zoom of the later row.
        next: u8,
    },
}

/// Ordered separation thresholds, smallest first.
///
/// Construction enforces strictly increasing thresholds and non-increasing
/// zoom levels (including the fallback), so a smaller separation never
/// receives a lower zoom than a larger one.
///
/// # Examples
/// ```
/// use wayline_core::{ZoomStep, ZoomTable};
///
/// let table = ZoomTable::new(vec![ZoomStep::new(0.01, 15), ZoomStep::new(0.1, 12)], 8)?;
/// assert_eq!(table.zoom_for(0.005), 15);
/// assert_eq!(table.zoom_for(0.05), 12);
/// assert_eq!(table.zoom_for(3.0), 8);
/// # Ok::<(), wayline_core::ZoomTableError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTable {
    steps: Vec<ZoomStep>,
    fallback_zoom: u8,
}

/// City-scale defaults tuned for ride previews.
const DEFAULT_STEPS: [ZoomStep; 6] = [
    ZoomStep::new(0.01, 15),
    ZoomStep::new(0.05, 14),
    ZoomStep::new(0.1, 13),
    ZoomStep::new(0.5, 11),
    ZoomStep::new(1.0, 10),
    ZoomStep::new(5.0, 7),
];
const DEFAULT_FALLBACK_ZOOM: u8 = 5;

impl ZoomTable {
    /// Validate and construct a table.
    ///
    /// # Errors
    /// Returns [`ZoomTableError`] when the rows are unordered or a threshold
    /// is invalid.
    pub fn new(steps: Vec<ZoomStep>, fallback_zoom: u8) -> Result<Self, ZoomTableError> {
        for step in &steps {
            if !step.threshold_deg.is_finite() || step.threshold_deg <= 0.0 {
                return Err(ZoomTableError::InvalidThreshold(step.threshold_deg));
            }
        }
        for pair in steps.windows(2) {
            if let [previous, next] = pair {
                if next.threshold_deg <= previous.threshold_deg {
                    return Err(ZoomTableError::UnorderedThresholds {
                        previous: previous.threshold_deg,
                        next: next.threshold_deg,
                    });
                }
                if next.zoom > previous.zoom {
                    return Err(ZoomTableError::IncreasingZoom {
                        previous: previous.zoom,
                        next: next.zoom,
                    });
                }
            }
        }
        if let Some(last) = steps.last()
            && fallback_zoom > last.zoom
        {
            return Err(ZoomTableError::IncreasingZoom {
                previous: last.zoom,
                next: fallback_zoom,
            });
        }
        Ok(Self {
            steps,
            fallback_zoom,
        })
    }

    /// Zoom for a separation of `separation_deg`; first matching row wins.
    #[must_use]
    pub fn zoom_for(&self, separation_deg: f64) -> u8 {
        self.steps
            .iter()
            .find(|step| separation_deg < step.threshold_deg)
            .map_or(self.fallback_zoom, |step| step.zoom)
    }

    /// Rows in evaluation order.
    #[must_use]
    pub fn steps(&self) -> &[ZoomStep] {
        &self.steps
    }
}

impl Default for ZoomTable {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS.to_vec(),
            fallback_zoom: DEFAULT_FALLBACK_ZOOM,
        }
    }
}

/// Computes the [`ViewportSpec`] framing both endpoints.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, MapViewportController};
///
/// let controller = MapViewportController::default();
/// let a = Coordinate::new(57.70, 11.90)?;
/// let b = Coordinate::new(57.71, 11.92)?;
/// let viewport = controller.compute(a, b);
/// assert!((viewport.center.latitude() - 57.705).abs() < 1e-9);
/// assert_eq!(viewport.zoom, 14);
/// # Ok::<(), wayline_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapViewportController {
    table: ZoomTable,
}

impl MapViewportController {
    /// Construct a controller over a custom zoom table.
    #[must_use]
    pub const fn with_table(table: ZoomTable) -> Self {
        Self { table }
    }

    /// Larger of the absolute latitude and longitude differences.
    #[must_use]
    pub fn separation_deg(origin: Coordinate, destination: Coordinate) -> f64 {
        let dlat = (destination.latitude() - origin.latitude()).abs();
        let dlng = (destination.longitude() - origin.longitude()).abs();
        dlat.max(dlng)
    }

    /// Centre on the midpoint and pick the zoom for the separation.
    #[must_use]
    pub fn compute(&self, origin: Coordinate, destination: Coordinate) -> ViewportSpec {
        let center = Coordinate::clamped(
            (origin.latitude() + destination.latitude()) / 2.0,
            (origin.longitude() + destination.longitude()) / 2.0,
        )
        .unwrap_or(origin);
        ViewportSpec {
            center,
            zoom: self
                .table
                .zoom_for(Self::separation_deg(origin, destination)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    #[rstest]
    #[case(0.0, 15)]
    #[case(0.005, 15)]
    #[case(0.01, 14)]
    #[case(0.036, 14)]
    #[case(0.08, 13)]
    #[case(0.3, 11)]
    #[case(0.9, 10)]
    #[case(2.0, 7)]
    #[case(30.0, 5)]
    fn default_table_rows(#[case] separation: f64, #[case] expected: u8) {
        assert_eq!(ZoomTable::default().zoom_for(separation), expected);
    }

    #[rstest]
    fn default_table_passes_validation() {
        let table = ZoomTable::default();
        let rebuilt = ZoomTable::new(table.steps().to_vec(), DEFAULT_FALLBACK_ZOOM);
        assert_eq!(rebuilt, Ok(table));
    }

    #[rstest]
    fn centre_is_arithmetic_midpoint() {
        let viewport = MapViewportController::default().compute(coord(10.0, 20.0), coord(12.0, 24.0));
        assert_eq!(viewport.center, coord(11.0, 22.0));
    }

    #[rstest]
    fn separation_uses_larger_axis() {
        let separation = MapViewportController::separation_deg(coord(0.0, 0.0), coord(0.01, -0.05));
        assert!((separation - 0.05).abs() < 1e-12);
    }

    #[rstest]
    fn rejects_unordered_thresholds() {
        let err = ZoomTable::new(vec![ZoomStep::new(0.5, 12), ZoomStep::new(0.1, 10)], 5)
            .expect_err("unordered");
        assert!(matches!(err, ZoomTableError::UnorderedThresholds { .. }));
    }

    #[rstest]
    fn rejects_zoom_that_grows_with_distance() {
        let err = ZoomTable::new(vec![ZoomStep::new(0.1, 10), ZoomStep::new(0.5, 12)], 5)
            .expect_err("increasing zoom");
        assert_eq!(
            err,
            ZoomTableError::IncreasingZoom {
                previous: 10,
                next: 12
            }
        );
    }

    #[rstest]
    fn rejects_fallback_above_last_row() {
        let err = ZoomTable::new(vec![ZoomStep::new(0.1, 10)], 11).expect_err("fallback");
        assert!(matches!(err, ZoomTableError::IncreasingZoom { .. }));
    }

    #[rstest]
    fn rejects_non_positive_threshold() {
        let err = ZoomTable::new(vec![ZoomStep::new(0.0, 10)], 5).expect_err("zero");
        assert_eq!(err, ZoomTableError::InvalidThreshold(0.0));
    }
}
