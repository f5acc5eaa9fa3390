//! Ownership and lifecycle of the route's visual layers.
//!
//! [`MapLayerLifecycleManager`] is the only component that mutates the map
//! surface. It creates the surface once, and on every render removes what it
//! drew last time before drawing the new route. Everything it draws is
//! recorded by kind at creation time; sweeps consult that record rather than
//! asking the surface what it holds.

mod registry;
mod style;

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::surface::{LayerHandle, MapSurface, SurfaceContainer, SurfaceError, SurfaceFactory};
use crate::{Coordinate, ViewportSpec, Waypoints};

use registry::LayerRegistry;
pub use style::RouteStyle;

/// The five kinds of layer a route is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerKind {
    /// Pin at the origin.
    StartMarker,
    /// Pin at the destination.
    EndMarker,
    /// Arrow showing the direction of travel.
    DirectionArrow,
    /// The visible route stroke.
    PrimaryLine,
    /// Wide, faint stroke beneath the route.
    OutlineLine,
}

impl LayerKind {
    /// Every kind, in draw order of their first appearance.
    pub const ALL: [Self; 5] = [
        Self::OutlineLine,
        Self::PrimaryLine,
        Self::StartMarker,
        Self::EndMarker,
        Self::DirectionArrow,
    ];
}

/// A layer created by the manager, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLayer {
    /// What the layer depicts.
    pub kind: LayerKind,
    /// Handle issued by the surface.
    pub handle: LayerHandle,
}

/// What happens to the surface itself when its host goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TeardownPolicy {
    /// Remove owned layers and release the surface.
    DestroySurface,
    /// Remove owned layers and keep the surface for the next route.
    #[default]
    ClearLayers,
}

/// Places a route map is embedded, each with a fixed teardown policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embedding {
    /// Small map on the dashboard, unmounted whenever the card closes.
    DashboardPreview,
    /// Map in the ride details panel, reused as the selected ride changes.
    RideDetails,
}

impl Embedding {
    /// The teardown policy for this embedding.
    #[must_use]
    pub const fn teardown_policy(self) -> TeardownPolicy {
        match self {
            Self::DashboardPreview => TeardownPolicy::DestroySurface,
            Self::RideDetails => TeardownPolicy::ClearLayers,
        }
    }
}

/// Popup text for the endpoint markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteLabels {
    /// Origin display name.
    pub origin: String,
    /// Destination display name.
    pub destination: String,
}

impl RouteLabels {
    /// Label both endpoints.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

/// Summary of one render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderReport {
    /// Layers removed by the sweep that preceded drawing.
    pub removed: usize,
    /// Layers drawn, counted by kind.
    pub drawn: BTreeMap<LayerKind, usize>,
}

impl RenderReport {
    /// Number of layers of `kind` drawn.
    #[must_use]
    pub fn count(&self, kind: LayerKind) -> usize {
        self.drawn.get(&kind).copied().unwrap_or(0)
    }

    /// Total layers drawn.
    #[must_use]
    pub fn total(&self) -> usize {
        self.drawn.values().sum()
    }
}

/// Errors raised while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    /// The container is not mounted; nothing was drawn.
    #[error("map surface unavailable: {0}")]
    SurfaceUnavailable(#[source] SurfaceError),
    /// A surface operation failed part-way through a render.
    #[error("failed to {operation}")]
    Surface {
        /// Step that failed.
        operation: &'static str,
        /// Error reported by the surface.
        #[source]
        source: SurfaceError,
    },
}

impl LayerError {
    fn surface(operation: &'static str) -> impl FnOnce(SurfaceError) -> Self {
        move |source| Self::Surface { operation, source }
    }
}

/// Sole owner of the map surface and the layers drawn on it.
///
/// Calls take `&mut self`, so renders on one manager are serialised: each
/// sweep finishes before any new layer is added and a later render always
/// replaces an earlier one.
///
/// # Examples
/// ```
/// use wayline_core::test_support::RecordingSurfaceFactory;
/// use wayline_core::{
///     Coordinate, LayerKind, MapLayerLifecycleManager, MapViewportController, RouteGeometryGenerator,
///     RouteLabels, SurfaceContainer,
/// };
///
/// let origin = Coordinate::new(57.70887, 11.97456)?;
/// let destination = Coordinate::new(57.70713, 11.93829)?;
/// let waypoints = RouteGeometryGenerator::default().generate(origin, destination);
/// let viewport = MapViewportController::default().compute(origin, destination);
///
/// let mut manager = MapLayerLifecycleManager::new(
///     RecordingSurfaceFactory::default(),
///     SurfaceContainer::new("ride-map"),
/// );
/// let report = manager.render(&waypoints, &viewport, &RouteLabels::new("A", "B"))?;
/// assert_eq!(report.count(LayerKind::PrimaryLine), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct MapLayerLifecycleManager<F: SurfaceFactory> {
    factory: F,
    container: SurfaceContainer,
    surface: Option<F::Surface>,
    registry: LayerRegistry,
    style: RouteStyle,
    policy: TeardownPolicy,
}

impl<F: SurfaceFactory> MapLayerLifecycleManager<F> {
    /// Construct a manager with default style and the default teardown
    /// policy. No surface is created until [`initialise`](Self::initialise)
    /// or the first render.
    pub fn new(factory: F, container: SurfaceContainer) -> Self {
        Self {
            factory,
            container,
            surface: None,
            registry: LayerRegistry::default(),
            style: RouteStyle::default(),
            policy: TeardownPolicy::default(),
        }
    }

    /// Replace the route style.
    #[must_use]
    pub fn with_style(mut self, style: RouteStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the teardown policy.
    #[must_use]
    pub fn with_teardown_policy(mut self, policy: TeardownPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use the teardown policy of `embedding`.
    #[must_use]
    pub fn for_embedding(self, embedding: Embedding) -> Self {
        self.with_teardown_policy(embedding.teardown_policy())
    }

    /// Create the surface if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`LayerError::SurfaceUnavailable`] when the container is not
    /// mounted.
    pub fn initialise(&mut self) -> Result<(), LayerError> {
        if self.surface.is_none() {
            let surface = self
                .factory
                .create_surface(&self.container)
                .map_err(|err| match err {
                    SurfaceError::Unavailable { .. } => LayerError::SurfaceUnavailable(err),
                    other => LayerError::Surface {
                        operation: "create surface",
                        source: other,
                    },
                })?;
            debug!("Created map surface in {:?}", self.container.id());
            self.surface = Some(surface);
        }
        Ok(())
    }

    /// Replace the drawn route with `waypoints`.
    ///
    /// # Errors
    /// Returns [`LayerError`] when the surface cannot be created or refuses
    /// an operation. Layers drawn before the failure stay recorded and are
    /// removed by the next sweep.
    pub fn render(
        &mut self,
        waypoints: &Waypoints,
        viewport: &ViewportSpec,
        labels: &RouteLabels,
    ) -> Result<RenderReport, LayerError> {
        self.initialise()?;
        let Some(surface) = self.surface.as_mut() else {
            return Err(LayerError::SurfaceUnavailable(SurfaceError::Unavailable {
                container: self.container.id().to_owned(),
            }));
        };

        surface
            .set_view(viewport)
            .map_err(LayerError::surface("apply viewport"))?;
        let removed = self.registry.sweep(surface);

        let mut painter = Painter {
            surface,
            registry: &mut self.registry,
            style: &self.style,
        };
        painter.draw_lines(waypoints)?;
        painter.draw_endpoints(waypoints, labels)?;
        painter.draw_arrows(waypoints)?;

        let report = RenderReport {
            removed,
            drawn: self.registry.counts(),
        };
        debug!(
            "Rendered {} waypoints as {} layers ({} swept)",
            waypoints.len(),
            report.total(),
            report.removed
        );
        Ok(report)
    }

    /// Remove every owned layer, keeping the surface.
    ///
    /// Returns the number of layers removed.
    pub fn clear(&mut self) -> usize {
        let Some(surface) = self.surface.as_mut() else {
            self.registry.forget();
            return 0;
        };
        self.registry.sweep(surface)
    }

    /// Remove owned layers, then apply the teardown policy.
    pub fn teardown(&mut self) {
        let removed = self.clear();
        if self.policy == TeardownPolicy::DestroySurface
            && let Some(surface) = self.surface.take()
        {
            surface.destroy();
            debug!("Destroyed map surface in {:?}", self.container.id());
        }
        debug!("Teardown removed {removed} layers");
    }

    /// Layers currently owned, in creation order.
    #[must_use]
    pub fn layers(&self) -> &[MapLayer] {
        self.registry.layers()
    }

    /// Whether any owned layer is on the surface.
    #[must_use]
    pub fn has_layers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// The live surface, if one has been created.
    #[must_use]
    pub const fn surface(&self) -> Option<&F::Surface> {
        self.surface.as_ref()
    }

    /// Mutable access to the live surface, for layers this manager does
    /// not own. Sweeps never touch them.
    pub const fn surface_mut(&mut self) -> Option<&mut F::Surface> {
        self.surface.as_mut()
    }

    /// The factory used to create surfaces.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Mutable access to the factory, e.g. to report a container mount.
    pub const fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Active teardown policy.
    #[must_use]
    pub const fn teardown_policy(&self) -> TeardownPolicy {
        self.policy
    }
}

/// Draws one route onto a surface, recording each layer as it is created.
struct Painter<'a, S: MapSurface> {
    surface: &'a mut S,
    registry: &'a mut LayerRegistry,
    style: &'a RouteStyle,
}

impl<S: MapSurface> Painter<'_, S> {
    fn draw_lines(&mut self, waypoints: &Waypoints) -> Result<(), LayerError> {
        let points = waypoints.as_slice();
        let outline = self
            .surface
            .add_polyline(points, &self.style.outline)
            .map_err(LayerError::surface("add outline"))?;
        self.registry.record(LayerKind::OutlineLine, outline);
        self.surface
            .bring_to_back(outline)
            .map_err(LayerError::surface("lower outline"))?;

        let primary = self
            .surface
            .add_polyline(points, &self.style.primary)
            .map_err(LayerError::surface("add route line"))?;
        self.registry.record(LayerKind::PrimaryLine, primary);
        self.surface
            .bring_to_front(primary)
            .map_err(LayerError::surface("raise route line"))?;
        Ok(())
    }

    fn draw_endpoints(
        &mut self,
        waypoints: &Waypoints,
        labels: &RouteLabels,
    ) -> Result<(), LayerError> {
        let start = self
            .surface
            .add_marker(waypoints.origin(), &self.style.start_marker())
            .map_err(LayerError::surface("add start marker"))?;
        self.registry.record(LayerKind::StartMarker, start);
        self.surface
            .bind_popup(start, &popup_html("Pickup", &labels.origin))
            .map_err(LayerError::surface("bind start popup"))?;

        let end = self
            .surface
            .add_marker(waypoints.destination(), &self.style.end_marker())
            .map_err(LayerError::surface("add end marker"))?;
        self.registry.record(LayerKind::EndMarker, end);
        self.surface
            .bind_popup(end, &popup_html("Drop-off", &labels.destination))
            .map_err(LayerError::surface("bind end popup"))?;
        Ok(())
    }

    fn draw_arrows(&mut self, waypoints: &Waypoints) -> Result<(), LayerError> {
        for (position, rotation_deg) in arrow_placements(waypoints.as_slice(), self.style.max_arrows)
        {
            let arrow = self
                .surface
                .add_marker(position, &self.style.arrow_marker(rotation_deg))
                .map_err(LayerError::surface("add direction arrow"))?;
            self.registry.record(LayerKind::DirectionArrow, arrow);
        }
        Ok(())
    }
}

/// Interior waypoints that carry an arrow, with the heading towards the next
/// waypoint in degrees.
///
/// Arrows are spread with a fixed stride so that no more than `max_arrows`
/// appear, whatever the route length. A direct two-point line has no
/// interior and therefore no arrows.
pub(crate) fn arrow_placements(
    points: &[Coordinate],
    max_arrows: usize,
) -> Vec<(Coordinate, f64)> {
    let interior = points.len().saturating_sub(2);
    if interior == 0 || max_arrows == 0 {
        return Vec::new();
    }
    let stride = interior.div_ceil(max_arrows);
    (1..=interior)
        .step_by(stride)
        .take(max_arrows)
        .filter_map(|index| {
            let here = points.get(index)?;
            let next = points.get(index + 1)?;
            Some((*here, heading_deg(*here, *next)))
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "heading is derived from coordinate differences"
)]
fn heading_deg(from: Coordinate, to: Coordinate) -> f64 {
    let dlat = to.latitude() - from.latitude();
    let dlng = to.longitude() - from.longitude();
    dlat.atan2(dlng).to_degrees()
}

fn popup_html(role: &str, name: &str) -> String {
    format!("<strong>{role}</strong><br>{}", escape_html(name))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests;
