//! Drives one render cycle per change of selected endpoints.
//!
//! [`RenderOrchestrator`] ties the pipeline together: resolve both inputs,
//! generate the path, compute metrics and the viewport, then hand everything
//! to the [`MapLayerLifecycleManager`]. It remembers the endpoints it last
//! rendered and skips work when an update carries the same pair.

use log::{debug, warn};
use thiserror::Error;

use crate::layers::{LayerError, MapLayerLifecycleManager, RenderReport, RouteLabels};
use crate::resolver::{CoordinateResolver, Resolution};
use crate::surface::SurfaceFactory;
use crate::{
    LocationInput, MapViewportController, RouteGeometryGenerator, RouteMetrics,
    RouteMetricsCalculator,
};

/// Placeholder shown before both endpoints are chosen.
pub const SELECT_ROUTE_MESSAGE: &str = "Select a route to view the map";
/// Placeholder shown when neither endpoint could be resolved.
pub const UNKNOWN_LOCATION_MESSAGE: &str = "Unknown location";

/// Identity of an endpoint pair, compared bit-for-bit so NaN inputs still
/// match themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    origin: EndpointKey,
    destination: EndpointKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EndpointKey {
    name: String,
    position: Option<[u64; 2]>,
}

impl From<&LocationInput> for EndpointKey {
    fn from(input: &LocationInput) -> Self {
        Self {
            name: input.name.clone(),
            position: input
                .position
                .map(|raw| [raw.latitude.to_bits(), raw.longitude.to_bits()]),
        }
    }
}

impl RouteKey {
    /// Key for an origin and destination pair.
    #[must_use]
    pub fn new(origin: &LocationInput, destination: &LocationInput) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

/// What the map currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteView {
    /// No route selected yet.
    #[default]
    Idle,
    /// Neither endpoint resolved; nothing is drawn.
    Unresolved,
    /// The map container is not mounted; the next update retries.
    Deferred {
        /// Metrics for the pending route.
        metrics: RouteMetrics,
    },
    /// The route is on the map.
    Rendered {
        /// Resolved origin.
        origin: Resolution,
        /// Resolved destination.
        destination: Resolution,
        /// Distance and ETA summary.
        metrics: RouteMetrics,
        /// Layers drawn in this cycle.
        report: RenderReport,
        /// One endpoint fell back to the default location.
        degraded: bool,
    },
}

impl RouteView {
    /// User-facing text to show instead of a map, if any.
    #[must_use]
    pub const fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Idle => Some(SELECT_ROUTE_MESSAGE),
            Self::Unresolved => Some(UNKNOWN_LOCATION_MESSAGE),
            Self::Deferred { .. } | Self::Rendered { .. } => None,
        }
    }

    /// Metrics for the selected route, when one could be computed.
    #[must_use]
    pub const fn metrics(&self) -> Option<RouteMetrics> {
        match self {
            Self::Deferred { metrics } | Self::Rendered { metrics, .. } => Some(*metrics),
            Self::Idle | Self::Unresolved => None,
        }
    }

    /// Whether the route is drawn.
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    /// Whether a drawn route substitutes the default for one endpoint.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Rendered { degraded: true, .. })
    }
}

/// Errors raised by [`RenderOrchestrator::update`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Drawing the route failed.
    #[error("failed to render route")]
    Layers(#[from] LayerError),
}

/// Recomputes and redraws the route whenever the endpoints change.
///
/// # Examples
/// ```
/// use wayline_core::test_support::RecordingSurfaceFactory;
/// use wayline_core::{
///     LocationInput, MapLayerLifecycleManager, RenderOrchestrator, SurfaceContainer,
/// };
///
/// let manager = MapLayerLifecycleManager::new(
///     RecordingSurfaceFactory::default(),
///     SurfaceContainer::new("ride-map"),
/// );
/// let mut orchestrator = RenderOrchestrator::new(manager);
/// let view = orchestrator.update(
///     &LocationInput::named("Centralstationen"),
///     &LocationInput::named("Lindholmen"),
/// )?;
/// let metrics = view.metrics().expect("route rendered");
/// assert_eq!(metrics.summary(), "2.6 km · 3 min");
/// # Ok::<(), wayline_core::RenderError>(())
/// ```
#[derive(Debug)]
pub struct RenderOrchestrator<F: SurfaceFactory> {
    resolver: CoordinateResolver,
    generator: RouteGeometryGenerator,
    calculator: RouteMetricsCalculator,
    viewport: MapViewportController,
    layers: MapLayerLifecycleManager<F>,
    last_key: Option<RouteKey>,
    view: RouteView,
}

impl<F: SurfaceFactory> RenderOrchestrator<F> {
    /// Build an orchestrator with default pipeline stages.
    pub fn new(layers: MapLayerLifecycleManager<F>) -> Self {
        Self {
            resolver: CoordinateResolver::default(),
            generator: RouteGeometryGenerator::default(),
            calculator: RouteMetricsCalculator::default(),
            viewport: MapViewportController::default(),
            layers,
            last_key: None,
            view: RouteView::Idle,
        }
    }

    /// Replace the resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: CoordinateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the geometry generator.
    #[must_use]
    pub fn with_generator(mut self, generator: RouteGeometryGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the metrics calculator.
    #[must_use]
    pub fn with_calculator(mut self, calculator: RouteMetricsCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// Replace the viewport controller.
    #[must_use]
    pub fn with_viewport(mut self, viewport: MapViewportController) -> Self {
        self.viewport = viewport;
        self
    }

    /// Bring the map in line with the selected endpoints.
    ///
    /// Returns the cached view when the pair matches the last successful
    /// update, unless that update was deferred.
    ///
    /// # Errors
    /// Returns [`RenderError`] when the surface rejects an operation. The
    /// view drops back to [`RouteView::Idle`] and the pair is not
    /// remembered, so the next update retries.
    pub fn update(
        &mut self,
        origin: &LocationInput,
        destination: &LocationInput,
    ) -> Result<&RouteView, RenderError> {
        let key = RouteKey::new(origin, destination);
        let deferred = matches!(self.view, RouteView::Deferred { .. });
        if !deferred && self.last_key.as_ref() == Some(&key) {
            return Ok(&self.view);
        }
        self.last_key = None;
        match self.refresh(origin, destination) {
            Ok(view) => {
                self.view = view;
                self.last_key = Some(key);
                Ok(&self.view)
            }
            Err(err) => {
                self.view = RouteView::Idle;
                Err(err)
            }
        }
    }

    fn refresh(
        &mut self,
        origin: &LocationInput,
        destination: &LocationInput,
    ) -> Result<RouteView, RenderError> {
        if origin.is_blank() || destination.is_blank() {
            self.layers.clear();
            return Ok(RouteView::Idle);
        }

        let from = self.resolver.resolve_input(origin);
        let to = self.resolver.resolve_input(destination);
        if from.is_fallback() && to.is_fallback() {
            warn!(
                "Neither {:?} nor {:?} resolved; clearing route",
                from.location.name, to.location.name
            );
            self.layers.clear();
            return Ok(RouteView::Unresolved);
        }
        let degraded = from.is_fallback() || to.is_fallback();

        let (start, end) = (from.coordinate(), to.coordinate());
        let waypoints = self.generator.generate(start, end);
        let metrics = self.calculator.compute(start, end);
        let viewport = self.viewport.compute(start, end);
        let labels = RouteLabels::new(from.location.name.clone(), to.location.name.clone());

        match self.layers.render(&waypoints, &viewport, &labels) {
            Ok(report) => Ok(RouteView::Rendered {
                origin: from,
                destination: to,
                metrics,
                report,
                degraded,
            }),
            Err(LayerError::SurfaceUnavailable(err)) => {
                debug!("Deferring render: {err}");
                Ok(RouteView::Deferred { metrics })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The view produced by the last update.
    #[must_use]
    pub const fn view(&self) -> &RouteView {
        &self.view
    }

    /// Metrics snapshot for the current route.
    #[must_use]
    pub const fn metrics(&self) -> Option<RouteMetrics> {
        self.view.metrics()
    }

    /// The layer manager.
    #[must_use]
    pub const fn layers(&self) -> &MapLayerLifecycleManager<F> {
        &self.layers
    }

    /// Mutable access to the layer manager.
    pub const fn layers_mut(&mut self) -> &mut MapLayerLifecycleManager<F> {
        &mut self.layers
    }

    /// Tear the map down and forget the last route.
    pub fn teardown(&mut self) {
        self.layers.teardown();
        self.last_key = None;
        self.view = RouteView::Idle;
    }
}
