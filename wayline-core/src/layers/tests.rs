//! Unit tests for the layer lifecycle manager.

use super::*;
use crate::test_support::{RecordedContent, RecordingSurface, RecordingSurfaceFactory};
use crate::{MapViewportController, RouteGeometryGenerator};
use rstest::{fixture, rstest};

fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("valid coordinate")
}

struct Route {
    waypoints: Waypoints,
    viewport: ViewportSpec,
    labels: RouteLabels,
}

fn route(origin: Coordinate, destination: Coordinate) -> Route {
    Route {
        waypoints: RouteGeometryGenerator::default().generate(origin, destination),
        viewport: MapViewportController::default().compute(origin, destination),
        labels: RouteLabels::new("Centralstationen", "Lindholmen"),
    }
}

#[fixture]
fn gothenburg() -> Route {
    route(coord(57.70887, 11.97456), coord(57.70713, 11.93829))
}

#[fixture]
fn manager() -> MapLayerLifecycleManager<RecordingSurfaceFactory> {
    MapLayerLifecycleManager::new(
        RecordingSurfaceFactory::default(),
        SurfaceContainer::new("ride-map"),
    )
}

fn surface(manager: &MapLayerLifecycleManager<RecordingSurfaceFactory>) -> &RecordingSurface {
    manager.surface().expect("surface created")
}

#[rstest]
fn render_draws_every_layer_kind(
    gothenburg: Route,
    mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>,
) {
    let report = manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render succeeds");

    assert_eq!(report.removed, 0);
    assert_eq!(report.count(LayerKind::OutlineLine), 1);
    assert_eq!(report.count(LayerKind::PrimaryLine), 1);
    assert_eq!(report.count(LayerKind::StartMarker), 1);
    assert_eq!(report.count(LayerKind::EndMarker), 1);
    assert_eq!(report.count(LayerKind::DirectionArrow), 5);
    assert_eq!(report.total(), 9);
    assert_eq!(surface(&manager).overlay_count(), 9);
    assert_eq!(surface(&manager).view(), Some(&gothenburg.viewport));
}

#[rstest]
fn rerender_leaves_exactly_one_route(
    gothenburg: Route,
    mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>,
) {
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("first render");
    let second = route(coord(57.6896, 11.9733), coord(57.6969, 11.9865));
    let report = manager
        .render(&second.waypoints, &second.viewport, &second.labels)
        .expect("second render");

    assert_eq!(report.removed, 9);
    assert_eq!(surface(&manager).polyline_count(), 2);
    assert_eq!(manager.layers().len(), report.total());
    assert_eq!(manager.factory().created(), 1);
}

#[rstest]
fn same_route_twice_is_idempotent(
    gothenburg: Route,
    mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>,
) {
    let first = manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("first render");
    let second = manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("second render");
    assert_eq!(first.drawn, second.drawn);
    assert_eq!(surface(&manager).overlay_count(), first.total());
}

#[rstest]
fn outline_sits_below_primary(
    gothenburg: Route,
    mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>,
) {
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render");
    let handle_of = |kind| {
        manager
            .layers()
            .iter()
            .find(|layer| layer.kind == kind)
            .map(|layer| layer.handle)
            .expect("layer recorded")
    };
    let outline = surface(&manager)
        .z_index(handle_of(LayerKind::OutlineLine))
        .expect("outline on surface");
    let primary = surface(&manager)
        .z_index(handle_of(LayerKind::PrimaryLine))
        .expect("primary on surface");
    assert_eq!(outline, 1, "outline sits directly above base tiles");
    assert!(outline < primary);
}

#[rstest]
fn popups_escape_location_names(mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>) {
    let mut unsafe_route = route(coord(57.70, 11.90), coord(57.71, 11.92));
    unsafe_route.labels = RouteLabels::new("<script>", "Tom & Jerry's");
    manager
        .render(&unsafe_route.waypoints, &unsafe_route.viewport, &unsafe_route.labels)
        .expect("render");

    let popups: Vec<_> = surface(&manager)
        .overlays()
        .filter_map(|layer| layer.popup.clone())
        .collect();
    assert_eq!(
        popups,
        vec![
            "<strong>Pickup</strong><br>&lt;script&gt;".to_owned(),
            "<strong>Drop-off</strong><br>Tom &amp; Jerry&#39;s".to_owned(),
        ]
    );
}

#[rstest]
fn direct_route_has_no_arrows(mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>) {
    let point = coord(57.70887, 11.97456);
    let same = route(point, point);
    let report = manager
        .render(&same.waypoints, &same.viewport, &same.labels)
        .expect("render");
    assert_eq!(report.count(LayerKind::DirectionArrow), 0);
    assert_eq!(report.total(), 4);
}

#[rstest]
fn unmounted_container_draws_nothing(gothenburg: Route) {
    let mut manager = MapLayerLifecycleManager::new(
        RecordingSurfaceFactory::unmounted(),
        SurfaceContainer::new("ride-map"),
    );
    let err = manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect_err("container missing");
    assert!(matches!(err, LayerError::SurfaceUnavailable(_)));
    assert!(manager.surface().is_none());
    assert!(!manager.has_layers());

    manager.factory_mut().mount();
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render after mount");
    assert_eq!(manager.factory().created(), 1);
}

#[rstest]
fn foreign_layers_survive_sweeps(
    gothenburg: Route,
    mut manager: MapLayerLifecycleManager<RecordingSurfaceFactory>,
) {
    manager.initialise().expect("initialise");
    let foreign = manager
        .surface_mut()
        .expect("surface")
        .add_foreign_marker(coord(57.0, 11.0));
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render");
    manager.clear();

    let remaining = surface(&manager);
    assert!(remaining.layer(foreign).is_some());
    assert_eq!(remaining.overlay_count(), 1);
    assert!(
        remaining
            .layers()
            .iter()
            .any(|layer| layer.content == RecordedContent::Base)
    );
}

#[rstest]
fn partial_render_is_swept_next_time(gothenburg: Route) {
    let mut manager = MapLayerLifecycleManager::new(
        RecordingSurfaceFactory::default().with_add_limit(3),
        SurfaceContainer::new("ride-map"),
    );
    let err = manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect_err("fourth add rejected");
    assert!(matches!(
        err,
        LayerError::Surface {
            operation: "add end marker",
            ..
        }
    ));
    assert_eq!(manager.layers().len(), 3);

    assert_eq!(manager.clear(), 3);
    assert_eq!(surface(&manager).overlay_count(), 0);
}

#[rstest]
#[case(TeardownPolicy::ClearLayers, true)]
#[case(TeardownPolicy::DestroySurface, false)]
fn teardown_follows_policy(
    gothenburg: Route,
    #[from(manager)] fresh: MapLayerLifecycleManager<RecordingSurfaceFactory>,
    #[case] policy: TeardownPolicy,
    #[case] keeps_surface: bool,
) {
    let mut manager = fresh.with_teardown_policy(policy);
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render");
    manager.teardown();

    assert!(!manager.has_layers());
    assert_eq!(manager.surface().is_some(), keeps_surface);
    if let Some(kept) = manager.surface() {
        assert_eq!(kept.overlay_count(), 0);
    }
}

#[rstest]
fn destroyed_surface_is_recreated_on_next_render(
    gothenburg: Route,
    #[from(manager)] fresh: MapLayerLifecycleManager<RecordingSurfaceFactory>,
) {
    let mut manager = fresh.for_embedding(Embedding::DashboardPreview);
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render");
    manager.teardown();
    manager
        .render(&gothenburg.waypoints, &gothenburg.viewport, &gothenburg.labels)
        .expect("render again");
    assert_eq!(manager.factory().created(), 2);
}

#[rstest]
#[case(Embedding::DashboardPreview, TeardownPolicy::DestroySurface)]
#[case(Embedding::RideDetails, TeardownPolicy::ClearLayers)]
fn embeddings_map_to_policies(#[case] embedding: Embedding, #[case] expected: TeardownPolicy) {
    assert_eq!(embedding.teardown_policy(), expected);
}

#[rstest]
fn arrows_are_capped_and_point_forward() {
    let points: Vec<_> = (0..40)
        .map(|step| coord(0.0, f64::from(step) * 0.001))
        .collect();
    let placements = arrow_placements(&points, 5);
    assert_eq!(placements.len(), 5);
    for (_, rotation) in &placements {
        assert!(rotation.abs() < 1e-9, "eastward arrows have zero rotation");
    }
}

#[rstest]
#[case(2, 5, 0)]
#[case(3, 5, 1)]
#[case(7, 5, 5)]
#[case(12, 5, 5)]
#[case(50, 0, 0)]
fn arrow_count_never_exceeds_cap(
    #[case] len: u32,
    #[case] cap: usize,
    #[case] expected: usize,
) {
    let points: Vec<_> = (0..len)
        .map(|step| coord(f64::from(step) * 0.001, 0.0))
        .collect();
    assert_eq!(arrow_placements(&points, cap).len(), expected);
}

#[rstest]
fn northward_arrow_points_up() {
    let points = [coord(0.0, 0.0), coord(0.0, 0.0), coord(1.0, 0.0)];
    let placements = arrow_placements(&points, 5);
    let (_, rotation) = placements.first().expect("one arrow");
    assert!((rotation - 90.0).abs() < 1e-9);
}
