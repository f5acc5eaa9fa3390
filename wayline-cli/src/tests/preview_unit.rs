//! Focused unit tests covering preview configuration and rendering.

use super::helpers::{HARBOUR_REGISTRY, Workspace, split_output};
use super::*;
use crate::preview::{
    PREVIEW_CONTAINER, PreviewConfig, config_from_layers_for_test, render_preview,
    run_preview_with,
};
use rstest::{fixture, rstest};
use wayline_core::{LocationInput, RawCoordinate, SELECT_ROUTE_MESSAGE, UNKNOWN_LOCATION_MESSAGE};

#[fixture]
fn args() -> PreviewArgs {
    PreviewArgs {
        from: Some("Centralstationen".to_owned()),
        to: Some("Lindholmen".to_owned()),
        ..PreviewArgs::default()
    }
}

fn config(origin: &str, destination: &str) -> PreviewConfig {
    PreviewConfig {
        origin: LocationInput::named(origin),
        destination: LocationInput::named(destination),
        registry: None,
        speed_kmh: None,
        output: None,
    }
}

#[rstest]
#[case::origin(ARG_FROM, ENV_FROM)]
#[case::destination(ARG_TO, ENV_TO)]
fn converting_without_endpoint_errors(
    args: PreviewArgs,
    #[case] missing: &'static str,
    #[case] expected_env: &'static str,
) {
    let incomplete = if missing == ARG_FROM {
        PreviewArgs { from: None, ..args }
    } else {
        PreviewArgs { to: None, ..args }
    };

    let err = PreviewConfig::try_from(incomplete).expect_err("missing endpoint should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, missing);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn positions_are_attached_to_named_inputs(args: PreviewArgs) {
    let with_positions = PreviewArgs {
        from_position: Some("57.7, 11.9".to_owned()),
        to_position: Some("NaN,11.95".to_owned()),
        ..args
    };

    let config = PreviewConfig::try_from(with_positions).expect("config should build");
    assert_eq!(config.origin.name, "Centralstationen");
    assert_eq!(
        config.origin.position,
        Some(RawCoordinate {
            latitude: 57.7,
            longitude: 11.9,
        })
    );
    let destination = config.destination.position.expect("position kept");
    assert!(destination.latitude.is_nan());
}

#[rstest]
#[case::no_comma("57.7")]
#[case::not_a_number("north,11.9")]
#[case::empty("")]
fn malformed_positions_are_rejected(args: PreviewArgs, #[case] raw: &str) {
    let malformed = PreviewArgs {
        from_position: Some(raw.to_owned()),
        ..args
    };

    let err = PreviewConfig::try_from(malformed).expect_err("position should be rejected");
    match err {
        CliError::InvalidPosition { field, value } => {
            assert_eq!(field, ARG_FROM_POSITION);
            assert_eq!(value, raw);
        }
        other => panic!("expected InvalidPosition, found {other:?}"),
    }
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-10.0)]
#[case::infinite(f64::INFINITY)]
fn non_positive_speed_is_rejected(args: PreviewArgs, #[case] speed: f64) {
    let err = PreviewConfig::try_from(PreviewArgs {
        speed: Some(speed),
        ..args
    })
    .expect_err("speed should be rejected");
    assert!(matches!(err, CliError::InvalidSpeed { .. }));
}

#[rstest]
fn renders_builtin_route() {
    let preview = render_preview(&config("Centralstationen", "Lindholmen")).expect("preview");
    assert_eq!(preview.summary, "Centralstationen → Lindholmen: 2.6 km · 3 min");
    assert_eq!(preview.collection["type"], "FeatureCollection");
    assert_eq!(preview.collection["view"]["container"], PREVIEW_CONTAINER);
    let features = preview.collection["features"]
        .as_array()
        .expect("features array");
    let lines = features
        .iter()
        .filter(|feature| feature["geometry"]["type"] == "LineString")
        .count();
    assert_eq!(lines, 2);
}

#[rstest]
fn slower_speed_lengthens_eta() {
    let slow = PreviewConfig {
        speed_kmh: Some(25.0),
        ..config("Centralstationen", "Lindholmen")
    };
    let preview = render_preview(&slow).expect("preview");
    assert!(preview.summary.ends_with("2.6 km · 6 min"), "{}", preview.summary);
}

#[rstest]
fn degraded_route_is_flagged() {
    let preview = render_preview(&config("Centralstationen", "Atlantis")).expect("preview");
    assert!(preview.summary.contains("approximate"), "{}", preview.summary);
}

#[rstest]
#[case::unknown_pair("Atlantis", "Lemuria", UNKNOWN_LOCATION_MESSAGE)]
#[case::blank_origin("", "Lindholmen", SELECT_ROUTE_MESSAGE)]
fn views_without_route_error(
    #[case] origin: &str,
    #[case] destination: &str,
    #[case] expected: &str,
) {
    let err = render_preview(&config(origin, destination)).expect_err("nothing to preview");
    match err {
        CliError::NoRoute { message } => assert_eq!(message, expected),
        other => panic!("expected NoRoute, found {other:?}"),
    }
}

#[rstest]
fn registry_file_replaces_builtin_locations() {
    let workspace = Workspace::new();
    let registry = workspace.write("places.json", HARBOUR_REGISTRY);
    let with_registry = PreviewConfig {
        registry: Some(registry),
        ..config("Harbour", "Museum")
    };

    let preview = render_preview(&with_registry).expect("preview");
    assert!(!preview.summary.contains("approximate"), "{}", preview.summary);

    let builtin_only = render_preview(&PreviewConfig {
        registry: None,
        ..with_registry
    })
    .expect_err("neither name is built in");
    assert_eq!(no_route_message(&builtin_only), Some(UNKNOWN_LOCATION_MESSAGE));
}

fn no_route_message(err: &CliError) -> Option<&'static str> {
    match err {
        CliError::NoRoute { message } => Some(*message),
        _ => None,
    }
}

#[rstest]
fn unreadable_registry_maps_to_load_error() {
    let workspace = Workspace::new();
    let missing = PreviewConfig {
        registry: Some(workspace.path("absent.json")),
        ..config("Harbour", "Museum")
    };
    let err = render_preview(&missing).expect_err("registry is missing");
    assert!(matches!(err, CliError::LoadRegistry(_)));
}

#[rstest]
#[case::missing_file("absent.json")]
#[case::missing_directory("nowhere/absent.json")]
#[case::directory("places")]
fn registry_must_name_an_existing_file(args: PreviewArgs, #[case] relative: &str) {
    let workspace = Workspace::new();
    std::fs::create_dir(workspace.path("places").as_std_path()).expect("create directory");
    let mut buffer = Vec::new();
    let err = run_preview_with(
        PreviewArgs {
            registry: Some(workspace.path(relative)),
            ..args
        },
        &mut buffer,
    )
    .expect_err("registry path is rejected before loading");
    match err {
        CliError::RegistryPathNotFile { field, path } => {
            assert_eq!(field, ARG_REGISTRY);
            assert_eq!(path, workspace.path(relative));
        }
        other => panic!("expected RegistryPathNotFile, found {other:?}"),
    }
    assert!(buffer.is_empty());
}

#[rstest]
fn writes_geojson_then_summary_to_stdout(args: PreviewArgs) {
    let mut buffer = Vec::new();
    run_preview_with(args, &mut buffer).expect("preview succeeds");

    let output = String::from_utf8(buffer).expect("stdout utf-8");
    let (collection, summary) = split_output(&output);
    assert_eq!(collection["type"], "FeatureCollection");
    assert_eq!(summary, "Centralstationen → Lindholmen: 2.6 km · 3 min");
}

#[rstest]
fn writes_geojson_to_output_file(args: PreviewArgs) {
    let workspace = Workspace::new();
    let output = workspace.path("out/route.geojson");
    let mut buffer = Vec::new();
    run_preview_with(
        PreviewArgs {
            output: Some(output.clone()),
            ..args
        },
        &mut buffer,
    )
    .expect("preview succeeds");

    let stdout = String::from_utf8(buffer).expect("stdout utf-8");
    assert_eq!(stdout, "Centralstationen → Lindholmen: 2.6 km · 3 min\n");
    let written = std::fs::read_to_string(output.as_std_path()).expect("output written");
    let collection: serde_json::Value = serde_json::from_str(&written).expect("GeoJSON file");
    assert_eq!(collection["type"], "FeatureCollection");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "from": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "from": "Liseberg",
            "to": "Chalmers",
            "speed": 30.0,
        }),
        None,
    );
    composer.push_environment(json!({
        "to": "Lindholmen",
    }));
    composer.push_cli(json!({
        "from": "Centralstationen",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.origin, LocationInput::named("Centralstationen"));
    assert_eq!(config.destination, LocationInput::named("Lindholmen"));
    assert_eq!(config.speed_kmh, Some(30.0));
    assert!(config.output.is_none());
}
