//! Headless map surface that renders to GeoJSON.
//!
//! [`GeoJsonSurface`] keeps its layers in stacking order and can export them
//! as a `FeatureCollection`, bottom layer first. Marker and line styling is
//! written to feature properties using the simplestyle names most GeoJSON
//! viewers understand (`stroke`, `stroke-width`, `marker-color`). The last
//! applied view travels as a foreign member named `view`.

use geo::{BoundingRect, MultiPoint, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};
use serde_json::{Value, json};
use wayline_core::{
    Coordinate, LayerHandle, MapSurface, MarkerIcon, MarkerOptions, PolylineOptions,
    SurfaceContainer, SurfaceError, SurfaceFactory, ViewportSpec,
};

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Marker(Coordinate),
    Line(Vec<Coordinate>),
}

/// One layer on the surface, kept in our own coordinates until export.
#[derive(Debug, Clone, PartialEq)]
struct Layer {
    handle: LayerHandle,
    shape: Shape,
    properties: JsonObject,
}

impl Layer {
    fn to_feature(&self) -> Feature {
        let value = match &self.shape {
            Shape::Marker(position) => geojson::Value::Point(position_of(*position)),
            Shape::Line(points) => {
                geojson::Value::LineString(points.iter().copied().map(position_of).collect())
            }
        };
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: Some(Id::Number(self.handle.get().into())),
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }

    fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let points: &[Coordinate] = match &self.shape {
            Shape::Marker(position) => std::slice::from_ref(position),
            Shape::Line(points) => points,
        };
        points.iter().copied()
    }
}

/// GeoJSON positions are `[longitude, latitude]`.
fn position_of(coordinate: Coordinate) -> Vec<f64> {
    vec![coordinate.longitude(), coordinate.latitude()]
}

/// A [`MapSurface`] that accumulates GeoJSON features.
///
/// # Examples
/// ```
/// use wayline_core::{Coordinate, MapSurface, PolylineOptions};
/// use wayline_data::GeoJsonSurface;
///
/// let mut surface = GeoJsonSurface::new("preview");
/// let points = [Coordinate::new(57.70, 11.97)?, Coordinate::new(57.71, 11.94)?];
/// let options = PolylineOptions { color: "#3b82f6".into(), weight: 5.0, opacity: 0.9 };
/// surface.add_polyline(&points, &options)?;
///
/// let collection = surface.to_feature_collection();
/// assert_eq!(collection.features.len(), 1);
/// assert_eq!(surface.to_json_value()["features"][0]["geometry"]["type"], "LineString");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoJsonSurface {
    container: String,
    layers: Vec<Layer>,
    view: Option<ViewportSpec>,
    next_id: u64,
}

impl GeoJsonSurface {
    /// Create an empty surface for `container`.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Self::default()
        }
    }

    /// Number of features held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the surface holds no features.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Last view applied.
    #[must_use]
    pub const fn view(&self) -> Option<&ViewportSpec> {
        self.view.as_ref()
    }

    /// Export every layer as a GeoJSON `FeatureCollection`.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let foreign_members = self.view.map(|view| {
            let mut members = JsonObject::new();
            members.insert(
                "view".to_owned(),
                json!({
                    "container": self.container,
                    "center": position_of(view.center),
                    "zoom": view.zoom,
                }),
            );
            members
        });
        FeatureCollection {
            bbox: self.bbox().map(Vec::from),
            features: self.layers.iter().map(Layer::to_feature).collect(),
            foreign_members,
        }
    }

    /// The exported collection as a JSON value.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        Value::Object(JsonObject::from(&self.to_feature_collection()))
    }

    /// `[west, south, east, north]` around every feature.
    fn bbox(&self) -> Option<[f64; 4]> {
        let points: MultiPoint<f64> = self
            .layers
            .iter()
            .flat_map(Layer::coordinates)
            .map(|coordinate| Point::from(geo::Coord::from(coordinate)))
            .collect();
        points
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }

    fn push(&mut self, shape: Shape, properties: JsonObject) -> LayerHandle {
        self.next_id += 1;
        let handle = LayerHandle::new(self.next_id);
        self.layers.push(Layer {
            handle,
            shape,
            properties,
        });
        handle
    }

    fn position(&self, handle: LayerHandle) -> Result<usize, SurfaceError> {
        self.layers
            .iter()
            .position(|layer| layer.handle == handle)
            .ok_or(SurfaceError::UnknownLayer(handle))
    }

    fn take(&mut self, handle: LayerHandle) -> Result<Layer, SurfaceError> {
        let index = self.position(handle)?;
        Ok(self.layers.remove(index))
    }
}

fn marker_properties(options: &MarkerOptions) -> JsonObject {
    let mut properties = JsonObject::new();
    match &options.icon {
        MarkerIcon::Pin { color } => {
            properties.insert("marker-symbol".to_owned(), json!("pin"));
            properties.insert("marker-color".to_owned(), json!(color));
        }
        MarkerIcon::Arrow {
            color,
            rotation_deg,
        } => {
            properties.insert("marker-symbol".to_owned(), json!("arrow"));
            properties.insert("marker-color".to_owned(), json!(color));
            properties.insert("rotation".to_owned(), json!(rotation_deg));
        }
    }
    properties.insert("interactive".to_owned(), json!(options.interactive));
    properties
}

fn polyline_properties(options: &PolylineOptions) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("stroke".to_owned(), json!(options.color));
    properties.insert("stroke-width".to_owned(), json!(options.weight));
    properties.insert("stroke-opacity".to_owned(), json!(options.opacity));
    properties
}

impl MapSurface for GeoJsonSurface {
    fn set_view(&mut self, viewport: &ViewportSpec) -> Result<(), SurfaceError> {
        self.view = Some(*viewport);
        Ok(())
    }

    fn add_marker(
        &mut self,
        position: Coordinate,
        options: &MarkerOptions,
    ) -> Result<LayerHandle, SurfaceError> {
        Ok(self.push(Shape::Marker(position), marker_properties(options)))
    }

    fn add_polyline(
        &mut self,
        points: &[Coordinate],
        options: &PolylineOptions,
    ) -> Result<LayerHandle, SurfaceError> {
        if points.len() < 2 {
            return Err(SurfaceError::Rejected {
                operation: "add polyline",
                reason: format!("a line needs two points, got {}", points.len()),
            });
        }
        Ok(self.push(
            Shape::Line(points.to_vec()),
            polyline_properties(options),
        ))
    }

    fn remove_layer(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        self.take(handle).map(drop)
    }

    fn bind_popup(&mut self, handle: LayerHandle, html: &str) -> Result<(), SurfaceError> {
        let index = self.position(handle)?;
        if let Some(layer) = self.layers.get_mut(index) {
            layer
                .properties
                .insert("popup".to_owned(), json!(html));
        }
        Ok(())
    }

    fn bring_to_front(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        let layer = self.take(handle)?;
        self.layers.push(layer);
        Ok(())
    }

    fn bring_to_back(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        let layer = self.take(handle)?;
        self.layers.insert(0, layer);
        Ok(())
    }
}

/// Creates [`GeoJsonSurface`]s. Headless containers are always mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeoJsonSurfaceFactory;

impl SurfaceFactory for GeoJsonSurfaceFactory {
    type Surface = GeoJsonSurface;

    fn create_surface(
        &mut self,
        container: &SurfaceContainer,
    ) -> Result<Self::Surface, SurfaceError> {
        Ok(GeoJsonSurface::new(container.id()))
    }
}
