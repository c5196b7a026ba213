//! Measured shapes.
//!
//! A shape keeps its committed geometry and the labels derived from it. Labels are recomputed
//! after every change of the geometry and cannot be set from outside. Shapes know nothing about
//! the map: they produce GeoJSON data for their sources with [`Shape::render`], and
//! [`Overlay`](crate::control::Overlay) takes care of sending the data to the map.

use std::fmt::Debug;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use mapruler_types::geojson::point_geometry;
use mapruler_types::{GeoPoint2d, Units};
use serde_json::Value;

use crate::config::OverlayStyle;
use crate::engine::MarkerId;
use crate::layer_sync::{layer_id, source_id, LayerBinding, LayerRole};

mod area;
mod circle;
mod ruler;

pub use area::AreaShape;
pub use circle::{CircleShape, CircleState};
pub use ruler::RulerShape;

/// Id of a shape, unique within one control.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

/// Kind of the measured shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Polyline measuring distance.
    Ruler,
    /// Circle measuring radius and area.
    Circle,
    /// Polygon measuring area.
    Area,
}

impl ShapeKind {
    /// Name of the kind, used in source and layer ids and in event names.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Ruler => "ruler",
            ShapeKind::Circle => "circle",
            ShapeKind::Area => "area",
        }
    }
}

/// Editing state of a ruler or an area shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeState {
    /// No vertices yet.
    Empty,
    /// Vertices can be added.
    Open,
    /// The polygon was closed, no more vertices can be added.
    Closed,
}

/// Result of a measurement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Measurement {
    /// Length of a polyline.
    Line {
        /// Total length.
        length: f64,
        /// Units of the length.
        units: Units,
    },
    /// Circle.
    Circle {
        /// Radius of the circle.
        radius: f64,
        /// Area in square meters.
        area: f64,
        /// Units of the radius.
        units: Units,
    },
    /// Polygon.
    Polygon {
        /// Area in square meters.
        area: f64,
        /// Length of the outline, including the closing segment.
        perimeter: f64,
        /// Units of the perimeter.
        units: Units,
        /// Whether the polygon was closed by the user.
        is_closed: bool,
    },
}

/// Vertex of a shape.
///
/// The `measure` and the `label` of a vertex are derived from the geometry of the shape and
/// are updated by the shape itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    point: GeoPoint2d,
    shape: ShapeId,
    index: usize,
    measure: f64,
    label: String,
    marker: Option<MarkerId>,
    is_closing_handle: bool,
}

impl Vertex {
    pub(crate) fn new(shape: ShapeId, index: usize, point: GeoPoint2d) -> Self {
        Self {
            point,
            shape,
            index,
            measure: 0.0,
            label: String::new(),
            marker: None,
            is_closing_handle: false,
        }
    }

    /// Position of the vertex.
    pub fn point(&self) -> GeoPoint2d {
        self.point
    }

    /// Id of the shape the vertex belongs to.
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Index of the vertex in the shape.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Measured value shown by the vertex label, in the units of the shape. For a ruler this is
    /// the distance from the first vertex along the line, for an area this is the length of the
    /// segment ending at this vertex.
    pub fn measure(&self) -> f64 {
        self.measure
    }

    /// Label shown next to the vertex.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Marker handle of the vertex, if one was created.
    pub fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    /// Whether clicking the marker of this vertex closes the shape.
    pub fn is_closing_handle(&self) -> bool {
        self.is_closing_handle
    }

    pub(crate) fn set_marker(&mut self, marker: MarkerId) {
        self.marker = Some(marker);
    }

    pub(crate) fn take_marker(&mut self) -> Option<MarkerId> {
        self.marker.take()
    }

    fn set_point(&mut self, point: GeoPoint2d) {
        self.point = point;
    }

    fn set_derived(&mut self, measure: f64, label: String) {
        self.measure = measure;
        self.label = label;
    }

    fn set_closing_handle(&mut self, is_closing_handle: bool) {
        self.is_closing_handle = is_closing_handle;
    }
}

/// Data of one source of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceData {
    /// Aspect of the shape the source draws. Together with the shape kind and id it makes the
    /// source id.
    pub aspect: &'static str,
    /// GeoJSON data of the source.
    pub data: GeoJson,
}

/// Common interface of the measured shapes.
pub trait Shape: Debug {
    /// Kind of the shape.
    const KIND: ShapeKind;

    /// Id of the shape.
    fn id(&self) -> ShapeId;

    /// Vertices of the shape that have marker handles.
    fn vertices(&self) -> &[Vertex];

    /// Mutable access to the vertices, used to attach marker handles.
    fn vertices_mut(&mut self) -> &mut [Vertex];

    /// Moves a vertex to a new position. Returns false if there is no vertex with this index.
    fn move_vertex(&mut self, index: usize, point: GeoPoint2d) -> bool;

    /// Layers drawing the shape, in paint order.
    fn layer_bindings(&self, style: &OverlayStyle) -> Vec<LayerBinding>;

    /// Current data of all sources of the shape.
    fn render(&self) -> Vec<SourceData>;

    /// Current measurement, if the shape has anything to measure yet.
    fn measurement(&self) -> Option<Measurement>;
}

pub(crate) fn binding(
    kind: ShapeKind,
    shape: ShapeId,
    aspect: &str,
    role: LayerRole,
    style: &OverlayStyle,
) -> LayerBinding {
    LayerBinding::styled(
        source_id(kind.name(), shape.0, aspect),
        layer_id(kind.name(), shape.0, aspect, role),
        role,
        style,
    )
}

pub(crate) fn feature(geometry: Geometry, properties: Option<JsonObject>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties,
        foreign_members: None,
    }
}

pub(crate) fn label_feature(point: &GeoPoint2d, label: &str, kind: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("label".to_string(), Value::from(label));
    properties.insert("kind".to_string(), Value::from(kind));

    feature(point_geometry(point), Some(properties))
}

pub(crate) fn collection(features: Vec<Feature>) -> GeoJson {
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
