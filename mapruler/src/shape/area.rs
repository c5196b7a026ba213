use geojson::GeoJson;
use mapruler_types::format::{format_area, format_distance};
use mapruler_types::geodesy::{area, centroid, distance, length};
use mapruler_types::geojson::{line_geometry, polygon_geometry};
use mapruler_types::{GeoPoint2d, Units};

use crate::config::OverlayStyle;
use crate::layer_sync::{LayerBinding, LayerRole};
use crate::shape::{
    binding, collection, feature, label_feature, Measurement, Shape, ShapeId, ShapeKind,
    ShapeState, SourceData, Vertex,
};

const POLYGON: &str = "polygon";
const VERTICES: &str = "vertices";
const CENTROID: &str = "centroid";

/// Polygon measuring the area it encloses.
///
/// Vertices are added one by one while the shape is open. The shape is closed by clicking the
/// marker of its first or last vertex, after which no more vertices can be added but existing
/// vertices can still be moved.
///
/// While the shape is open, a preview point following the pointer can be set with
/// [`AreaShape::preview_vertex`]. The preview point is drawn as a part of the polygon but does
/// not count in any measurement.
#[derive(Debug, Clone)]
pub struct AreaShape {
    id: ShapeId,
    units: Units,
    vertices: Vec<Vertex>,
    preview: Option<GeoPoint2d>,
    closed: bool,
}

impl AreaShape {
    /// Creates an empty open shape.
    pub fn new(id: ShapeId, units: Units) -> Self {
        Self {
            id,
            units,
            vertices: vec![],
            preview: None,
            closed: false,
        }
    }

    /// Editing state of the shape.
    pub fn state(&self) -> ShapeState {
        if self.closed {
            ShapeState::Closed
        } else if self.vertices.is_empty() {
            ShapeState::Empty
        } else {
            ShapeState::Open
        }
    }

    /// Adds a vertex and clears the preview point. Returns the index of the new vertex, or
    /// `None` if the shape is already closed.
    pub fn append_vertex(&mut self, point: GeoPoint2d) -> Option<usize> {
        if self.closed {
            return None;
        }

        let index = self.vertices.len();
        self.vertices.push(Vertex::new(self.id, index, point));
        self.preview = None;
        self.update_derived();

        Some(index)
    }

    /// Sets the point following the pointer. Ignored if the shape is closed or has no vertices
    /// yet.
    pub fn preview_vertex(&mut self, point: GeoPoint2d) {
        if self.closed || self.vertices.is_empty() {
            return;
        }

        self.preview = Some(point);
    }

    /// Removes the preview point.
    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// Current preview point.
    pub fn preview(&self) -> Option<GeoPoint2d> {
        self.preview
    }

    /// Closes the polygon. Returns false and does nothing unless the shape is open and has at
    /// least 3 vertices.
    pub fn close(&mut self) -> bool {
        if self.closed || self.vertices.len() < 3 {
            return false;
        }

        self.closed = true;
        self.preview = None;
        self.update_derived();

        true
    }

    /// Area enclosed by the committed vertices in square meters.
    pub fn area(&self) -> f64 {
        area(&self.points())
    }

    /// Length of the outline in the units of the shape. The closing segment is counted once the
    /// shape has 3 vertices.
    pub fn perimeter(&self) -> f64 {
        let points = self.points();
        let open_length = length(&points, self.units);
        match points.as_slice() {
            [first, _, .., last] => open_length + distance(last, first, self.units),
            _ => open_length,
        }
    }

    fn points(&self) -> Vec<GeoPoint2d> {
        self.vertices.iter().map(Vertex::point).collect()
    }

    fn update_derived(&mut self) {
        let points = self.points();
        let count = points.len();
        let closed = self.closed;

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let prev = if i > 0 {
                Some(points[i - 1])
            } else if closed {
                points.last().copied()
            } else {
                None
            };

            match prev {
                Some(prev) => {
                    let point = vertex.point();
                    vertex.set_derived(
                        distance(&prev, &point, self.units),
                        format_distance(distance(&prev, &point, Units::Kilometers)),
                    );
                }
                None => vertex.set_derived(0.0, String::new()),
            }

            vertex.set_closing_handle(!closed && (i == 0 || i + 1 == count));
        }
    }

    fn polygon_data(&self) -> GeoJson {
        let mut ring = self.points();
        ring.extend(self.preview);

        let features = match ring.len() {
            0 | 1 => vec![],
            2 => vec![feature(line_geometry(&ring), None)],
            _ => vec![feature(polygon_geometry(&ring), None)],
        };

        collection(features)
    }

    fn centroid_data(&self) -> GeoJson {
        let label = match centroid(&self.points()) {
            Some(center) if self.vertices.len() >= 3 => {
                vec![label_feature(&center, &format_area(self.area()), "area")]
            }
            _ => vec![],
        };

        collection(label)
    }
}

impl Shape for AreaShape {
    const KIND: ShapeKind = ShapeKind::Area;

    fn id(&self) -> ShapeId {
        self.id
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    fn move_vertex(&mut self, index: usize, point: GeoPoint2d) -> bool {
        let Some(vertex) = self.vertices.get_mut(index) else {
            return false;
        };

        vertex.set_point(point);
        self.update_derived();
        true
    }

    fn layer_bindings(&self, style: &OverlayStyle) -> Vec<LayerBinding> {
        vec![
            binding(Self::KIND, self.id, POLYGON, LayerRole::Fill, style),
            binding(Self::KIND, self.id, POLYGON, LayerRole::Outline, style),
            binding(Self::KIND, self.id, VERTICES, LayerRole::Labels, style),
            binding(Self::KIND, self.id, CENTROID, LayerRole::Labels, style),
        ]
    }

    fn render(&self) -> Vec<SourceData> {
        let labels = self
            .vertices
            .iter()
            .filter(|v| !v.label().is_empty())
            .map(|v| label_feature(&v.point(), v.label(), "distance"))
            .collect();

        vec![
            SourceData {
                aspect: POLYGON,
                data: self.polygon_data(),
            },
            SourceData {
                aspect: VERTICES,
                data: collection(labels),
            },
            SourceData {
                aspect: CENTROID,
                data: self.centroid_data(),
            },
        ]
    }

    fn measurement(&self) -> Option<Measurement> {
        (!self.vertices.is_empty()).then(|| Measurement::Polygon {
            area: self.area(),
            perimeter: self.perimeter(),
            units: self.units,
            is_closed: self.closed,
        })
    }
}
