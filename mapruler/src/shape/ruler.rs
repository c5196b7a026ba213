use mapruler_types::format::format_distance;
use mapruler_types::geodesy::distance;
use mapruler_types::geojson::line_geometry;
use mapruler_types::{GeoPoint2d, Units};

use crate::config::OverlayStyle;
use crate::layer_sync::{LayerBinding, LayerRole};
use crate::shape::{
    binding, collection, feature, label_feature, Measurement, Shape, ShapeId, ShapeKind,
    ShapeState, SourceData, Vertex,
};

const LINE: &str = "line";
const LABELS: &str = "labels";

/// Polyline measuring the distance along its vertices.
///
/// Each vertex is labeled with the distance from the first vertex along the line. A ruler is
/// never closed: vertices can be added until measuring is turned off.
#[derive(Debug, Clone)]
pub struct RulerShape {
    id: ShapeId,
    units: Units,
    vertices: Vec<Vertex>,
}

impl RulerShape {
    /// Creates an empty ruler.
    pub fn new(id: ShapeId, units: Units) -> Self {
        Self {
            id,
            units,
            vertices: vec![],
        }
    }

    /// Editing state of the ruler. A ruler is never [`ShapeState::Closed`].
    pub fn state(&self) -> ShapeState {
        if self.vertices.is_empty() {
            ShapeState::Empty
        } else {
            ShapeState::Open
        }
    }

    /// Adds a vertex to the end of the line. Returns the index of the new vertex.
    pub fn append_vertex(&mut self, point: GeoPoint2d) -> usize {
        let index = self.vertices.len();
        self.vertices.push(Vertex::new(self.id, index, point));
        self.update_labels();

        index
    }

    /// Length of the line in the units of the ruler.
    pub fn length(&self) -> f64 {
        self.vertices.last().map(Vertex::measure).unwrap_or(0.0)
    }

    fn points(&self) -> Vec<GeoPoint2d> {
        self.vertices.iter().map(Vertex::point).collect()
    }

    fn update_labels(&mut self) {
        let mut total = 0.0;
        let mut total_km = 0.0;
        let mut prev: Option<GeoPoint2d> = None;

        for vertex in &mut self.vertices {
            if let Some(prev) = prev {
                total += distance(&prev, &vertex.point(), self.units);
                total_km += distance(&prev, &vertex.point(), Units::Kilometers);
            }

            vertex.set_derived(total, format_distance(total_km));
            prev = Some(vertex.point());
        }
    }
}

impl Shape for RulerShape {
    const KIND: ShapeKind = ShapeKind::Ruler;

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
        // Every label after the moved vertex depends on its position.
        self.update_labels();
        true
    }

    fn layer_bindings(&self, style: &OverlayStyle) -> Vec<LayerBinding> {
        vec![
            binding(Self::KIND, self.id, LINE, LayerRole::Line, style),
            binding(Self::KIND, self.id, LABELS, LayerRole::Labels, style),
        ]
    }

    fn render(&self) -> Vec<SourceData> {
        let line = if self.vertices.len() > 1 {
            vec![feature(line_geometry(&self.points()), None)]
        } else {
            vec![]
        };

        let labels = self
            .vertices
            .iter()
            .map(|v| label_feature(&v.point(), v.label(), "distance"))
            .collect();

        vec![
            SourceData {
                aspect: LINE,
                data: collection(line),
            },
            SourceData {
                aspect: LABELS,
                data: collection(labels),
            },
        ]
    }

    fn measurement(&self) -> Option<Measurement> {
        (!self.vertices.is_empty()).then(|| Measurement::Line {
            length: self.length(),
            units: self.units,
        })
    }
}
