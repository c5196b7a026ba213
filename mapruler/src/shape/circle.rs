use geojson::GeoJson;
use mapruler_types::format::{format_area, format_radius};
use mapruler_types::geodesy::{area, circle_polygon, distance};
use mapruler_types::geojson::polygon_geometry;
use mapruler_types::{GeoPoint2d, GeodesyError, Units};

use crate::config::OverlayStyle;
use crate::layer_sync::{LayerBinding, LayerRole};
use crate::shape::{
    binding, collection, feature, label_feature, Measurement, Shape, ShapeId, ShapeKind,
    SourceData, Vertex,
};

const POLYGON: &str = "polygon";
const LABELS: &str = "labels";

/// Drawing state of a [`CircleShape`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CircleState {
    /// Center is not set yet.
    Empty,
    /// The user is dragging the pointer away from the center.
    Dragging,
    /// The drag gesture ended. The circle cannot be changed anymore.
    Done,
}

/// Circle measuring its radius and area.
///
/// The circle is drawn with one drag gesture: the center is set where the mouse button is
/// pressed, and the radius follows the pointer until the button is released.
#[derive(Debug, Clone)]
pub struct CircleShape {
    id: ShapeId,
    units: Units,
    steps: usize,
    center: Option<GeoPoint2d>,
    radius: f64,
    state: CircleState,
}

impl CircleShape {
    /// Creates a circle without a center. The circle is drawn as a polygon with `steps`
    /// segments.
    pub fn new(id: ShapeId, units: Units, steps: usize) -> Self {
        Self {
            id,
            units,
            steps,
            center: None,
            radius: 0.0,
            state: CircleState::Empty,
        }
    }

    /// Drawing state of the circle.
    pub fn state(&self) -> CircleState {
        self.state
    }

    /// Center of the circle, if set.
    pub fn center(&self) -> Option<GeoPoint2d> {
        self.center
    }

    /// Radius in the units of the circle.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sets the center and starts dragging. Ignored unless the circle is empty.
    pub fn start(&mut self, center: GeoPoint2d) -> bool {
        if self.state != CircleState::Empty {
            return false;
        }

        self.center = Some(center);
        self.radius = 0.0;
        self.state = CircleState::Dragging;
        true
    }

    /// Sets the radius to the distance between the center and the `point`. Ignored unless the
    /// circle is being dragged.
    pub fn radius_update(&mut self, point: GeoPoint2d) -> bool {
        let (CircleState::Dragging, Some(center)) = (self.state, self.center) else {
            return false;
        };

        self.radius = distance(&center, &point, self.units);
        true
    }

    /// Ends the drag gesture.
    pub fn finish(&mut self) -> bool {
        if self.state != CircleState::Dragging {
            return false;
        }

        self.state = CircleState::Done;
        true
    }

    /// Closed ring approximating the circle. Empty if the center is not set.
    pub fn ring(&self) -> Result<Vec<GeoPoint2d>, GeodesyError> {
        match self.center {
            Some(center) => circle_polygon(&center, self.radius, self.steps, self.units),
            None => Ok(vec![]),
        }
    }

    /// Area of the drawn polygon in square meters.
    pub fn area(&self) -> f64 {
        match self.ring() {
            Ok(ring) => area(&ring),
            Err(err) => {
                log::debug!("Cannot build circle {:?}: {err}", self.id);
                0.0
            }
        }
    }

    fn radius_km(&self) -> f64 {
        self.units.convert(self.radius, Units::Kilometers)
    }
}

impl Shape for CircleShape {
    const KIND: ShapeKind = ShapeKind::Circle;

    fn id(&self) -> ShapeId {
        self.id
    }

    fn vertices(&self) -> &[Vertex] {
        &[]
    }

    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut []
    }

    fn move_vertex(&mut self, _index: usize, _point: GeoPoint2d) -> bool {
        false
    }

    fn layer_bindings(&self, style: &OverlayStyle) -> Vec<LayerBinding> {
        vec![
            binding(Self::KIND, self.id, POLYGON, LayerRole::Fill, style),
            binding(Self::KIND, self.id, POLYGON, LayerRole::Outline, style),
            binding(Self::KIND, self.id, LABELS, LayerRole::Labels, style),
        ]
    }

    fn render(&self) -> Vec<SourceData> {
        let ring = match self.ring() {
            Ok(ring) => ring,
            Err(err) => {
                log::debug!("Cannot build circle {:?}: {err}", self.id);
                vec![]
            }
        };

        let mut polygon = vec![];
        let mut labels = vec![];
        if let (Some(center), Some(top)) = (self.center, ring.first()) {
            if self.radius > 0.0 {
                polygon.push(feature(polygon_geometry(&ring), None));
            }

            labels.push(label_feature(top, &format_radius(self.radius_km()), "radius"));

            let area_label = format_area(area(&ring));
            if !area_label.is_empty() {
                labels.push(label_feature(&center, &area_label, "area"));
            }
        }

        vec![
            SourceData {
                aspect: POLYGON,
                data: collection(polygon),
            },
            SourceData {
                aspect: LABELS,
                data: collection(labels),
            },
        ]
    }

    fn measurement(&self) -> Option<Measurement> {
        self.center.map(|_| Measurement::Circle {
            radius: self.radius,
            area: self.area(),
            units: self.units,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use mapruler_types::geodesy::destination;
    use mapruler_types::lonlat;

    use super::*;

    fn labels(circle: &CircleShape) -> Vec<String> {
        let data = circle.render();
        let GeoJson::FeatureCollection(collection) = &data[1].data else {
            panic!("not a collection");
        };

        collection
            .features
            .iter()
            .filter_map(|f| f.property("label"))
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn drag_gesture() {
        let mut circle = CircleShape::new(ShapeId(0), Units::Kilometers, 64);
        assert_eq!(circle.state(), CircleState::Empty);
        assert!(!circle.radius_update(lonlat!(1.0, 1.0)));
        assert!(!circle.finish());

        assert!(circle.start(lonlat!(0.0, 0.0)));
        assert_eq!(circle.state(), CircleState::Dragging);
        assert!(!circle.start(lonlat!(1.0, 1.0)));

        assert!(circle.radius_update(lonlat!(0.0, 0.0)));
        assert_eq!(circle.radius(), 0.0);

        assert!(circle.radius_update(lonlat!(0.0, 1.0)));
        assert_relative_eq!(circle.radius(), 111.195, epsilon = 0.001);

        assert!(circle.finish());
        assert_eq!(circle.state(), CircleState::Done);
        assert!(!circle.radius_update(lonlat!(0.0, 2.0)));
        assert_relative_eq!(circle.radius(), 111.195, epsilon = 0.001);
    }

    #[test]
    fn radius_label_is_in_meters() {
        let center = lonlat!(10.0, 10.0);
        let edge = destination(&center, 5.0, 90.0, Units::Kilometers).expect("valid distance");

        let mut circle = CircleShape::new(ShapeId(0), Units::Kilometers, 64);
        circle.start(center);
        circle.radius_update(edge);

        assert_relative_eq!(circle.radius(), 5.0, epsilon = 1e-3);
        assert_eq!(labels(&circle)[0], "5000 m");
    }

    #[test]
    fn ring_is_closed() {
        let mut circle = CircleShape::new(ShapeId(0), Units::Kilometers, 16);
        assert!(circle.ring().expect("no center").is_empty());

        circle.start(lonlat!(0.0, 0.0));
        circle.radius_update(lonlat!(0.0, 0.1));

        let ring = circle.ring().expect("valid circle");
        assert_eq!(ring.len(), 17);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn area_is_close_to_flat_circle() {
        let mut circle = CircleShape::new(ShapeId(0), Units::Meters, 128);
        circle.start(lonlat!(0.0, 0.0));
        circle.radius_update(lonlat!(0.0, 0.01));

        let radius = circle.radius();
        assert_relative_eq!(circle.area(), PI * radius * radius, max_relative = 0.01);
    }

    #[test]
    fn nothing_is_rendered_without_center() {
        let circle = CircleShape::new(ShapeId(0), Units::Kilometers, 64);
        assert!(labels(&circle).is_empty());
        assert_eq!(circle.measurement(), None);
        assert!(circle.vertices().is_empty());
    }
}
