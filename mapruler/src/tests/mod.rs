use approx::assert_relative_eq;
use assert_matches::assert_matches;
use geojson::{Feature, GeoJson, Value};
use mapruler_types::geodesy::destination;
use mapruler_types::{lonlat, GeoPoint2d, Units};

use crate::control::{AreaControl, CircleControl, EventPropagation, MapEventHandler, RulerControl};
use crate::engine::{ControlEvent, Cursor, MapEvent, MemoryMap};
use crate::shape::{CircleState, Measurement, Shape, ShapeState};

fn features(map: &MemoryMap, source_id: &str) -> Vec<Feature> {
    match map.source(source_id) {
        Some(GeoJson::FeatureCollection(collection)) => collection.features.clone(),
        other => panic!("source {source_id} is not a feature collection: {other:?}"),
    }
}

fn geometries(map: &MemoryMap, source_id: &str) -> Vec<Value> {
    features(map, source_id)
        .into_iter()
        .filter_map(|f| f.geometry.map(|g| g.value))
        .collect()
}

fn labels(map: &MemoryMap, source_id: &str) -> Vec<(String, Value)> {
    features(map, source_id)
        .into_iter()
        .filter_map(|f| {
            let label = f.property("label")?.as_str()?.to_string();
            Some((label, f.geometry?.value))
        })
        .collect()
}

fn click(control: &mut impl MapEventHandler, map: &mut MemoryMap, point: GeoPoint2d) {
    control.handle(&MapEvent::Click(point), map);
}

#[test]
fn ruler_measures_one_kilometer() {
    let mut map = MemoryMap::new();
    let mut ruler = RulerControl::default();

    ruler.measuring_on(&mut map);
    click(&mut ruler, &mut map, lonlat!(0.0, 0.0));
    click(&mut ruler, &mut map, lonlat!(0.0, 0.00899));

    assert_eq!(
        geometries(&map, "controls-source-ruler-0-line"),
        vec![Value::LineString(vec![vec![0.0, 0.0], vec![0.0, 0.00899]])]
    );

    let labels = labels(&map, "controls-source-ruler-0-labels");
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].0, "0 m");
    assert_eq!(labels[1].0, "1.00 km");
    assert_eq!(labels[1].1, Value::Point(vec![0.0, 0.00899]));

    assert_matches!(
        ruler.measurements().as_slice(),
        [Measurement::Line { length, units: Units::Kilometers }] if (length - 1.0).abs() < 0.001
    );
}

#[test]
fn circle_shows_radius_in_meters() {
    let mut map = MemoryMap::new();
    let mut circle = CircleControl::default();
    let center = lonlat!(10.0, 10.0);
    let edge = destination(&center, 5.0, 90.0, Units::Kilometers).expect("valid distance");

    circle.measuring_on(&mut map);
    assert_eq!(
        circle.handle(&MapEvent::MouseDown(center), &mut map),
        EventPropagation::Consume
    );
    assert_eq!(
        circle.handle(&MapEvent::MouseMove(edge), &mut map),
        EventPropagation::Stop
    );

    let shape = circle.shapes().next().expect("circle is started");
    assert_eq!(shape.state(), CircleState::Dragging);
    assert_relative_eq!(shape.radius(), 5.0, epsilon = 1e-3);

    let Some(Value::Polygon(rings)) = geometries(&map, "controls-source-circle-0-polygon").pop()
    else {
        panic!("circle polygon is not rendered");
    };
    let top = rings[0]
        .iter()
        .map(|p| p[1])
        .fold(f64::NEG_INFINITY, f64::max);

    let labels = labels(&map, "controls-source-circle-0-labels");
    let (radius_label, position) = &labels[0];
    assert_eq!(radius_label, "5000 m");
    assert_matches!(position, Value::Point(p) if p[1] == top);
    assert!(!labels[1].0.is_empty());
}

#[test]
fn finished_circle_is_not_edited() {
    let mut map = MemoryMap::new();
    let mut circle = CircleControl::default();
    circle.measuring_on(&mut map);

    circle.handle(&MapEvent::MouseDown(lonlat!(0.0, 0.0)), &mut map);
    circle.handle(&MapEvent::MouseUp(lonlat!(0.0, 0.01)), &mut map);
    let radius = circle.shapes().next().expect("circle exists").radius();

    assert_eq!(
        circle.handle(&MapEvent::MouseMove(lonlat!(0.0, 0.05)), &mut map),
        EventPropagation::Propagate
    );

    let shape = circle.shapes().next().expect("circle exists");
    assert_eq!(shape.state(), CircleState::Done);
    assert_eq!(shape.radius(), radius);
    assert_eq!(map.marker_count(), 0);

    circle.handle(&MapEvent::MouseDown(lonlat!(1.0, 1.0)), &mut map);
    assert_eq!(circle.shapes().count(), 2);
}

#[test]
fn area_is_closed_with_first_marker() {
    let mut map = MemoryMap::new();
    let mut area = AreaControl::default();

    area.measuring_on(&mut map);
    click(&mut area, &mut map, lonlat!(0.0, 0.0));
    click(&mut area, &mut map, lonlat!(0.00899, 0.0));
    click(&mut area, &mut map, lonlat!(0.0, 0.00899));

    let first_marker = area
        .shapes()
        .next()
        .and_then(|shape| shape.vertices()[0].marker())
        .expect("vertex has a marker");
    assert_eq!(
        area.handle(&MapEvent::MarkerClick(first_marker), &mut map),
        EventPropagation::Stop
    );

    let shape = area.shapes().next().expect("area exists");
    assert_eq!(shape.state(), ShapeState::Closed);
    assert_eq!(shape.vertices().len(), 3);
    assert_relative_eq!(shape.area(), 500_000.0, max_relative = 0.01);

    let centroid = labels(&map, "controls-source-area-0-centroid");
    assert_eq!(centroid.len(), 1);
    assert!(centroid[0].0.starts_with("50 ha"), "{}", centroid[0].0);

    let Some(Value::Polygon(rings)) = geometries(&map, "controls-source-area-0-polygon").pop()
    else {
        panic!("area polygon is not rendered");
    };
    assert_eq!(rings[0].len(), 4);
    assert_eq!(rings[0].first(), rings[0].last());

    click(&mut area, &mut map, lonlat!(1.0, 1.0));
    assert_eq!(area.shapes().count(), 2);
}

#[test]
fn middle_marker_does_not_close_area() {
    let mut map = MemoryMap::new();
    let mut area = AreaControl::default();

    area.measuring_on(&mut map);
    let square = [
        lonlat!(0.0, 0.0),
        lonlat!(0.01, 0.0),
        lonlat!(0.01, 0.01),
        lonlat!(0.0, 0.01),
    ];
    for point in square {
        click(&mut area, &mut map, point);
    }

    let middle = area
        .shapes()
        .next()
        .and_then(|shape| shape.vertices()[1].marker())
        .expect("vertex has a marker");
    area.handle(&MapEvent::MarkerClick(middle), &mut map);
    assert_eq!(
        area.shapes().next().map(|s| s.state()),
        Some(ShapeState::Open)
    );

    let last = area
        .shapes()
        .next()
        .and_then(|shape| shape.vertices()[3].marker())
        .expect("vertex has a marker");
    area.handle(&MapEvent::MarkerClick(last), &mut map);
    assert_eq!(
        area.shapes().next().map(|s| s.state()),
        Some(ShapeState::Closed)
    );
}

#[test]
fn dragging_closed_area_updates_labels() {
    let mut map = MemoryMap::new();
    let mut area = AreaControl::default();

    area.measuring_on(&mut map);
    click(&mut area, &mut map, lonlat!(0.0, 0.0));
    click(&mut area, &mut map, lonlat!(0.01, 0.0));
    click(&mut area, &mut map, lonlat!(0.0, 0.01));
    let markers: Vec<_> = area
        .shapes()
        .next()
        .map(|shape| shape.vertices().iter().filter_map(|v| v.marker()).collect())
        .unwrap_or_default();
    area.handle(&MapEvent::MarkerClick(markers[0]), &mut map);
    let before = labels(&map, "controls-source-area-0-centroid");

    let moved = map
        .drag_marker(markers[2], lonlat!(0.0, 0.02))
        .expect("marker is draggable");
    area.handle(&MapEvent::MarkerDrag(markers[2], moved), &mut map);

    let shape = area.shapes().next().expect("area exists");
    assert_eq!(shape.vertices()[2].point(), lonlat!(0.0, 0.02));
    assert_eq!(shape.state(), ShapeState::Closed);
    assert_ne!(labels(&map, "controls-source-area-0-centroid"), before);
}

#[test]
fn preview_follows_pointer() {
    let mut map = MemoryMap::new();
    let mut area = AreaControl::default();

    area.measuring_on(&mut map);
    click(&mut area, &mut map, lonlat!(0.0, 0.0));
    assert_eq!(
        area.handle(&MapEvent::MouseMove(lonlat!(0.01, 0.0)), &mut map),
        EventPropagation::Propagate
    );

    assert_eq!(
        geometries(&map, "controls-source-area-0-polygon"),
        vec![Value::LineString(vec![vec![0.0, 0.0], vec![0.01, 0.0]])]
    );
    assert_eq!(area.shapes().next().map(|s| s.vertices().len()), Some(1));
}

#[test]
fn style_reload_restores_current_data() {
    let mut map = MemoryMap::new();
    let mut area = AreaControl::default();

    area.measuring_on(&mut map);
    click(&mut area, &mut map, lonlat!(0.0, 0.0));
    click(&mut area, &mut map, lonlat!(0.01, 0.0));

    let source_ids: Vec<String> = map.source_ids().iter().map(|id| id.to_string()).collect();
    let layer_ids: Vec<String> = map.layers().iter().map(|l| l.id.clone()).collect();
    let polygon = map.source("controls-source-area-0-polygon").cloned();

    map.reload_style();
    assert!(map.source_ids().is_empty());

    area.handle(&MapEvent::StyleLoad, &mut map);
    area.handle(&MapEvent::StyleData, &mut map);

    assert_eq!(map.source_ids(), source_ids);
    assert_eq!(
        map.layers().iter().map(|l| l.id.clone()).collect::<Vec<_>>(),
        layer_ids
    );
    assert_eq!(map.source("controls-source-area-0-polygon").cloned(), polygon);
    assert_eq!(
        geometries(&map, "controls-source-area-0-polygon"),
        vec![Value::LineString(vec![vec![0.0, 0.0], vec![0.01, 0.0]])]
    );

    click(&mut area, &mut map, lonlat!(0.0, 0.01));
    assert_matches!(
        geometries(&map, "controls-source-area-0-polygon").as_slice(),
        [Value::Polygon(_)]
    );
}

#[test]
fn measuring_off_twice_is_same_as_once() {
    let mut map = MemoryMap::new();
    let mut ruler = RulerControl::default();

    ruler.measuring_on(&mut map);
    click(&mut ruler, &mut map, lonlat!(0.0, 0.0));
    click(&mut ruler, &mut map, lonlat!(1.0, 0.0));

    ruler.measuring_off(&mut map);
    ruler.measuring_off(&mut map);

    assert_eq!(
        map.fired_events(),
        &[ControlEvent::RulerOn, ControlEvent::RulerOff]
    );
    assert!(map.source_ids().is_empty());
    assert!(map.layers().is_empty());
    assert_eq!(map.marker_count(), 0);
    assert!(map.subscriptions("ruler").is_empty());
    assert_eq!(map.cursor(), Cursor::Default);
    assert_eq!(ruler.shapes().count(), 0);
}

#[test]
fn measuring_again_starts_from_scratch() {
    let mut map = MemoryMap::new();
    let mut ruler = RulerControl::default();

    ruler.measuring_on(&mut map);
    click(&mut ruler, &mut map, lonlat!(0.0, 0.0));
    ruler.measuring_off(&mut map);
    ruler.measuring_on(&mut map);

    assert_eq!(ruler.shapes().count(), 1);
    assert!(ruler.measurements().is_empty());
}

#[test]
fn controls_share_map() {
    let mut map = MemoryMap::new();
    let mut ruler = RulerControl::default();
    let mut area = AreaControl::default();

    ruler.measuring_on(&mut map);
    area.measuring_on(&mut map);
    click(&mut ruler, &mut map, lonlat!(0.0, 0.0));
    click(&mut area, &mut map, lonlat!(0.0, 0.0));

    ruler.measuring_off(&mut map);

    assert!(map.subscriptions("ruler").is_empty());
    assert!(!map.subscriptions("area").is_empty());
    assert!(map
        .source_ids()
        .iter()
        .all(|id| id.starts_with("controls-source-area-")));
    assert_eq!(map.marker_count(), 1);
}
