//! Drives all three measurement controls against an in-memory map and prints the results.
//!
//! Run with `RUST_LOG=debug` to see what the controls do with the map.

use mapruler::control::{
    dispatch, AreaControl, CircleControl, EventPropagation, MapEventHandler, RulerControl,
};
use mapruler::engine::{MapEngine, MapEvent, MemoryMap};
use mapruler::mapruler_types::format::format_area;
use mapruler::mapruler_types::geodesy::destination;
use mapruler::mapruler_types::{lonlat, Units};
use mapruler::shape::{Measurement, Shape};

fn main() {
    env_logger::init();

    let mut map = MemoryMap::new();
    let mut ruler = RulerControl::default();
    let mut circle = CircleControl::default();
    let mut area = AreaControl::default();

    // Pans the map if no control took the event.
    let mut pan = |event: &MapEvent, _: &mut dyn MapEngine| {
        log::info!("Map handles {event:?}");
        EventPropagation::Stop
    };

    ruler.measuring_on(&mut map);
    for point in [lonlat!(0.0, 0.0), lonlat!(0.0, 0.00899), lonlat!(0.01, 0.01)] {
        dispatch(
            &MapEvent::Click(point),
            &mut map,
            &mut [
                &mut ruler as &mut dyn MapEventHandler,
                &mut pan as &mut dyn MapEventHandler,
            ],
        );
    }
    print_measurements("ruler", &ruler.measurements());
    ruler.measuring_off(&mut map);

    circle.measuring_on(&mut map);
    let center = lonlat!(10.0, 10.0);
    match destination(&center, 5.0, 90.0, Units::Kilometers) {
        Ok(edge) => {
            for event in [
                MapEvent::MouseDown(center),
                MapEvent::MouseMove(edge),
                MapEvent::MouseUp(edge),
            ] {
                circle.handle(&event, &mut map);
            }
        }
        Err(err) => log::error!("Cannot compute circle edge: {err}"),
    }
    print_measurements("circle", &circle.measurements());
    circle.measuring_off(&mut map);

    area.measuring_on(&mut map);
    for point in [lonlat!(0.0, 0.0), lonlat!(0.00899, 0.0), lonlat!(0.0, 0.00899)] {
        area.handle(&MapEvent::Click(point), &mut map);
    }

    // The user replaces the map style in the middle of measuring.
    map.reload_style();
    area.handle(&MapEvent::StyleLoad, &mut map);
    println!("sources after style change: {:?}", map.source_ids());

    let first_marker = area
        .shapes()
        .next()
        .and_then(|shape| shape.vertices().first().and_then(|v| v.marker()));
    if let Some(marker) = first_marker {
        area.handle(&MapEvent::MarkerClick(marker), &mut map);
    }
    print_measurements("area", &area.measurements());
    area.measuring_off(&mut map);

    println!("fired events: {:?}", map.fired_events());
}

fn print_measurements(name: &str, measurements: &[Measurement]) {
    for measurement in measurements {
        match measurement {
            Measurement::Line { length, units } => {
                println!("{name}: length {length:.3} {units}");
            }
            Measurement::Circle {
                radius,
                area,
                units,
            } => {
                println!("{name}: radius {radius:.3} {units}, area {}", format_area(*area));
            }
            Measurement::Polygon {
                area,
                perimeter,
                units,
                is_closed,
            } => {
                println!(
                    "{name}: area {}, perimeter {perimeter:.3} {units}, closed: {is_closed}",
                    format_area(*area)
                );
            }
        }
    }
}
