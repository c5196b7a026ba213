use crate::config::MeasureConfig;
use crate::control::{EventPropagation, MeasureTool, Overlay};
use crate::engine::{ControlEvent, MapEngine, MapEvent, MapEventKind};
use crate::shape::{AreaShape, Shape, ShapeState};

/// Tool drawing polygons.
///
/// An empty polygon is started when measuring is turned on. Clicks add vertices to the current
/// polygon, and the pointer position is previewed as the next vertex. Clicking the marker of the first or the last vertex closes the polygon. The
/// next click on the map starts a new one.
#[derive(Debug, Default)]
pub struct AreaTool;

impl MeasureTool for AreaTool {
    type Shape = AreaShape;

    const TITLE: &'static str = "Measure area";
    const ON: ControlEvent = ControlEvent::AreaOn;
    const OFF: ControlEvent = ControlEvent::AreaOff;
    const POINTER_EVENTS: &'static [MapEventKind] = &[
        MapEventKind::Click,
        MapEventKind::MouseMove,
        MapEventKind::MarkerClick,
        MapEventKind::MarkerDrag,
    ];

    fn on_start(
        &mut self,
        overlay: &mut Overlay<AreaShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) {
        overlay.start(map, |id| AreaShape::new(id, config.units()));
    }

    fn handle(
        &mut self,
        event: &MapEvent,
        overlay: &mut Overlay<AreaShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) -> EventPropagation {
        match event {
            MapEvent::Click(point) => {
                let needs_new = overlay
                    .current()
                    .map_or(true, |shape| shape.state() == ShapeState::Closed);
                if needs_new {
                    overlay.start(map, |id| AreaShape::new(id, config.units()));
                }

                overlay.update_current(map, |shape| shape.append_vertex(*point));
                EventPropagation::Stop
            }
            MapEvent::MouseMove(point) => {
                let is_open = overlay
                    .current()
                    .is_some_and(|shape| shape.state() == ShapeState::Open);
                if is_open {
                    overlay.update_current(map, |shape| shape.preview_vertex(*point));
                }

                EventPropagation::Propagate
            }
            MapEvent::MarkerClick(marker) => {
                let Some((index, vertex)) = overlay.locate_marker(*marker) else {
                    return EventPropagation::Propagate;
                };

                let is_closing_handle = overlay
                    .shapes()
                    .nth(index)
                    .and_then(|shape| shape.vertices().get(vertex))
                    .is_some_and(|v| v.is_closing_handle());
                if is_closing_handle && overlay.update(index, map, AreaShape::close) == Some(true) {
                    log::debug!("Area {index} is closed");
                }

                EventPropagation::Stop
            }
            MapEvent::MarkerDrag(marker, point) => {
                if overlay.drag_vertex(map, *marker, *point) {
                    EventPropagation::Stop
                } else {
                    EventPropagation::Propagate
                }
            }
            _ => EventPropagation::Propagate,
        }
    }
}
