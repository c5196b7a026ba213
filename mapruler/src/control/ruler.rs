use crate::config::MeasureConfig;
use crate::control::{EventPropagation, MeasureTool, Overlay};
use crate::engine::{ControlEvent, MapEngine, MapEvent, MapEventKind};
use crate::shape::RulerShape;

/// Tool drawing polylines. Every click adds a vertex to the current line.
#[derive(Debug, Default)]
pub struct RulerTool;

impl MeasureTool for RulerTool {
    type Shape = RulerShape;

    const TITLE: &'static str = "Measure distance";
    const ON: ControlEvent = ControlEvent::RulerOn;
    const OFF: ControlEvent = ControlEvent::RulerOff;
    const POINTER_EVENTS: &'static [MapEventKind] = &[
        MapEventKind::Click,
        MapEventKind::MarkerClick,
        MapEventKind::MarkerDrag,
    ];

    fn on_start(
        &mut self,
        overlay: &mut Overlay<RulerShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) {
        overlay.start(map, |id| RulerShape::new(id, config.units()));
    }

    fn handle(
        &mut self,
        event: &MapEvent,
        overlay: &mut Overlay<RulerShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) -> EventPropagation {
        match event {
            MapEvent::Click(point) => {
                if overlay.current().is_none() {
                    overlay.start(map, |id| RulerShape::new(id, config.units()));
                }

                overlay.update_current(map, |ruler| ruler.append_vertex(*point));
                EventPropagation::Stop
            }
            MapEvent::MarkerDrag(marker, point) => {
                if overlay.drag_vertex(map, *marker, *point) {
                    EventPropagation::Stop
                } else {
                    EventPropagation::Propagate
                }
            }
            // A click on a vertex marker must not add a vertex.
            MapEvent::MarkerClick(marker) if overlay.locate_marker(*marker).is_some() => {
                EventPropagation::Stop
            }
            _ => EventPropagation::Propagate,
        }
    }
}
