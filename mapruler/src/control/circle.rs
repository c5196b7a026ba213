use crate::config::MeasureConfig;
use crate::control::{EventPropagation, MeasureTool, Overlay};
use crate::engine::{ControlEvent, MapEngine, MapEvent, MapEventKind};
use crate::shape::{CircleShape, CircleState};

/// Tool drawing circles with a press-drag-release gesture.
///
/// An empty circle is started when measuring is turned on. Every gesture after the first one
/// draws a new circle. A circle that was released without moving the pointer is removed when
/// the next gesture starts.
#[derive(Debug, Default)]
pub struct CircleTool;

impl CircleTool {
    fn current_state(overlay: &Overlay<CircleShape>) -> Option<CircleState> {
        overlay.current().map(|circle| circle.state())
    }

    fn is_dragging(overlay: &Overlay<CircleShape>) -> bool {
        Self::current_state(overlay) == Some(CircleState::Dragging)
    }

    fn new_circle(
        overlay: &mut Overlay<CircleShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) {
        let (units, steps) = (config.units(), config.circle_steps());
        overlay.start(map, |id| CircleShape::new(id, units, steps));
    }
}

impl MeasureTool for CircleTool {
    type Shape = CircleShape;

    const TITLE: &'static str = "Measure radius";
    const ON: ControlEvent = ControlEvent::CircleOn;
    const OFF: ControlEvent = ControlEvent::CircleOff;
    const POINTER_EVENTS: &'static [MapEventKind] = &[
        MapEventKind::MouseDown,
        MapEventKind::MouseMove,
        MapEventKind::MouseUp,
    ];

    fn on_start(
        &mut self,
        overlay: &mut Overlay<CircleShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) {
        Self::new_circle(overlay, map, config);
    }

    fn handle(
        &mut self,
        event: &MapEvent,
        overlay: &mut Overlay<CircleShape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) -> EventPropagation {
        match event {
            MapEvent::MouseDown(point) => {
                // A gesture whose mouse up was lost ends here.
                if Self::is_dragging(overlay) {
                    overlay.update_current(map, CircleShape::finish);
                }

                let is_point = overlay.current().is_some_and(|circle| {
                    circle.state() == CircleState::Done && circle.radius() == 0.0
                });
                if is_point {
                    overlay.discard_current(map);
                }

                if Self::current_state(overlay) != Some(CircleState::Empty) {
                    Self::new_circle(overlay, map, config);
                }

                overlay.update_current(map, |circle| circle.start(*point));

                EventPropagation::Consume
            }
            MapEvent::MouseMove(point) if Self::is_dragging(overlay) => {
                overlay.update_current(map, |circle| circle.radius_update(*point));
                EventPropagation::Stop
            }
            MapEvent::MouseUp(point) if Self::is_dragging(overlay) => {
                overlay.update_current(map, |circle| {
                    circle.radius_update(*point);
                    circle.finish()
                });
                log::debug!("Circle {} is finished", overlay.len() - 1);

                EventPropagation::Stop
            }
            _ => EventPropagation::Propagate,
        }
    }
}
