//! Measurement controls and their interaction with the map.
//!
//! A control is turned on and off by the user with its button. While it is on (measuring), the
//! control subscribes to the pointer events it needs and turns them into changes of its shapes:
//! 1. The host map engine delivers a [`MapEvent`] to [`MapEventHandler::handle`] of every
//!    control, in order, until one of them stops the propagation (see [`dispatch`]).
//! 2. The control gives the event to its [`MeasureTool`], which changes the shapes of the
//!    [`Overlay`].
//! 3. The overlay sends the new data of the changed shapes to the map.

use std::fmt::Debug;

use crate::config::MeasureConfig;
use crate::engine::{ControlEvent, Cursor, MapEngine, MapEvent, MapEventKind};
use crate::shape::{Measurement, Shape};

mod area;
mod circle;
mod overlay;
mod ruler;

pub use area::AreaTool;
pub use circle::CircleTool;
pub use overlay::Overlay;
pub use ruler::RulerTool;

/// Control measuring distances along polylines.
pub type RulerControl = MeasurementControl<RulerTool>;
/// Control measuring radius and area of circles.
pub type CircleControl = MeasurementControl<CircleTool>;
/// Control measuring area of polygons.
pub type AreaControl = MeasurementControl<AreaTool>;

/// Style events every measuring control listens to in order to restore its layers.
const STYLE_EVENTS: [MapEventKind; 2] = [MapEventKind::StyleLoad, MapEventKind::StyleData];

/// Value returned by a [`MapEventHandler`] to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event should not be propagated to the next handler, and the current handler takes
    /// ownership of the gesture the event starts. A circle being drawn consumes the mouse down
    /// event so that the map is not panned while the pointer is dragged.
    Consume,
}

/// Handler of the events delivered by the map engine.
pub trait MapEventHandler {
    /// Handle the event.
    fn handle(&mut self, event: &MapEvent, map: &mut dyn MapEngine) -> EventPropagation;
}

impl<T: FnMut(&MapEvent, &mut dyn MapEngine) -> EventPropagation> MapEventHandler for T {
    fn handle(&mut self, event: &MapEvent, map: &mut dyn MapEngine) -> EventPropagation {
        self(event, map)
    }
}

/// Delivers the event to the handlers in order until one of them does not propagate it
/// further. Returns the status given by the last called handler.
pub fn dispatch(
    event: &MapEvent,
    map: &mut dyn MapEngine,
    handlers: &mut [&mut dyn MapEventHandler],
) -> EventPropagation {
    for handler in handlers.iter_mut() {
        match handler.handle(event, map) {
            EventPropagation::Propagate => {}
            status => return status,
        }
    }

    EventPropagation::Propagate
}

/// Description of the button that turns a control on and off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    /// CSS class of the button.
    pub class_name: String,
    /// Tooltip of the button.
    pub title: &'static str,
    /// Whether the control is currently on.
    pub is_active: bool,
}

/// A control that can be added to a map.
pub trait Control {
    /// Called when the control is added to the map. Returns the button to show for the
    /// control.
    fn on_add(&mut self, map: &mut dyn MapEngine) -> ControlButton;
    /// Called when the control is removed from the map. Everything the control added to the
    /// map must be removed.
    fn on_remove(&mut self, map: &mut dyn MapEngine);
}

/// Interaction logic of one measuring tool.
///
/// The tool turns the pointer events into changes of the shapes. Everything else (turning
/// measuring on and off, subscriptions, restoring layers after a style change) is done by
/// [`MeasurementControl`].
pub trait MeasureTool: Default + Debug {
    /// Shape the tool draws.
    type Shape: Shape;

    /// Tooltip of the control button.
    const TITLE: &'static str;
    /// Event fired when measuring is turned on.
    const ON: ControlEvent;
    /// Event fired when measuring is turned off.
    const OFF: ControlEvent;
    /// Pointer events the tool needs while measuring.
    const POINTER_EVENTS: &'static [MapEventKind];

    /// Called when measuring is turned on, after the old shapes are removed. Starts the first
    /// empty shape.
    fn on_start(
        &mut self,
        overlay: &mut Overlay<Self::Shape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    );

    /// Handles a pointer event while measuring.
    fn handle(
        &mut self,
        event: &MapEvent,
        overlay: &mut Overlay<Self::Shape>,
        map: &mut dyn MapEngine,
        config: &MeasureConfig,
    ) -> EventPropagation;
}

/// Measurement control, generic over the measuring tool.
///
/// The control is either idle or measuring. While measuring, it owns a list of shapes drawn
/// by the user. Turning measuring off removes all of them from the map.
#[derive(Debug)]
pub struct MeasurementControl<T: MeasureTool> {
    tool: T,
    config: MeasureConfig,
    overlay: Overlay<T::Shape>,
    is_measuring: bool,
}

impl<T: MeasureTool> Default for MeasurementControl<T> {
    fn default() -> Self {
        Self::new(MeasureConfig::default())
    }
}

impl<T: MeasureTool> MeasurementControl<T> {
    /// Creates a new idle control.
    pub fn new(config: MeasureConfig) -> Self {
        Self {
            tool: T::default(),
            overlay: Overlay::new(config.style().clone()),
            config,
            is_measuring: false,
        }
    }

    /// Name of the control. Used as the listener name when subscribing to map events and in
    /// the ids of the sources and layers.
    pub fn name(&self) -> &'static str {
        <T::Shape as Shape>::KIND.name()
    }

    /// Configuration of the control.
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Whether the control is measuring.
    pub fn is_measuring(&self) -> bool {
        self.is_measuring
    }

    /// Shapes drawn since measuring was turned on, oldest first.
    pub fn shapes(&self) -> impl Iterator<Item = &T::Shape> + '_ {
        self.overlay.shapes()
    }

    /// Measurements of all shapes that have anything to measure.
    pub fn measurements(&self) -> Vec<Measurement> {
        self.shapes().filter_map(|shape| shape.measurement()).collect()
    }

    /// Turns measuring on. Does nothing if the control is already measuring.
    pub fn measuring_on(&mut self, map: &mut dyn MapEngine) {
        if self.is_measuring {
            return;
        }

        self.overlay.clear(map);
        map.set_cursor(Cursor::Crosshair);
        for kind in Self::event_kinds() {
            map.subscribe(self.name(), kind);
        }

        self.is_measuring = true;
        map.fire(T::ON);
        self.tool.on_start(&mut self.overlay, map, &self.config);

        log::debug!("Measuring with {} is turned on", self.name());
    }

    /// Turns measuring off and removes all shapes from the map. Does nothing if the control is
    /// not measuring.
    pub fn measuring_off(&mut self, map: &mut dyn MapEngine) {
        if !self.is_measuring {
            return;
        }

        for kind in Self::event_kinds() {
            map.unsubscribe(self.name(), kind);
        }

        self.overlay.clear(map);
        self.tool = T::default();
        map.set_cursor(Cursor::Default);
        self.is_measuring = false;
        map.fire(T::OFF);

        log::debug!("Measuring with {} is turned off", self.name());
    }

    /// Turns measuring on if it is off and off if it is on.
    pub fn toggle(&mut self, map: &mut dyn MapEngine) {
        if self.is_measuring {
            self.measuring_off(map);
        } else {
            self.measuring_on(map);
        }
    }

    /// Description of the control button in the current state.
    pub fn button(&self) -> ControlButton {
        ControlButton {
            class_name: format!("mapruler-ctrl-{}", self.name()),
            title: T::TITLE,
            is_active: self.is_measuring,
        }
    }

    fn event_kinds() -> impl Iterator<Item = MapEventKind> {
        T::POINTER_EVENTS.iter().copied().chain(STYLE_EVENTS)
    }
}

impl<T: MeasureTool> MapEventHandler for MeasurementControl<T> {
    fn handle(&mut self, event: &MapEvent, map: &mut dyn MapEngine) -> EventPropagation {
        if !self.is_measuring || !Self::event_kinds().any(|kind| kind == event.kind()) {
            return EventPropagation::Propagate;
        }

        match event {
            MapEvent::StyleLoad | MapEvent::StyleData => {
                if self.overlay.ensure_mounted(map) {
                    log::debug!("Layers of {} are restored after style change", self.name());
                }

                EventPropagation::Propagate
            }
            _ => self.tool.handle(event, &mut self.overlay, map, &self.config),
        }
    }
}

impl<T: MeasureTool> Control for MeasurementControl<T> {
    fn on_add(&mut self, _map: &mut dyn MapEngine) -> ControlButton {
        self.button()
    }

    fn on_remove(&mut self, map: &mut dyn MapEngine) {
        self.measuring_off(map);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mapruler_types::lonlat;

    use super::*;
    use crate::engine::MemoryMap;
    use crate::shape::CircleState;

    #[test]
    fn measuring_on_and_off() {
        let mut map = MemoryMap::new();
        let mut control = RulerControl::default();
        assert!(!control.button().is_active);

        control.measuring_on(&mut map);
        assert!(control.is_measuring());
        assert_eq!(map.cursor(), Cursor::Crosshair);
        assert!(map.is_subscribed("ruler", MapEventKind::Click));
        assert!(map.is_subscribed("ruler", MapEventKind::StyleLoad));
        assert!(control.button().is_active);

        control.measuring_off(&mut map);
        assert!(!control.is_measuring());
        assert_eq!(map.cursor(), Cursor::Default);
        assert!(map.subscriptions("ruler").is_empty());
        assert_eq!(
            map.fired_events(),
            &[ControlEvent::RulerOn, ControlEvent::RulerOff]
        );
    }

    #[test]
    fn toggle_switches_state() {
        let mut map = MemoryMap::new();
        let mut control = AreaControl::default();

        control.toggle(&mut map);
        assert!(control.is_measuring());
        control.toggle(&mut map);
        assert!(!control.is_measuring());

        assert_eq!(
            map.fired_events(),
            &[ControlEvent::AreaOn, ControlEvent::AreaOff]
        );
    }

    #[test]
    fn idle_control_ignores_events() {
        let mut map = MemoryMap::new();
        let mut control = RulerControl::default();

        assert_eq!(
            control.handle(&MapEvent::Click(lonlat!(0.0, 0.0)), &mut map),
            EventPropagation::Propagate
        );
        assert_eq!(control.shapes().count(), 0);
    }

    #[test]
    fn events_outside_subscriptions_are_ignored() {
        let mut map = MemoryMap::new();
        let mut control = CircleControl::default();
        control.measuring_on(&mut map);

        assert_eq!(
            control.handle(&MapEvent::Click(lonlat!(0.0, 0.0)), &mut map),
            EventPropagation::Propagate
        );
        assert_eq!(
            control.shapes().map(|c| c.state()).collect::<Vec<_>>(),
            vec![CircleState::Empty]
        );
    }

    #[test]
    fn dispatch_stops_at_first_handler() {
        let mut map = MemoryMap::new();
        let mut ruler = RulerControl::default();
        ruler.measuring_on(&mut map);

        let mut called = false;
        let mut fallback = |_: &MapEvent, _: &mut dyn MapEngine| {
            called = true;
            EventPropagation::Propagate
        };

        let status = dispatch(
            &MapEvent::Click(lonlat!(0.0, 0.0)),
            &mut map,
            &mut [
                &mut ruler as &mut dyn MapEventHandler,
                &mut fallback as &mut dyn MapEventHandler,
            ],
        );

        assert_matches!(status, EventPropagation::Stop);
        assert!(!called);
        assert_eq!(ruler.measurements().len(), 1);
    }

    #[test]
    fn on_remove_turns_measuring_off() {
        let mut map = MemoryMap::new();
        let mut control = CircleControl::default();
        let button = control.on_add(&mut map);
        assert_eq!(button.class_name, "mapruler-ctrl-circle");

        control.measuring_on(&mut map);
        control.on_remove(&mut map);

        assert!(!control.is_measuring());
        assert_eq!(map.fired_events().last(), Some(&ControlEvent::CircleOff));
    }
}
