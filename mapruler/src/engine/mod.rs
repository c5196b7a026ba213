//! Interface of the host map engine.
//!
//! Measurement controls do not draw anything themselves. They describe what to draw as GeoJSON
//! sources and style layers and hand them to a [`MapEngine`], the same way a web map is
//! styled. The engine in turn delivers user input and style lifecycle notifications to the
//! controls as [`MapEvent`]s.
//!
//! [`MemoryMap`] is a headless engine that records everything it is asked to do. It is used to
//! run the controls without a real map and to inspect what they draw.

use std::fmt::{Display, Formatter};

use geojson::GeoJson;
use mapruler_types::GeoPoint2d;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

mod memory;

pub use memory::MemoryMap;

/// Handle of a marker created by [`MapEngine::add_marker`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Type of a style layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Filled polygons.
    Fill,
    /// Lines and polygon outlines.
    Line,
    /// Text labels and icons.
    Symbol,
}

/// Style layer drawing the data of one GeoJSON source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Unique id of the layer in the map style.
    pub id: String,
    /// Layer type.
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Id of the source the layer draws.
    pub source: String,
    /// Paint properties of the layer.
    pub paint: serde_json::Value,
    /// Layout properties of the layer.
    pub layout: serde_json::Value,
}

/// Mouse cursor shown over the map canvas.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// Whatever the engine shows normally.
    #[default]
    Default,
    /// Crosshair cursor, shown while measuring.
    Crosshair,
}

/// Parameters of a new marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerOptions {
    /// Initial position of the marker.
    pub position: GeoPoint2d,
    /// Whether the user can drag the marker around.
    pub draggable: bool,
}

/// Event delivered by the map engine to the controls.
///
/// Pointer events carry the geographic position of the pointer. A click on a marker is
/// reported as [`MapEvent::MarkerClick`] only, not as a map click.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map canvas was clicked.
    Click(GeoPoint2d),
    /// Mouse button was pressed over the map canvas.
    MouseDown(GeoPoint2d),
    /// Pointer moved over the map canvas.
    MouseMove(GeoPoint2d),
    /// Mouse button was released over the map canvas.
    MouseUp(GeoPoint2d),
    /// A marker was clicked.
    MarkerClick(MarkerId),
    /// A marker was dragged to the given position. Fired on every animation frame of the drag.
    MarkerDrag(MarkerId, GeoPoint2d),
    /// A new style has fully replaced the old one. All sources and layers of the old style are
    /// gone at this point.
    StyleLoad,
    /// Style data was loaded or changed.
    StyleData,
}

impl MapEvent {
    /// Kind of the event, used to subscribe to it.
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::Click(_) => MapEventKind::Click,
            MapEvent::MouseDown(_) => MapEventKind::MouseDown,
            MapEvent::MouseMove(_) => MapEventKind::MouseMove,
            MapEvent::MouseUp(_) => MapEventKind::MouseUp,
            MapEvent::MarkerClick(_) => MapEventKind::MarkerClick,
            MapEvent::MarkerDrag(..) => MapEventKind::MarkerDrag,
            MapEvent::StyleLoad => MapEventKind::StyleLoad,
            MapEvent::StyleData => MapEventKind::StyleData,
        }
    }
}

/// Kind of [`MapEvent`] without the payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapEventKind {
    /// See [`MapEvent::Click`].
    Click,
    /// See [`MapEvent::MouseDown`].
    MouseDown,
    /// See [`MapEvent::MouseMove`].
    MouseMove,
    /// See [`MapEvent::MouseUp`].
    MouseUp,
    /// See [`MapEvent::MarkerClick`].
    MarkerClick,
    /// See [`MapEvent::MarkerDrag`].
    MarkerDrag,
    /// See [`MapEvent::StyleLoad`].
    StyleLoad,
    /// See [`MapEvent::StyleData`].
    StyleData,
}

/// Lifecycle event fired by a control on the map event bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// Ruler measuring was turned on.
    RulerOn,
    /// Ruler measuring was turned off.
    RulerOff,
    /// Circle measuring was turned on.
    CircleOn,
    /// Circle measuring was turned off.
    CircleOff,
    /// Area measuring was turned on.
    AreaOn,
    /// Area measuring was turned off.
    AreaOff,
}

impl ControlEvent {
    /// Name of the event on the map event bus, e.g. `ruler.on`.
    pub fn name(&self) -> &'static str {
        match self {
            ControlEvent::RulerOn => "ruler.on",
            ControlEvent::RulerOff => "ruler.off",
            ControlEvent::CircleOn => "circle.on",
            ControlEvent::CircleOff => "circle.off",
            ControlEvent::AreaOn => "area.on",
            ControlEvent::AreaOff => "area.off",
        }
    }
}

impl Display for ControlEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Map engine operations used by the measurement controls.
///
/// Sources and layers belong to the current map style: when the engine switches to another
/// style, everything added before is dropped and [`MapEvent::StyleLoad`] is delivered. Markers
/// are not part of the style and survive style changes.
pub trait MapEngine {
    /// Adds a GeoJSON source with the given initial data.
    fn add_source(&mut self, id: &str, data: GeoJson) -> Result<(), EngineError>;
    /// Returns true if a source with the given id exists in the current style.
    fn has_source(&self, id: &str) -> bool;
    /// Replaces the data of an existing GeoJSON source.
    fn set_source_data(&mut self, id: &str, data: GeoJson) -> Result<(), EngineError>;
    /// Removes a source. All layers using it must be removed first.
    fn remove_source(&mut self, id: &str) -> Result<(), EngineError>;

    /// Adds a layer on top of all existing layers.
    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), EngineError>;
    /// Returns true if a layer with the given id exists in the current style.
    fn has_layer(&self, id: &str) -> bool;
    /// Removes a layer.
    fn remove_layer(&mut self, id: &str) -> Result<(), EngineError>;

    /// Starts delivering events of the given kind to the `listener`.
    fn subscribe(&mut self, listener: &str, kind: MapEventKind);
    /// Stops delivering events of the given kind to the `listener`.
    fn unsubscribe(&mut self, listener: &str, kind: MapEventKind);
    /// Fires an event on the map event bus for external listeners.
    fn fire(&mut self, event: ControlEvent);
    /// Sets the cursor shown over the map canvas.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Creates a new marker.
    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId;
    /// Moves a marker.
    fn set_marker_position(
        &mut self,
        marker: MarkerId,
        position: GeoPoint2d,
    ) -> Result<(), EngineError>;
    /// Current position of a marker.
    fn marker_position(&self, marker: MarkerId) -> Option<GeoPoint2d>;
    /// Removes a marker from the map.
    fn remove_marker(&mut self, marker: MarkerId) -> Result<(), EngineError>;
}
