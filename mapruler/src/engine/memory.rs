use ahash::{HashMap, HashSet};
use geojson::GeoJson;
use mapruler_types::GeoPoint2d;

use crate::engine::{
    ControlEvent, Cursor, LayerSpec, MapEngine, MapEventKind, MarkerId, MarkerOptions,
};
use crate::error::EngineError;

/// Headless [`MapEngine`] that keeps everything in memory.
///
/// Layers are stored in paint order. Every fired [`ControlEvent`] is recorded and can be
/// inspected with [`MemoryMap::fired_events`].
#[derive(Debug, Default)]
pub struct MemoryMap {
    sources: HashMap<String, GeoJson>,
    layers: Vec<LayerSpec>,
    markers: HashMap<MarkerId, MarkerState>,
    next_marker_id: u64,
    subscriptions: HashSet<(String, MapEventKind)>,
    fired: Vec<ControlEvent>,
    cursor: Cursor,
    style_generation: u32,
}

#[derive(Debug, Copy, Clone)]
struct MarkerState {
    position: GeoPoint2d,
    draggable: bool,
}

impl MemoryMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the style, dropping all sources and layers. Markers are kept.
    ///
    /// The caller is expected to deliver [`MapEvent::StyleLoad`](super::MapEvent::StyleLoad)
    /// to the controls afterwards, as a real engine would.
    pub fn reload_style(&mut self) {
        self.sources.clear();
        self.layers.clear();
        self.style_generation += 1;
        log::debug!("Style replaced, generation {}", self.style_generation);
    }

    /// Number of times the style was replaced.
    pub fn style_generation(&self) -> u32 {
        self.style_generation
    }

    /// Data of the source with the given id.
    pub fn source(&self, id: &str) -> Option<&GeoJson> {
        self.sources.get(id)
    }

    /// Ids of all sources, sorted.
    pub fn source_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// All layers in paint order (bottom first).
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Layer with the given id.
    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Number of markers currently on the map.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Whether the marker can be dragged by the user.
    pub fn is_marker_draggable(&self, marker: MarkerId) -> Option<bool> {
        self.markers.get(&marker).map(|m| m.draggable)
    }

    /// Moves a draggable marker as the user would do by dragging it. Returns the position the
    /// marker ends up at, or `None` if the marker does not exist or is not draggable.
    pub fn drag_marker(&mut self, marker: MarkerId, position: GeoPoint2d) -> Option<GeoPoint2d> {
        let state = self.markers.get_mut(&marker)?;
        if !state.draggable {
            return None;
        }

        state.position = position;
        Some(position)
    }

    /// Returns true if the `listener` is subscribed to events of the `kind`.
    pub fn is_subscribed(&self, listener: &str, kind: MapEventKind) -> bool {
        self.subscriptions.contains(&(listener.to_string(), kind))
    }

    /// All event kinds the `listener` is subscribed to, sorted.
    pub fn subscriptions(&self, listener: &str) -> Vec<MapEventKind> {
        let mut kinds: Vec<MapEventKind> = self
            .subscriptions
            .iter()
            .filter(|(name, _)| name == listener)
            .map(|(_, kind)| *kind)
            .collect();
        kinds.sort_unstable();
        kinds
    }

    /// Events fired on the map event bus so far.
    pub fn fired_events(&self) -> &[ControlEvent] {
        &self.fired
    }

    /// Current cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl MapEngine for MemoryMap {
    fn add_source(&mut self, id: &str, data: GeoJson) -> Result<(), EngineError> {
        if self.sources.contains_key(id) {
            return Err(EngineError::SourceExists(id.to_string()));
        }

        self.sources.insert(id.to_string(), data);
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn set_source_data(&mut self, id: &str, data: GeoJson) -> Result<(), EngineError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| EngineError::SourceNotFound(id.to_string()))?;
        *source = data;
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), EngineError> {
        if self.layers.iter().any(|layer| layer.source == id) {
            return Err(EngineError::SourceInUse(id.to_string()));
        }

        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EngineError::SourceNotFound(id.to_string()))
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), EngineError> {
        if self.has_layer(&layer.id) {
            return Err(EngineError::LayerExists(layer.id));
        }

        if !self.has_source(&layer.source) {
            return Err(EngineError::SourceNotFound(layer.source));
        }

        self.layers.push(layer);
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == id)
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), EngineError> {
        let index = self
            .layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or_else(|| EngineError::LayerNotFound(id.to_string()))?;
        self.layers.remove(index);
        Ok(())
    }

    fn subscribe(&mut self, listener: &str, kind: MapEventKind) {
        self.subscriptions.insert((listener.to_string(), kind));
    }

    fn unsubscribe(&mut self, listener: &str, kind: MapEventKind) {
        self.subscriptions.remove(&(listener.to_string(), kind));
    }

    fn fire(&mut self, event: ControlEvent) {
        log::debug!("Event fired: {event}");
        self.fired.push(event);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId {
        let id = MarkerId(self.next_marker_id);
        self.next_marker_id += 1;
        self.markers.insert(
            id,
            MarkerState {
                position: options.position,
                draggable: options.draggable,
            },
        );

        id
    }

    fn set_marker_position(
        &mut self,
        marker: MarkerId,
        position: GeoPoint2d,
    ) -> Result<(), EngineError> {
        let state = self
            .markers
            .get_mut(&marker)
            .ok_or(EngineError::MarkerNotFound(marker))?;
        state.position = position;
        Ok(())
    }

    fn marker_position(&self, marker: MarkerId) -> Option<GeoPoint2d> {
        self.markers.get(&marker).map(|m| m.position)
    }

    fn remove_marker(&mut self, marker: MarkerId) -> Result<(), EngineError> {
        self.markers
            .remove(&marker)
            .map(|_| ())
            .ok_or(EngineError::MarkerNotFound(marker))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geojson::FeatureCollection;
    use mapruler_types::lonlat;
    use serde_json::json;

    use super::*;
    use crate::engine::LayerKind;

    fn empty_data() -> GeoJson {
        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        })
    }

    fn line_layer(id: &str, source: &str) -> LayerSpec {
        LayerSpec {
            id: id.to_string(),
            kind: LayerKind::Line,
            source: source.to_string(),
            paint: json!({}),
            layout: json!({}),
        }
    }

    #[test]
    fn sources_and_layers() {
        let mut map = MemoryMap::new();

        assert_matches!(
            map.add_layer(line_layer("l", "s")),
            Err(EngineError::SourceNotFound(_))
        );

        map.add_source("s", empty_data()).expect("new source");
        assert_matches!(map.add_source("s", empty_data()), Err(EngineError::SourceExists(_)));

        map.add_layer(line_layer("l", "s")).expect("new layer");
        assert_matches!(
            map.add_layer(line_layer("l", "s")),
            Err(EngineError::LayerExists(_))
        );

        assert_matches!(map.remove_source("s"), Err(EngineError::SourceInUse(_)));
        map.remove_layer("l").expect("layer exists");
        map.remove_source("s").expect("source exists");

        assert!(map.layers().is_empty());
        assert!(map.source_ids().is_empty());
    }

    #[test]
    fn set_data_of_missing_source_fails() {
        let mut map = MemoryMap::new();
        assert_matches!(
            map.set_source_data("missing", empty_data()),
            Err(EngineError::SourceNotFound(_))
        );
    }

    #[test]
    fn style_reload_keeps_markers() {
        let mut map = MemoryMap::new();
        map.add_source("s", empty_data()).expect("new source");
        map.add_layer(line_layer("l", "s")).expect("new layer");
        let marker = map.add_marker(MarkerOptions {
            position: lonlat!(1.0, 2.0),
            draggable: true,
        });

        map.reload_style();

        assert!(!map.has_source("s"));
        assert!(!map.has_layer("l"));
        assert_eq!(map.marker_position(marker), Some(lonlat!(1.0, 2.0)));
        assert_eq!(map.style_generation(), 1);
    }

    #[test]
    fn only_draggable_markers_are_dragged() {
        let mut map = MemoryMap::new();
        let fixed = map.add_marker(MarkerOptions {
            position: lonlat!(0.0, 0.0),
            draggable: false,
        });
        let movable = map.add_marker(MarkerOptions {
            position: lonlat!(0.0, 0.0),
            draggable: true,
        });

        assert_eq!(map.drag_marker(fixed, lonlat!(1.0, 1.0)), None);
        assert_eq!(map.drag_marker(movable, lonlat!(1.0, 1.0)), Some(lonlat!(1.0, 1.0)));
        assert_eq!(map.marker_position(movable), Some(lonlat!(1.0, 1.0)));

        map.remove_marker(movable).expect("marker exists");
        assert_matches!(map.remove_marker(movable), Err(EngineError::MarkerNotFound(_)));
        assert_eq!(map.marker_count(), 1);
    }

    #[test]
    fn subscriptions_are_per_listener() {
        let mut map = MemoryMap::new();
        map.subscribe("ruler", MapEventKind::Click);
        map.subscribe("ruler", MapEventKind::StyleLoad);
        map.subscribe("area", MapEventKind::Click);

        assert_eq!(
            map.subscriptions("ruler"),
            vec![MapEventKind::Click, MapEventKind::StyleLoad]
        );

        map.unsubscribe("ruler", MapEventKind::Click);
        assert!(!map.is_subscribed("ruler", MapEventKind::Click));
        assert!(map.is_subscribed("area", MapEventKind::Click));
    }
}
