use mapruler_types::GeoPoint2d;

use crate::config::OverlayStyle;
use crate::engine::{MapEngine, MarkerId};
use crate::layer_sync::{source_id, OverlayLayers};
use crate::marker::VertexMarkers;
use crate::shape::{Shape, ShapeId};

/// Shapes of one control together with everything they put on the map.
///
/// Every change of a shape must go through [`Overlay::update`] or
/// [`Overlay::update_current`], so that the map is updated with the new state of the shape.
#[derive(Debug)]
pub struct Overlay<S: Shape> {
    entries: Vec<ShapeEntry<S>>,
    style: OverlayStyle,
    next_id: u32,
}

#[derive(Debug)]
struct ShapeEntry<S> {
    shape: S,
    layers: OverlayLayers,
    markers: VertexMarkers,
}

impl<S: Shape> ShapeEntry<S> {
    fn sync(&mut self, map: &mut dyn MapEngine) {
        let kind = S::KIND.name();
        let id = self.shape.id().0;
        for data in self.shape.render() {
            self.layers.update(map, &source_id(kind, id, data.aspect), data.data);
        }

        self.markers.sync(map, self.shape.vertices_mut());
    }

    fn destroy(&mut self, map: &mut dyn MapEngine) {
        self.markers.destroy_all(map, self.shape.vertices_mut());
        self.layers.unmount(map);
    }
}

impl<S: Shape> Overlay<S> {
    /// Creates an empty overlay. The layers of the shapes are painted with the given style.
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            entries: vec![],
            style,
            next_id: 0,
        }
    }

    /// Adds a new shape created by `make` with a fresh id, puts its layers on the map and
    /// makes it the current shape. Returns the id of the shape.
    pub fn start(
        &mut self,
        map: &mut dyn MapEngine,
        make: impl FnOnce(ShapeId) -> S,
    ) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;

        let shape = make(id);
        let layers = OverlayLayers::new(shape.layer_bindings(&self.style));
        if let Err(err) = layers.mount(map) {
            log::debug!("Failed to add layers of {} {id:?}: {err}", S::KIND.name());
        }

        let mut entry = ShapeEntry {
            shape,
            layers,
            markers: VertexMarkers::new(),
        };
        entry.sync(map);
        self.entries.push(entry);

        log::debug!("Started {} {id:?}", S::KIND.name());
        id
    }

    /// All shapes, oldest first.
    pub fn shapes(&self) -> impl Iterator<Item = &S> + '_ {
        self.entries.iter().map(|entry| &entry.shape)
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no shapes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The shape added last.
    pub fn current(&self) -> Option<&S> {
        self.entries.last().map(|entry| &entry.shape)
    }

    /// Changes the shape added last and updates the map. Returns `None` if there are no
    /// shapes.
    pub fn update_current<R>(
        &mut self,
        map: &mut dyn MapEngine,
        change: impl FnOnce(&mut S) -> R,
    ) -> Option<R> {
        let index = self.entries.len().checked_sub(1)?;
        self.update(index, map, change)
    }

    /// Changes the shape with the given index and updates the map. Returns `None` if there is
    /// no such shape.
    pub fn update<R>(
        &mut self,
        index: usize,
        map: &mut dyn MapEngine,
        change: impl FnOnce(&mut S) -> R,
    ) -> Option<R> {
        let entry = self.entries.get_mut(index)?;
        let result = change(&mut entry.shape);
        entry.sync(map);

        Some(result)
    }

    /// Finds the shape and the vertex owning the marker. Returns the index of the shape in the
    /// overlay and the index of the vertex in the shape.
    pub fn locate_marker(&self, marker: MarkerId) -> Option<(usize, usize)> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| Some((index, entry.markers.vertex_of(marker)?)))
    }

    /// Moves the vertex owning the marker to the new position. Returns false if the marker
    /// does not belong to any vertex of the overlay.
    pub fn drag_vertex(
        &mut self,
        map: &mut dyn MapEngine,
        marker: MarkerId,
        point: GeoPoint2d,
    ) -> bool {
        let Some((shape, vertex)) = self.locate_marker(marker) else {
            return false;
        };

        self.update(shape, map, |s| s.move_vertex(vertex, point)).unwrap_or(false)
    }

    /// Recreates the sources and layers of all shapes that are missing from the map. Returns
    /// true if anything was recreated.
    pub fn ensure_mounted(&mut self, map: &mut dyn MapEngine) -> bool {
        let mut remounted = false;
        for entry in &self.entries {
            remounted |= entry.layers.ensure_mounted(map);
        }

        remounted
    }

    /// Removes the shape added last together with its markers, layers and sources. Returns
    /// false if there are no shapes.
    pub fn discard_current(&mut self, map: &mut dyn MapEngine) -> bool {
        let Some(mut entry) = self.entries.pop() else {
            return false;
        };

        entry.destroy(map);
        log::debug!("Discarded {} {:?}", S::KIND.name(), entry.shape.id());
        true
    }

    /// Removes all shapes together with their markers, layers and sources.
    pub fn clear(&mut self, map: &mut dyn MapEngine) {
        for mut entry in self.entries.drain(..) {
            entry.destroy(map);
        }
    }
}
