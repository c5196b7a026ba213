//! Draggable marker handles of shape vertices.

use ahash::HashMap;

use crate::engine::{MapEngine, MarkerId, MarkerOptions};
use crate::shape::Vertex;

/// Marker handles of the vertices of one shape.
///
/// Every vertex owns at most one marker. The markers are created on the map as the vertices
/// appear and are removed together with the shape.
#[derive(Debug, Default)]
pub struct VertexMarkers {
    owners: HashMap<MarkerId, usize>,
}

impl VertexMarkers {
    /// Creates an empty set of markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draggable marker at the position of the vertex and makes the vertex its owner.
    pub fn add_marker(&mut self, map: &mut dyn MapEngine, vertex: &mut Vertex) -> MarkerId {
        let marker = map.add_marker(MarkerOptions {
            position: vertex.point(),
            draggable: true,
        });

        vertex.set_marker(marker);
        self.owners.insert(marker, vertex.index());
        log::trace!(
            "Marker {marker:?} added for vertex {} of shape {:?}",
            vertex.index(),
            vertex.shape()
        );

        marker
    }

    /// Index of the vertex owning the marker.
    pub fn vertex_of(&self, marker: MarkerId) -> Option<usize> {
        self.owners.get(&marker).copied()
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns true if there are no markers.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Creates markers for the vertices that do not have one yet and moves the existing
    /// markers to the positions of their vertices.
    pub fn sync(&mut self, map: &mut dyn MapEngine, vertices: &mut [Vertex]) {
        for vertex in vertices {
            let Some(marker) = vertex.marker() else {
                self.add_marker(map, vertex);
                continue;
            };

            if map.marker_position(marker) == Some(vertex.point()) {
                continue;
            }

            if let Err(err) = map.set_marker_position(marker, vertex.point()) {
                log::debug!("Failed to move marker of vertex {}: {err}", vertex.index());
            }
        }
    }

    /// Removes all markers of the vertices from the map.
    pub fn destroy_all(&mut self, map: &mut dyn MapEngine, vertices: &mut [Vertex]) {
        for vertex in vertices {
            if let Some(marker) = vertex.take_marker() {
                if let Err(err) = map.remove_marker(marker) {
                    log::debug!("Failed to remove marker {marker:?}: {err}");
                }
            }
        }

        self.owners.clear();
    }
}
