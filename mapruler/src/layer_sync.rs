//! Lifecycle of the map sources and layers that draw a shape.
//!
//! Every shape is drawn by a few GeoJSON sources, each drawn by one or more style layers. The
//! map engine drops all of them when its style is replaced, so [`OverlayLayers`] keeps the last
//! data given to each source and can recreate whatever is missing at any time with
//! [`OverlayLayers::ensure_mounted`].

use ahash::HashMap;
use geojson::{FeatureCollection, GeoJson};
use serde_json::json;

use crate::config::OverlayStyle;
use crate::engine::{LayerKind, LayerSpec, MapEngine};
use crate::error::EngineError;

/// Prefix of the ids of all sources added by the controls.
pub const SOURCE_PREFIX: &str = "controls-source";
/// Prefix of the ids of all layers added by the controls.
pub const LAYER_PREFIX: &str = "controls-layer";

/// What a layer draws from its source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// Polygon fill.
    Fill,
    /// Polygon outline.
    Outline,
    /// Line.
    Line,
    /// Text labels taken from the `label` property of point features.
    Labels,
}

impl LayerRole {
    fn name(&self) -> &'static str {
        match self {
            LayerRole::Fill => "fill",
            LayerRole::Outline => "outline",
            LayerRole::Line => "line",
            LayerRole::Labels => "labels",
        }
    }

    fn kind(&self) -> LayerKind {
        match self {
            LayerRole::Fill => LayerKind::Fill,
            LayerRole::Outline | LayerRole::Line => LayerKind::Line,
            LayerRole::Labels => LayerKind::Symbol,
        }
    }
}

/// Id of a source drawing the `aspect` of a shape, e.g. `controls-source-area-3-polygon`.
pub fn source_id(tool: &str, shape: u32, aspect: &str) -> String {
    format!("{SOURCE_PREFIX}-{tool}-{shape}-{aspect}")
}

/// Id of a layer drawing the `aspect` of a shape, e.g. `controls-layer-area-3-polygon-fill`.
pub fn layer_id(tool: &str, shape: u32, aspect: &str, role: LayerRole) -> String {
    format!("{LAYER_PREFIX}-{tool}-{shape}-{aspect}-{}", role.name())
}

/// GeoJSON feature collection without features.
pub fn empty_data() -> GeoJson {
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    })
}

/// A style layer together with the source it draws.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBinding {
    layer: LayerSpec,
}

impl LayerBinding {
    /// Creates a binding for the given layer. The source id is taken from the layer.
    pub fn new(layer: LayerSpec) -> Self {
        Self { layer }
    }

    /// Creates a binding of a layer with paint properties taken from the `style`.
    pub fn styled(
        source_id: String,
        layer_id: String,
        role: LayerRole,
        style: &OverlayStyle,
    ) -> Self {
        let (paint, layout) = match role {
            LayerRole::Fill => (
                json!({
                    "fill-color": style.fill_color,
                    "fill-opacity": style.fill_opacity,
                }),
                json!({}),
            ),
            LayerRole::Outline | LayerRole::Line => (
                json!({
                    "line-color": style.line_color,
                    "line-width": style.line_width,
                }),
                json!({
                    "line-cap": "round",
                    "line-join": "round",
                }),
            ),
            LayerRole::Labels => (
                json!({
                    "text-color": style.label_color,
                    "text-halo-color": style.label_halo_color,
                    "text-halo-width": 1,
                }),
                json!({
                    "text-field": ["get", "label"],
                    "text-size": style.label_size,
                    "text-anchor": "top",
                    "text-offset": [0, 0.8],
                    "text-allow-overlap": true,
                }),
            ),
        };

        Self::new(LayerSpec {
            id: layer_id,
            kind: role.kind(),
            source: source_id,
            paint,
            layout,
        })
    }

    /// Id of the source.
    pub fn source_id(&self) -> &str {
        &self.layer.source
    }

    /// Id of the layer.
    pub fn layer_id(&self) -> &str {
        &self.layer.id
    }

    /// Layer specification.
    pub fn layer(&self) -> &LayerSpec {
        &self.layer
    }
}

/// Sources and layers of one shape, together with the latest data of each source.
///
/// Layers are added to the map in the order the bindings are given, so later bindings are
/// painted on top of earlier ones.
#[derive(Debug)]
pub struct OverlayLayers {
    bindings: Vec<LayerBinding>,
    snapshots: HashMap<String, GeoJson>,
}

impl OverlayLayers {
    /// Creates a new set of bindings. All sources start empty.
    pub fn new(bindings: Vec<LayerBinding>) -> Self {
        let snapshots = bindings
            .iter()
            .map(|binding| (binding.source_id().to_string(), empty_data()))
            .collect();

        Self {
            bindings,
            snapshots,
        }
    }

    /// Bindings in paint order.
    pub fn bindings(&self) -> &[LayerBinding] {
        &self.bindings
    }

    /// The latest data given to the source.
    pub fn snapshot(&self, source_id: &str) -> Option<&GeoJson> {
        self.snapshots.get(source_id)
    }

    /// Adds all sources and layers to the map.
    ///
    /// Sources already present in the map are reused, layers already present are left as they
    /// are. Sources are created with the latest data, not the initial one.
    pub fn mount(&self, map: &mut dyn MapEngine) -> Result<(), EngineError> {
        self.reconcile(map).map(|_| ())
    }

    /// Recreates every source and layer that is missing from the map, for example after the
    /// map style was replaced. Returns true if anything was recreated.
    ///
    /// Calling this function when everything is in place does nothing, so it is safe to call
    /// it on every style notification of the engine.
    pub fn ensure_mounted(&self, map: &mut dyn MapEngine) -> bool {
        match self.reconcile(map) {
            Ok(created) => {
                if created > 0 {
                    log::debug!(
                        "Recreated {created} sources and layers starting with {:?}",
                        self.bindings.first().map(LayerBinding::layer_id)
                    );
                }

                created > 0
            }
            Err(err) => {
                log::debug!("Failed to remount overlay layers: {err}");
                false
            }
        }
    }

    /// Sets new data of the source.
    ///
    /// The data is remembered even if the source is currently not in the map (e.g. the style is
    /// being replaced), and will be used when the source is recreated.
    pub fn update(&mut self, map: &mut dyn MapEngine, source_id: &str, data: GeoJson) {
        let Some(snapshot) = self.snapshots.get_mut(source_id) else {
            log::debug!("Update of unknown source {source_id} is ignored");
            return;
        };

        *snapshot = data;

        if !map.has_source(source_id) {
            log::trace!("Source {source_id} is not in the map, update is postponed");
            return;
        }

        if let Err(err) = map.set_source_data(source_id, snapshot.clone()) {
            log::debug!("Failed to update source {source_id}: {err}");
        }
    }

    /// Removes all layers and then all sources from the map. Ids that are not in the map are
    /// skipped, so the function can be called any number of times.
    pub fn unmount(&self, map: &mut dyn MapEngine) {
        for binding in self.bindings.iter().rev() {
            if map.has_layer(binding.layer_id()) {
                if let Err(err) = map.remove_layer(binding.layer_id()) {
                    log::debug!("Failed to remove layer {}: {err}", binding.layer_id());
                }
            }
        }

        for binding in &self.bindings {
            if map.has_source(binding.source_id()) {
                if let Err(err) = map.remove_source(binding.source_id()) {
                    log::debug!("Failed to remove source {}: {err}", binding.source_id());
                }
            }
        }
    }

    fn reconcile(&self, map: &mut dyn MapEngine) -> Result<usize, EngineError> {
        let mut created = 0;
        for binding in &self.bindings {
            let source_id = binding.source_id();
            if !map.has_source(source_id) {
                let data = self.snapshots.get(source_id).cloned().unwrap_or_else(empty_data);
                map.add_source(source_id, data)?;
                created += 1;
            }

            if !map.has_layer(binding.layer_id()) {
                map.add_layer(binding.layer.clone())?;
                created += 1;
            }
        }

        Ok(created)
    }
}
