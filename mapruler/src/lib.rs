//! Mapruler provides interactive measurement controls for maps: a ruler measuring distances
//! along polylines, a circle measuring radius and area, and a polygon measuring area.
//!
//! # Quick start
//!
//! ```
//! use mapruler::control::{MapEventHandler, RulerControl};
//! use mapruler::engine::{MapEvent, MemoryMap};
//! use mapruler::mapruler_types::lonlat;
//!
//! let mut map = MemoryMap::new();
//! let mut ruler = RulerControl::default();
//!
//! ruler.measuring_on(&mut map);
//! ruler.handle(&MapEvent::Click(lonlat!(0.0, 0.0)), &mut map);
//! ruler.handle(&MapEvent::Click(lonlat!(0.0, 0.00899)), &mut map);
//!
//! println!("{:?}", ruler.measurements());
//! ```
//!
//! # Main components
//!
//! The controls do not draw anything by themselves. Everything goes through the
//! [`MapEngine`](engine::MapEngine) trait, which is implemented by the host map:
//!
//! * [`controls`](control) keep the measuring state and turn [`MapEvent`](engine::MapEvent)s
//!   delivered by the engine into changes of
//! * [`shapes`](shape), which hold the measured geometry and compute the labels with the
//!   functions from [`mapruler_types::geodesy`], and produce GeoJSON data for
//! * [`layer_sync`], which adds the sources and layers of every shape to the map and keeps them
//!   there even when the map style is replaced.
//!
//! Vertices of the shapes can be moved by dragging their [`marker`] handles.
//!
//! [`MemoryMap`](engine::MemoryMap) is an engine that keeps everything in memory. It can be used
//! to run the controls without a real map.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod layer_sync;
pub mod marker;
pub mod shape;

pub use mapruler_types;

#[cfg(test)]
mod tests;
