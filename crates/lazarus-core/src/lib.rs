//! **lazarus-core**: core types for the lazarus roguelike engine.
//!
//! This crate provides the geometry primitive shared by the rest of the
//! workspace: grid maps, visibility, pathfinding and the entities that
//! carry a grid position as a component.

pub mod geom;

pub use geom::Position2D;
