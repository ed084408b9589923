//! Roguelike utilities for lazarus: square grid map, visibility, map
//! configuration and dice.
//!
//! [`SquareGridMap`] implements both
//! [`SearchMap`](lazarus_paths::SearchMap), so it can be searched with
//! [`lazarus_paths::Search`], and [`VisibilityMap`], so rays and
//! field-of-view can be cast over it.

pub mod config;
pub mod dice;
pub mod error;
pub mod fov;
pub mod grid_map;

pub use config::MapConfig;
pub use dice::Dice;
pub use error::{MapError, Result};
pub use fov::{FovAlgorithm, VisibilityMap, add_octants, cast_ray, circle2d, fov, line, los};
pub use grid_map::{DEFAULT_COST, SquareGridMap, UNWALKABLE_COST};
