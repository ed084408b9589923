//! A fixed-size square tile map.
//!
//! Every tile carries a traversal cost and a transparency flag. A negative
//! cost marks the tile as unwalkable. Storage is row-major.

use std::fmt;

use lazarus_core::Position2D;
use lazarus_paths::SearchMap;

use crate::error::{MapError, Result};
use crate::fov::VisibilityMap;

/// Cost stored for unwalkable tiles.
pub const UNWALKABLE_COST: f32 = -1.0;

/// Cost given to tiles made walkable without an explicit cost.
pub const DEFAULT_COST: f32 = 1.0;

/// A rectangular grid of tiles with optional diagonal adjacency.
///
/// A new map is entirely unwalkable and opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareGridMap {
    width: i32,
    height: i32,
    diagonals: bool,
    costs: Vec<f32>,
    transparencies: Vec<bool>,
}

impl SquareGridMap {
    /// Create a `width`×`height` map of walls.
    pub fn new(width: i32, height: i32, diagonals: bool) -> Result<Self> {
        let invalid = MapError::InvalidDimensions { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let len = width.checked_mul(height).ok_or(invalid)? as usize;
        Ok(Self {
            width,
            height,
            diagonals,
            costs: vec![UNWALKABLE_COST; len],
            transparencies: vec![false; len],
        })
    }

    /// Build a map from rows of tile values, `prefab[y][x]`.
    ///
    /// `0` is a wall; anything else is a transparent floor with cost 1.
    /// Short rows are padded with walls up to the longest row.
    pub fn from_prefab<R: AsRef<[i32]>>(prefab: &[R], diagonals: bool) -> Result<Self> {
        let rows = prefab.len();
        let columns = prefab
            .iter()
            .map(|row| row.as_ref().len())
            .max()
            .unwrap_or(0);
        let (Ok(width), Ok(height)) = (i32::try_from(columns), i32::try_from(rows)) else {
            return Err(MapError::InvalidDimensions {
                width: i32::try_from(columns).unwrap_or(i32::MAX),
                height: i32::try_from(rows).unwrap_or(i32::MAX),
            });
        };
        let mut map = Self::new(width, height, diagonals)?;
        for (y, row) in prefab.iter().enumerate() {
            for (x, &tile) in row.as_ref().iter().enumerate() {
                if tile != 0 {
                    let i = y * width as usize + x;
                    map.costs[i] = DEFAULT_COST;
                    map.transparencies[i] = true;
                }
            }
        }
        Ok(map)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether diagonal tiles count as adjacent.
    #[inline]
    pub fn diagonals(&self) -> bool {
        self.diagonals
    }

    #[inline]
    pub fn is_out_of_bounds(&self, pos: Position2D) -> bool {
        pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height
    }

    #[inline]
    fn index(&self, pos: Position2D) -> Option<usize> {
        if self.is_out_of_bounds(pos) {
            None
        } else {
            Some((pos.y * self.width + pos.x) as usize)
        }
    }

    fn checked_index(&self, pos: Position2D) -> Result<usize> {
        self.index(pos).ok_or(MapError::OutOfBounds(pos))
    }

    /// `false` for out-of-bounds positions and negative costs.
    pub fn is_walkable(&self, pos: Position2D) -> bool {
        match self.index(pos) {
            Some(i) => self.costs[i] >= 0.0,
            None => {
                log::trace!("is_walkable queried out of bounds at {pos}");
                false
            }
        }
    }

    /// `false` for out-of-bounds positions.
    pub fn is_transparent(&self, pos: Position2D) -> bool {
        match self.index(pos) {
            Some(i) => self.transparencies[i],
            None => {
                log::trace!("is_transparent queried out of bounds at {pos}");
                false
            }
        }
    }

    /// Traversal cost of a walkable tile.
    pub fn get_cost(&self, pos: Position2D) -> Result<f32> {
        let cost = self.costs[self.checked_index(pos)?];
        if cost < 0.0 {
            return Err(MapError::UnwalkableTileCost(pos));
        }
        Ok(cost)
    }

    /// Set the traversal cost. A negative cost makes the tile unwalkable.
    pub fn set_cost(&mut self, pos: Position2D, cost: f32) -> Result<()> {
        let i = self.checked_index(pos)?;
        self.costs[i] = cost;
        Ok(())
    }

    /// Make a tile walkable or not.
    ///
    /// Making an already walkable tile walkable keeps its cost; otherwise
    /// the cost becomes [`DEFAULT_COST`] or [`UNWALKABLE_COST`].
    pub fn set_walkable(&mut self, pos: Position2D, walkable: bool) -> Result<()> {
        let i = self.checked_index(pos)?;
        match (walkable, self.costs[i] >= 0.0) {
            (true, true) => {}
            (true, false) => self.costs[i] = DEFAULT_COST,
            (false, _) => self.costs[i] = UNWALKABLE_COST,
        }
        Ok(())
    }

    pub fn set_transparency(&mut self, pos: Position2D, transparent: bool) -> Result<()> {
        let i = self.checked_index(pos)?;
        self.transparencies[i] = transparent;
        Ok(())
    }

    /// Walkable tiles adjacent to `pos`: orthogonal ones first, then the
    /// diagonals when enabled.
    ///
    /// Diagonal moves between two walls are allowed.
    pub fn neighbours(&self, pos: Position2D) -> Result<Vec<Position2D>> {
        self.checked_index(pos)?;
        let mut out = Vec::with_capacity(8);
        self.push_neighbours(pos, &mut out);
        Ok(out)
    }

    fn push_neighbours(&self, pos: Position2D, buf: &mut Vec<Position2D>) {
        buf.extend(
            pos.neighbours_4()
                .into_iter()
                .filter(|&n| self.is_walkable(n)),
        );
        if self.diagonals {
            buf.extend(
                pos.diagonals()
                    .into_iter()
                    .filter(|&n| self.is_walkable(n)),
            );
        }
    }

    /// Make every tile in the inclusive rectangle walkable with `cost` and
    /// transparent.
    ///
    /// A rectangle with swapped corners is empty and changes nothing. A
    /// non-empty rectangle reaching outside the map fails before any tile
    /// is touched.
    pub fn carve_room(
        &mut self,
        top_left: Position2D,
        bottom_right: Position2D,
        cost: f32,
    ) -> Result<()> {
        if top_left.x > bottom_right.x || top_left.y > bottom_right.y {
            return Ok(());
        }
        self.checked_index(top_left)?;
        self.checked_index(bottom_right)?;
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                let i = (y * self.width + x) as usize;
                self.costs[i] = cost;
                self.transparencies[i] = true;
            }
        }
        Ok(())
    }
}

impl SearchMap<Position2D> for SquareGridMap {
    fn neighbours(&self, pos: Position2D, buf: &mut Vec<Position2D>) {
        if !self.is_out_of_bounds(pos) {
            self.push_neighbours(pos, buf);
        }
    }

    fn cost(&self, _from: Position2D, to: Position2D) -> f32 {
        self.get_cost(to).unwrap_or(f32::INFINITY)
    }
}

impl VisibilityMap for SquareGridMap {
    fn is_transparent(&self, pos: Position2D) -> bool {
        SquareGridMap::is_transparent(self, pos)
    }

    fn is_out_of_bounds(&self, pos: Position2D) -> bool {
        SquareGridMap::is_out_of_bounds(self, pos)
    }
}

/// Renders `.` for walkable tiles and `#` for walls, one row per line.
impl fmt::Display for SquareGridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.costs.chunks(self.width as usize) {
            for &cost in row {
                f.write_str(if cost >= 0.0 { "." } else { "#" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
