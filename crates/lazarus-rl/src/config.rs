//! Map settings, buildable into a [`SquareGridMap`] and loadable through
//! serde when the `serde` feature is on.

use crate::error::Result;
use crate::grid_map::SquareGridMap;

/// Settings from which a [`SquareGridMap`] is built.
///
/// When `prefab` is set it decides the map's size and layout, and `width`
/// and `height` are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    pub diagonals: bool,
    /// Rows of tiles, `0` for walls.
    pub prefab: Option<Vec<Vec<i32>>>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 50,
            diagonals: false,
            prefab: None,
        }
    }
}

impl MapConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_diagonals(mut self, diagonals: bool) -> Self {
        self.diagonals = diagonals;
        self
    }

    pub fn with_prefab(mut self, prefab: Vec<Vec<i32>>) -> Self {
        self.prefab = Some(prefab);
        self
    }

    pub fn build(&self) -> Result<SquareGridMap> {
        match &self.prefab {
            Some(rows) => SquareGridMap::from_prefab(rows, self.diagonals),
            None => SquareGridMap::new(self.width, self.height, self.diagonals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use lazarus_core::Position2D;

    #[test]
    fn builds_blank_map() {
        let map = MapConfig::new(4, 2).build().unwrap();
        assert_eq!((map.width(), map.height()), (4, 2));
        assert!(!map.diagonals());
        assert!(!map.is_walkable(Position2D::ZERO));
    }

    #[test]
    fn prefab_wins_over_dimensions() {
        let map = MapConfig::new(40, 40)
            .with_diagonals(true)
            .with_prefab(vec![vec![1, 0], vec![0, 1]])
            .build()
            .unwrap();
        assert_eq!((map.width(), map.height()), (2, 2));
        assert!(map.diagonals());
        assert_eq!(
            map.neighbours(Position2D::ZERO).unwrap(),
            vec![Position2D::new(1, 1)]
        );
    }

    #[test]
    fn invalid_dimensions_surface() {
        assert_eq!(
            MapConfig::new(0, 3).build(),
            Err(MapError::InvalidDimensions {
                width: 0,
                height: 3
            })
        );
    }
}
