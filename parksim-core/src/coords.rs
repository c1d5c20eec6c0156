//! World coordinates, tile ranges and facing directions.
//!
//! Horizontal positions are in world units where one tile spans
//! [`COORDS_XY_STEP`] units. Heights use [`COORDS_Z_STEP`] units per
//! height level.

use serde::{Deserialize, Serialize};

/// World units per tile edge.
pub const COORDS_XY_STEP: i32 = 32;
/// World units per height level.
pub const COORDS_Z_STEP: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CoordsXY {
    pub x: i32,
    pub y: i32,
}

impl CoordsXY {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position of the tile at `(tx, ty)`.
    pub const fn from_tile(tx: i32, ty: i32) -> Self {
        Self {
            x: tx * COORDS_XY_STEP,
            y: ty * COORDS_XY_STEP,
        }
    }

    /// Snaps down to the tile corner.
    pub fn to_tile_start(self) -> Self {
        Self {
            x: self.x.div_euclid(COORDS_XY_STEP) * COORDS_XY_STEP,
            y: self.y.div_euclid(COORDS_XY_STEP) * COORDS_XY_STEP,
        }
    }

    /// Centre of the containing tile.
    pub fn to_tile_centre(self) -> Self {
        let start = self.to_tile_start();
        Self {
            x: start.x + COORDS_XY_STEP / 2,
            y: start.y + COORDS_XY_STEP / 2,
        }
    }

    /// Tile index pair.
    pub fn to_tile(self) -> (i32, i32) {
        (
            self.x.div_euclid(COORDS_XY_STEP),
            self.y.div_euclid(COORDS_XY_STEP),
        )
    }

    /// Neighbouring tile position one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoordsXYZ {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CoordsXYZ {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn xy(self) -> CoordsXY {
        CoordsXY {
            x: self.x,
            y: self.y,
        }
    }
}

/// One of the four cardinal facings.
///
/// `0` = west (−x), `1` = north (+y), `2` = east (+x), `3` = south (−y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Direction(u8);

impl Direction {
    pub const WEST: Direction = Direction(0);
    pub const NORTH: Direction = Direction(1);
    pub const EAST: Direction = Direction(2);
    pub const SOUTH: Direction = Direction(3);

    pub const ALL: [Direction; 4] = [Self::WEST, Self::NORTH, Self::EAST, Self::SOUTH];

    /// Wraps any value into the four facings.
    pub const fn new(raw: u8) -> Self {
        Direction(raw & 3)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn reverse(self) -> Self {
        Direction(self.0 ^ 2)
    }

    /// Offset in world units for a single tile step.
    pub const fn delta(self) -> (i32, i32) {
        match self.0 {
            0 => (-COORDS_XY_STEP, 0),
            1 => (0, COORDS_XY_STEP),
            2 => (COORDS_XY_STEP, 0),
            _ => (0, -COORDS_XY_STEP),
        }
    }
}

/// Axis-aligned rectangle of world coordinates, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapRange {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl MapRange {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Single-point range.
    pub const fn point(at: CoordsXY) -> Self {
        Self::new(at.x, at.y, at.x, at.y)
    }

    /// Range covering tiles `(tx0, ty0)..=(tx1, ty1)`.
    pub const fn tiles(tx0: i32, ty0: i32, tx1: i32, ty1: i32) -> Self {
        Self::new(
            tx0 * COORDS_XY_STEP,
            ty0 * COORDS_XY_STEP,
            tx1 * COORDS_XY_STEP,
            ty1 * COORDS_XY_STEP,
        )
    }

    /// Swaps corners so that `left <= right` and `top <= bottom`.
    pub fn normalise(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    /// Tile positions covered by the range, row by row, stepping one tile.
    pub fn iter_tiles(self) -> impl Iterator<Item = CoordsXY> {
        let MapRange {
            left,
            top,
            right,
            bottom,
        } = self;
        (top..=bottom)
            .step_by(COORDS_XY_STEP as usize)
            .flat_map(move |y| {
                (left..=right)
                    .step_by(COORDS_XY_STEP as usize)
                    .map(move |x| CoordsXY::new(x, y))
            })
    }

    pub fn centre(self) -> CoordsXY {
        CoordsXY::new(
            (self.left + self.right) / 2 + COORDS_XY_STEP / 2,
            (self.top + self.bottom) / 2 + COORDS_XY_STEP / 2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_swaps_corners() {
        let r = MapRange::new(96, 64, 32, 128).normalise();
        assert_eq!(r, MapRange::new(32, 64, 96, 128));
    }

    #[test]
    fn test_iter_tiles_row_major() {
        let tiles: Vec<_> = MapRange::tiles(1, 1, 2, 2).iter_tiles().collect();
        assert_eq!(
            tiles,
            vec![
                CoordsXY::from_tile(1, 1),
                CoordsXY::from_tile(2, 1),
                CoordsXY::from_tile(1, 2),
                CoordsXY::from_tile(2, 2),
            ]
        );
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        let r = MapRange::new(64, 64, 32, 32);
        assert_eq!(r.iter_tiles().count(), 0);
    }

    #[test]
    fn test_direction_reverse_and_delta() {
        assert_eq!(Direction::WEST.reverse(), Direction::EAST);
        assert_eq!(Direction::NORTH.reverse(), Direction::SOUTH);
        assert_eq!(Direction::new(7), Direction::SOUTH);
        assert_eq!(Direction::SOUTH.delta(), (0, -32));
    }

    #[test]
    fn test_tile_centre() {
        assert_eq!(
            CoordsXY::new(70, 33).to_tile_centre(),
            CoordsXY::new(80, 48)
        );
        assert_eq!(CoordsXY::new(70, 33).to_tile(), (2, 1));
    }
}
