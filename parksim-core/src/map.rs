//! Tile grid and the per-tile records the park core reads and writes.
//!
//! The map is a square arena of [`Tile`]s indexed by tile coordinate; no
//! element holds a pointer to another. Only the land rights engine mutates
//! [`SurfaceElement::ownership`] and [`SurfaceElement::park_fences`].

use crate::coords::{CoordsXY, MapRange, COORDS_XY_STEP, COORDS_Z_STEP};
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, Not};

/// Largest supported map, in tiles per side.
pub const MAXIMUM_MAP_SIZE: i32 = 1001;

/// Land and construction-rights ownership bits of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Ownership(u8);

impl Ownership {
    pub const UNOWNED: Ownership = Ownership(0);
    pub const CONSTRUCTION_RIGHTS_OWNED: Ownership = Ownership(1 << 4);
    pub const OWNED: Ownership = Ownership(1 << 5);
    pub const CONSTRUCTION_RIGHTS_AVAILABLE: Ownership = Ownership(1 << 6);
    pub const AVAILABLE: Ownership = Ownership(1 << 7);

    pub const fn from_bits(bits: u8) -> Self {
        Ownership(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if any bit of `other` is set.
    pub const fn intersects(self, other: Ownership) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(self, other: Ownership) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_unowned(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Ownership {
    type Output = Ownership;
    fn bitor(self, rhs: Ownership) -> Ownership {
        Ownership(self.0 | rhs.0)
    }
}

impl BitAnd for Ownership {
    type Output = Ownership;
    fn bitand(self, rhs: Ownership) -> Ownership {
        Ownership(self.0 & rhs.0)
    }
}

impl Not for Ownership {
    type Output = Ownership;
    fn not(self) -> Ownership {
        Ownership(!self.0)
    }
}

/// Ground surface of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceElement {
    /// Height in height levels.
    pub base_height: u8,
    pub ownership: Ownership,
    /// Four-bit fence mask: W=8, N=4, E=2, S=1.
    pub park_fences: u8,
}

impl SurfaceElement {
    pub fn new(base_height: u8) -> Self {
        Self {
            base_height,
            ..Default::default()
        }
    }

    /// Height in world units.
    pub fn base_z(&self) -> i32 {
        self.base_height as i32 * COORDS_Z_STEP
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntranceKind {
    RideEntrance,
    RideExit,
    ParkEntrance,
}

/// Entrance or exit structure standing on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntranceElement {
    pub kind: EntranceKind,
    pub base_height: u8,
    /// Placement preview; not part of the built world.
    pub ghost: bool,
}

impl EntranceElement {
    pub fn park_entrance(base_height: u8) -> Self {
        Self {
            kind: EntranceKind::ParkEntrance,
            base_height,
            ghost: false,
        }
    }

    pub fn is_park_entrance(&self) -> bool {
        self.kind == EntranceKind::ParkEntrance
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    pub surface: Option<SurfaceElement>,
    pub entrances: Vec<EntranceElement>,
}

/// Square tile grid, `size` tiles per side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileMap {
    size: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Flat map with a surface on every tile at `base_height`.
    ///
    /// `size` is clamped to `0..=MAXIMUM_MAP_SIZE`.
    pub fn new(size: i32, base_height: u8) -> Self {
        let size = size.clamp(0, MAXIMUM_MAP_SIZE);
        let surface = Tile {
            surface: Some(SurfaceElement::new(base_height)),
            entrances: Vec::new(),
        };
        Self {
            size,
            tiles: vec![surface; (size * size) as usize],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Largest valid interior coordinate on each axis.
    pub fn size_max_xy(&self) -> i32 {
        (self.size - 1) * COORDS_XY_STEP - 1
    }

    fn index(&self, loc: CoordsXY) -> Option<usize> {
        if !self.is_location_valid(loc) {
            return None;
        }
        let (tx, ty) = loc.to_tile();
        Some((ty * self.size + tx) as usize)
    }

    pub fn is_location_valid(&self, loc: CoordsXY) -> bool {
        let limit = self.size * COORDS_XY_STEP;
        loc.x >= 0 && loc.y >= 0 && loc.x < limit && loc.y < limit
    }

    /// Border tiles never belong to a park.
    pub fn is_edge(&self, loc: CoordsXY) -> bool {
        let units = (self.size - 1) * COORDS_XY_STEP;
        loc.x < COORDS_XY_STEP || loc.y < COORDS_XY_STEP || loc.x >= units || loc.y >= units
    }

    /// Clamps a normalised range to the map interior.
    pub fn clamp_range(&self, range: MapRange) -> MapRange {
        let max = self.size_max_xy();
        MapRange {
            left: range.left.max(COORDS_XY_STEP),
            top: range.top.max(COORDS_XY_STEP),
            right: range.right.min(max),
            bottom: range.bottom.min(max),
        }
    }

    pub fn tile(&self, loc: CoordsXY) -> Option<&Tile> {
        self.index(loc).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, loc: CoordsXY) -> Option<&mut Tile> {
        self.index(loc).map(move |i| &mut self.tiles[i])
    }

    pub fn surface(&self, loc: CoordsXY) -> Option<&SurfaceElement> {
        self.tile(loc).and_then(|t| t.surface.as_ref())
    }

    pub fn surface_mut(&mut self, loc: CoordsXY) -> Option<&mut SurfaceElement> {
        self.tile_mut(loc).and_then(|t| t.surface.as_mut())
    }

    pub fn entrances(&self, loc: CoordsXY) -> &[EntranceElement] {
        self.tile(loc).map(|t| t.entrances.as_slice()).unwrap_or(&[])
    }

    /// Height of the surface under `loc` in world units (0 off-map).
    pub fn surface_height(&self, loc: CoordsXY) -> i32 {
        self.surface(loc).map(SurfaceElement::base_z).unwrap_or(0)
    }

    /// Owned land counts as inside the park.
    pub fn is_location_in_park(&self, loc: CoordsXY) -> bool {
        self.surface(loc)
            .is_some_and(|s| s.ownership.intersects(Ownership::OWNED))
    }

    /// Tiles carrying a built park entrance, in row-major order.
    pub fn park_entrances(&self) -> impl Iterator<Item = CoordsXY> + '_ {
        let size = self.size;
        self.tiles.iter().enumerate().filter_map(move |(i, tile)| {
            let i = i as i32;
            tile.entrances
                .iter()
                .any(|e| e.is_park_entrance() && !e.ghost)
                .then(|| CoordsXY::from_tile(i % size, i / size))
        })
    }

    /// Every surface in row-major order with its tile position.
    pub fn surfaces(&self) -> impl Iterator<Item = (CoordsXY, &SurfaceElement)> {
        let size = self.size;
        self.tiles.iter().enumerate().filter_map(move |(i, tile)| {
            let i = i as i32;
            tile.surface
                .as_ref()
                .map(|s| (CoordsXY::from_tile(i % size, i / size), s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_bits() {
        let o = Ownership::OWNED | Ownership::CONSTRUCTION_RIGHTS_AVAILABLE;
        assert!(o.intersects(Ownership::OWNED));
        assert!(!o.intersects(Ownership::AVAILABLE));
        assert_eq!((o & !Ownership::OWNED), Ownership::CONSTRUCTION_RIGHTS_AVAILABLE);
        assert_eq!(o.bits(), 0x60);
    }

    #[test]
    fn test_edges_and_validity() {
        let map = TileMap::new(8, 2);
        assert!(map.is_edge(CoordsXY::from_tile(0, 3)));
        assert!(map.is_edge(CoordsXY::from_tile(7, 3)));
        assert!(!map.is_edge(CoordsXY::from_tile(6, 6)));
        assert!(map.is_location_valid(CoordsXY::from_tile(7, 7)));
        assert!(!map.is_location_valid(CoordsXY::from_tile(8, 0)));
        assert!(!map.is_location_valid(CoordsXY::new(-1, 0)));
    }

    #[test]
    fn test_clamp_range_excludes_border() {
        let map = TileMap::new(8, 2);
        let clamped = map.clamp_range(MapRange::tiles(-5, 0, 20, 20));
        assert_eq!(clamped, MapRange::new(32, 32, 7 * 32 - 1, 7 * 32 - 1));
        let tiles: Vec<_> = clamped.iter_tiles().collect();
        assert_eq!(tiles.len(), 36);
        assert_eq!(tiles.last(), Some(&CoordsXY::from_tile(6, 6)));
    }

    #[test]
    fn test_new_clamps_size() {
        assert_eq!(TileMap::new(50_000, 0).size(), MAXIMUM_MAP_SIZE);
        assert_eq!(TileMap::new(-4, 0).size(), 0);
    }

    #[test]
    fn test_park_entrances_skip_ghosts() {
        let mut map = TileMap::new(8, 2);
        if let Some(tile) = map.tile_mut(CoordsXY::from_tile(5, 2)) {
            tile.entrances.push(EntranceElement::park_entrance(2));
        }
        if let Some(tile) = map.tile_mut(CoordsXY::from_tile(1, 3)) {
            tile.entrances.push(EntranceElement {
                ghost: true,
                ..EntranceElement::park_entrance(2)
            });
        }
        let gates: Vec<_> = map.park_entrances().collect();
        assert_eq!(gates, vec![CoordsXY::from_tile(5, 2)]);
    }

    #[test]
    fn test_surfaces_iterates_row_major() {
        let mut map = TileMap::new(3, 1);
        if let Some(tile) = map.tile_mut(CoordsXY::from_tile(1, 0)) {
            tile.surface = None;
        }
        let positions: Vec<_> = map.surfaces().map(|(c, _)| c).collect();
        assert_eq!(positions.len(), 8);
        assert_eq!(positions[1], CoordsXY::from_tile(2, 0));
    }
}
