//! Park boundary fences and land-rights bookkeeping.
//!
//! Fence bits on a surface mark which neighbours are inside the park:
//! west = 0x8, north = 0x4, east = 0x2, south = 0x1. Rendering and pathing
//! read these bits directly.

use crate::coords::{CoordsXY, COORDS_XY_STEP};
use crate::map::{EntranceKind, Ownership};
use crate::observer::{Notification, Panel};
use crate::state::GameState;
use tracing::instrument;

pub const FENCE_WEST: u8 = 0x8;
pub const FENCE_NORTH: u8 = 0x4;
pub const FENCE_EAST: u8 = 0x2;
pub const FENCE_SOUTH: u8 = 0x1;

/// Fence mask the tile at `loc` should carry given current ownership.
fn desired_fences(state: &GameState, loc: CoordsXY) -> u8 {
    let Some(surface) = state.map.surface(loc) else {
        return 0;
    };
    if surface.ownership.intersects(Ownership::OWNED) {
        return 0;
    }
    // Gates stand in the fence line
    let has_gate = state
        .map
        .entrances(loc)
        .iter()
        .any(|e| e.kind == EntranceKind::ParkEntrance && !e.ghost);
    if has_gate {
        return 0;
    }

    let in_park = |dx: i32, dy: i32| {
        state
            .map
            .is_location_in_park(CoordsXY::new(loc.x + dx, loc.y + dy))
    };
    let mut fences = 0;
    if in_park(-COORDS_XY_STEP, 0) {
        fences |= FENCE_WEST;
    }
    if in_park(0, -COORDS_XY_STEP) {
        fences |= FENCE_NORTH;
    }
    if in_park(COORDS_XY_STEP, 0) {
        fences |= FENCE_EAST;
    }
    if in_park(0, COORDS_XY_STEP) {
        fences |= FENCE_SOUTH;
    }
    fences
}

/// Recomputes the fence mask of one tile, writing only on change.
pub fn update_fences(state: &mut GameState, loc: CoordsXY) {
    if state.map.is_edge(loc) {
        return;
    }
    let fences = desired_fences(state, loc);
    let Some(surface) = state.map.surface_mut(loc) else {
        return;
    };
    if surface.park_fences != fences {
        surface.park_fences = fences;
        state.notifications.push(Notification::InvalidateTile(loc));
    }
}

/// Recomputes fences on a tile and its four neighbours.
pub fn update_fences_around_tile(state: &mut GameState, loc: CoordsXY) {
    update_fences(state, loc);
    update_fences(state, CoordsXY::new(loc.x + COORDS_XY_STEP, loc.y));
    update_fences(state, CoordsXY::new(loc.x - COORDS_XY_STEP, loc.y));
    update_fences(state, CoordsXY::new(loc.x, loc.y + COORDS_XY_STEP));
    update_fences(state, CoordsXY::new(loc.x, loc.y - COORDS_XY_STEP));
}

/// Refreshes the counts of unowned tiles offering land or construction
/// rights for sale.
pub fn count_remaining_land_rights(state: &mut GameState) {
    let mut land = 0;
    let mut construction = 0;
    for (_, surface) in state.map.surfaces() {
        let ownership = surface.ownership;
        if ownership.intersects(Ownership::OWNED) {
            continue;
        }
        if ownership.intersects(Ownership::AVAILABLE) {
            land += 1;
        } else if ownership.intersects(Ownership::CONSTRUCTION_RIGHTS_AVAILABLE)
            && !ownership.intersects(Ownership::CONSTRUCTION_RIGHTS_OWNED)
        {
            construction += 1;
        }
    }
    state.land_rights_for_sale = land;
    state.construction_rights_for_sale = construction;
}

/// Tiles with land or construction rights owned.
pub fn calculate_park_size(state: &GameState) -> u32 {
    state
        .map
        .surfaces()
        .filter(|(_, s)| {
            s.ownership
                .intersects(Ownership::OWNED | Ownership::CONSTRUCTION_RIGHTS_OWNED)
        })
        .count() as u32
}

/// Stores the park size, invalidating the info panel when it changed.
#[instrument(skip_all, name = "park_size")]
pub fn update_park_size(state: &mut GameState) -> u32 {
    let tiles = calculate_park_size(state);
    if tiles != state.park.size {
        log::debug!("Park size {} -> {} tiles", state.park.size, tiles);
        state.park.size = tiles;
        state.notifications.invalidate(Panel::ParkInformation);
    }
    tiles
}
