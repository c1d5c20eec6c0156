//! Buying, selling and editing land and construction rights over a range.
//!
//! Tiles are handled one at a time. A tile that fails (no surface, unknown
//! setting) is skipped and contributes no cost; the rest of the range still
//! applies.

use super::{ActionFlags, ActionKind, ActionResult, GameAction, ParameterVisitor, StringId};
use crate::coords::{CoordsXY, CoordsXYZ, MapRange};
use crate::finance::ExpenditureType;
use crate::map::{EntranceKind, Ownership};
use crate::money::Money;
use crate::observer::{Notification, SoundId};
use crate::state::GameState;
use crate::systems::land_rights::{count_remaining_land_rights, update_fences_around_tile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LandSetRightsSetting {
    UnownLand = 0,
    UnownConstructionRights = 1,
    SetForSale = 2,
    SetConstructionRightsForSale = 3,
    SetOwnershipWithChecks = 4,
}

impl LandSetRightsSetting {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::UnownLand),
            1 => Some(Self::UnownConstructionRights),
            2 => Some(Self::SetForSale),
            3 => Some(Self::SetConstructionRightsForSale),
            4 => Some(Self::SetOwnershipWithChecks),
            _ => None,
        }
    }
}

/// Settings and masks are stored as received so out-of-range values from
/// the wire reach validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LandSetRightsAction {
    pub range: MapRange,
    pub setting: u8,
    pub ownership: u8,
}

/// What a passing tile will do on execute.
enum TilePlan {
    /// Valid, but nothing changes.
    Keep,
    Apply { cost: Money },
}

impl LandSetRightsAction {
    pub fn new(range: MapRange, setting: LandSetRightsSetting, ownership: Ownership) -> Self {
        Self::from_raw(range, setting as u8, ownership.bits())
    }

    pub fn at(loc: CoordsXY, setting: LandSetRightsSetting, ownership: Ownership) -> Self {
        Self::new(MapRange::point(loc), setting, ownership)
    }

    pub fn from_raw(range: MapRange, setting: u8, ownership: u8) -> Self {
        Self {
            range,
            setting,
            ownership,
        }
    }

    fn valid_range(&self, state: &GameState) -> MapRange {
        state.map.clamp_range(self.range.normalise())
    }

    fn base_result(&self, state: &GameState, range: MapRange) -> ActionResult {
        let centre = range.centre();
        ActionResult {
            position: Some(CoordsXYZ::new(
                centre.x,
                centre.y,
                state.map.surface_height(centre),
            )),
            expenditure: Some(ExpenditureType::LandPurchase),
            ..ActionResult::ok()
        }
    }

    /// Per-tile validation. Pure; shared by query and execute.
    fn plan_tile(&self, state: &GameState, loc: CoordsXY) -> Result<TilePlan, ActionResult> {
        let Some(surface) = state.map.surface(loc) else {
            log::warn!("Could not find surface. x = {}, y = {}", loc.x, loc.y);
            return Err(ActionResult::invalid_parameter(
                StringId::ErrSurfaceElementNotFound,
            ));
        };

        let Some(setting) = LandSetRightsSetting::from_raw(self.setting) else {
            log::warn!(
                "Tried calling set land rights with an incorrect setting. setting = {}",
                self.setting
            );
            return Err(ActionResult::invalid_parameter(StringId::ErrValueOutOfRange));
        };

        if setting != LandSetRightsSetting::SetOwnershipWithChecks {
            return Ok(TilePlan::Apply { cost: Money::ZERO });
        }

        let ownership = Ownership::from_bits(self.ownership);
        if ownership == surface.ownership {
            return Ok(TilePlan::Keep);
        }

        let park_entrances = state
            .map
            .entrances(loc)
            .iter()
            .filter(|e| e.kind == EntranceKind::ParkEntrance);
        for entrance in park_entrances {
            // The gate tile itself can never be bought outright
            if ownership == Ownership::OWNED || ownership == Ownership::AVAILABLE {
                return Ok(TilePlan::Keep);
            }
            // Construction rights only when the gate sits on the surface
            if ownership == Ownership::CONSTRUCTION_RIGHTS_OWNED
                || ownership == Ownership::CONSTRUCTION_RIGHTS_AVAILABLE
            {
                let entrance_h = entrance.base_height as i32;
                let surface_h = surface.base_height as i32;
                if entrance_h - 3 > surface_h || entrance_h < surface_h {
                    return Ok(TilePlan::Keep);
                }
            }
        }

        Ok(TilePlan::Apply {
            cost: state.park.land_price,
        })
    }

    fn apply_tile(&self, state: &mut GameState, loc: CoordsXY) {
        let Some(setting) = LandSetRightsSetting::from_raw(self.setting) else {
            return;
        };
        let Some(surface) = state.map.surface_mut(loc) else {
            return;
        };

        match setting {
            LandSetRightsSetting::UnownLand => {
                surface.ownership = surface.ownership
                    & !(Ownership::OWNED | Ownership::CONSTRUCTION_RIGHTS_OWNED);
                update_fences_around_tile(state, loc);
            }
            LandSetRightsSetting::UnownConstructionRights => {
                surface.ownership = surface.ownership & !Ownership::CONSTRUCTION_RIGHTS_OWNED;
                state.notifications.push(Notification::InvalidateTile(loc));
            }
            LandSetRightsSetting::SetForSale => {
                surface.ownership = surface.ownership | Ownership::AVAILABLE;
                state.notifications.push(Notification::InvalidateTile(loc));
            }
            LandSetRightsSetting::SetConstructionRightsForSale => {
                surface.ownership = surface.ownership | Ownership::CONSTRUCTION_RIGHTS_AVAILABLE;
                state.notifications.push(Notification::InvalidateTile(loc));
            }
            LandSetRightsSetting::SetOwnershipWithChecks => {
                let ownership = Ownership::from_bits(self.ownership);
                surface.ownership = ownership;
                if !ownership.is_unowned() {
                    state.peep_spawns.retain(|spawn| !spawn.is_on_tile(loc));
                }
                update_fences_around_tile(state, loc);
            }
        }
    }
}

impl GameAction for LandSetRightsAction {
    fn kind(&self) -> ActionKind {
        ActionKind::LandSetRights
    }

    fn flags(&self) -> ActionFlags {
        ActionFlags::EDITOR_ONLY
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        visitor.visit_range(&mut self.range);
        visitor.visit_u8("setting", &mut self.setting);
        visitor.visit_u8("ownership", &mut self.ownership);
    }

    fn query(&self, state: &GameState) -> ActionResult {
        let range = self.valid_range(state);
        let mut result = self.base_result(state, range);
        for loc in range.iter_tiles() {
            if !state.map.is_location_valid(loc) {
                continue;
            }
            if let Ok(TilePlan::Apply { cost }) = self.plan_tile(state, loc) {
                result.cost += cost;
            }
        }
        result
    }

    fn execute(&self, state: &mut GameState) -> ActionResult {
        let range = self.valid_range(state);
        let mut result = self.base_result(state, range);
        for loc in range.iter_tiles() {
            if !state.map.is_location_valid(loc) {
                continue;
            }
            if let Ok(TilePlan::Apply { cost }) = self.plan_tile(state, loc) {
                self.apply_tile(state, loc);
                result.cost += cost;
            }
        }

        count_remaining_land_rights(state);
        if let Some(position) = result.position {
            state.notifications.push(Notification::Sound {
                id: SoundId::PlaceItem,
                position,
            });
        }
        result
    }
}
