//! Guests, litter and guest spawn points.

use crate::coords::{CoordsXY, CoordsXYZ, Direction};
use crate::management::CampaignKind;
use crate::money::Money;
use serde::{Deserialize, Serialize};

pub type GuestId = u32;

/// Happiness above which a guest counts as happy for the park rating.
pub const HAPPY_THRESHOLD: u8 = 128;

/// Guests leaving the park count as lost below this countdown.
pub const LOST_COUNTDOWN_THRESHOLD: u8 = 90;

/// Litter older than this many ticks hurts the park rating.
pub const LITTER_RATING_AGE: u32 = 7680;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestState {
    EnteringPark,
    Walking,
    LeavingPark,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub location: CoordsXYZ,
    pub direction: Direction,
    /// Sprite facing, `direction << 3`.
    pub orientation: u8,
    pub destination: CoordsXY,
    pub destination_tolerance: u8,
    pub state: GuestState,
    pub outside_of_park: bool,
    pub happiness: u8,
    /// Set once the guest has decided to go home.
    pub leaving_park: bool,
    /// Counts down while a leaving guest fails to find the exit.
    pub lost_countdown: u8,
    pub cash: Money,
    pub hunger: u8,
    pub thirst: u8,
    /// Campaign that brought this guest, if any.
    pub campaign: Option<CampaignKind>,
}

impl Guest {
    pub fn is_happy(&self) -> bool {
        self.happiness > HAPPY_THRESHOLD
    }

    /// Inside the park, heading home, and unable to find the way out.
    pub fn is_lost(&self) -> bool {
        !self.outside_of_park
            && self.leaving_park
            && self.lost_countdown < LOST_COUNTDOWN_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Litter {
    pub location: CoordsXYZ,
    pub created_tick: u32,
}

impl Litter {
    pub fn age(&self, current_tick: u32) -> u32 {
        current_tick.wrapping_sub(self.created_tick)
    }
}

/// Map location where new guests appear, facing `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeepSpawn {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub direction: Direction,
}

impl PeepSpawn {
    pub fn location(&self) -> CoordsXYZ {
        CoordsXYZ::new(self.x, self.y, self.z)
    }

    /// True if the spawn sits anywhere on the tile starting at `tile`.
    pub fn is_on_tile(&self, tile: CoordsXY) -> bool {
        CoordsXY::new(self.x, self.y).to_tile_start() == tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_on_tile_floors_coordinates() {
        let spawn = PeepSpawn {
            x: 70,
            y: 95,
            z: 16,
            direction: Direction::NORTH,
        };
        assert!(spawn.is_on_tile(CoordsXY::new(64, 64)));
        assert!(!spawn.is_on_tile(CoordsXY::new(96, 64)));
    }

    #[test]
    fn test_litter_age() {
        let litter = Litter {
            location: CoordsXYZ::default(),
            created_tick: 100,
        };
        assert_eq!(litter.age(7780), 7680);
    }
}
