use crate::coords::{CoordsXY, Direction, MapRange};
use crate::entities::{Guest, GuestState, PeepSpawn};
use crate::management::{CampaignKind, MarketingCampaign};
use crate::map::{EntranceElement, Ownership, TileMap};
use crate::money::Money;
use crate::park::ParkFlags;
use crate::ride::{LifecycleFlags, Ride, RideId, RideStatus, RideTypeTraits};
use crate::rng::ScenarioRng;
use crate::state::{GameState, ScreenMode};

/// Default map edge length for fixtures, in tiles.
const DEFAULT_MAP_SIZE: i32 = 16;
/// Default surface height for fixtures, in height levels.
const DEFAULT_SURFACE_HEIGHT: u8 = 2;

/// Fluent fixture builder for [`GameState`].
///
/// Starts from a flat, unowned map with a money-less, closed park.
pub struct GameStateBuilder {
    state: GameState,
}

impl GameStateBuilder {
    pub fn new() -> Self {
        Self {
            state: GameState::new(TileMap::new(DEFAULT_MAP_SIZE, DEFAULT_SURFACE_HEIGHT), 0),
        }
    }

    /// Replaces the map with a fresh flat one. Call before placing anything.
    pub fn map_size(mut self, size: i32) -> Self {
        self.state.map = TileMap::new(size, DEFAULT_SURFACE_HEIGHT);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.state.rng = ScenarioRng::from_seed_u64(seed);
        self
    }

    /// Owns every tile in the inclusive tile rectangle.
    pub fn with_owned_tiles(self, tx0: i32, ty0: i32, tx1: i32, ty1: i32) -> Self {
        self.with_ownership(tx0, ty0, tx1, ty1, Ownership::OWNED)
    }

    /// Sets the ownership mask of every tile in the inclusive tile rectangle.
    pub fn with_ownership(
        mut self,
        tx0: i32,
        ty0: i32,
        tx1: i32,
        ty1: i32,
        ownership: Ownership,
    ) -> Self {
        for loc in MapRange::tiles(tx0, ty0, tx1, ty1).iter_tiles() {
            if let Some(surface) = self.state.map.surface_mut(loc) {
                surface.ownership = ownership;
            }
        }
        self
    }

    /// Places a park entrance at `base_height` on tile (`tx`, `ty`).
    pub fn with_park_entrance(mut self, tx: i32, ty: i32, base_height: u8) -> Self {
        if let Some(tile) = self.state.map.tile_mut(CoordsXY::from_tile(tx, ty)) {
            tile.entrances.push(EntranceElement::park_entrance(base_height));
        }
        self
    }

    /// Adds a west-facing spawn point at world coordinates.
    pub fn with_peep_spawn(mut self, x: i32, y: i32, z: i32) -> Self {
        self.state.peep_spawns.push(PeepSpawn {
            x,
            y,
            z,
            direction: Direction::WEST,
        });
        self
    }

    /// Adds a ride that cost `cost_gbp` pounds to build.
    pub fn with_ride(mut self, id: RideId, cost_gbp: i64, open: bool) -> Self {
        let mut ride = Ride::new(id, format!("Ride {id}"), RideTypeTraits::default());
        ride.construction_cost = Money::gbp(cost_gbp);
        ride.status = if open {
            RideStatus::Open
        } else {
            RideStatus::Closed
        };
        self.state.rides.insert(id, ride);
        self
    }

    pub fn indestructible_ride(mut self, id: RideId) -> Self {
        if let Some(ride) = self.state.rides.get_mut(&id) {
            ride.lifecycle.insert(LifecycleFlags::INDESTRUCTIBLE);
        }
        self
    }

    pub fn with_campaign(mut self, kind: CampaignKind) -> Self {
        self.state.campaigns.push(MarketingCampaign {
            kind,
            weeks_left: 4,
            ride_id: None,
        });
        self
    }

    /// Adds a free-ride campaign targeting `ride`.
    pub fn with_campaign_for_ride(mut self, ride: RideId) -> Self {
        self.state.campaigns.push(MarketingCampaign {
            kind: CampaignKind::RideFree,
            weeks_left: 4,
            ride_id: Some(ride),
        });
        self
    }

    /// Enables money and sets the starting cash.
    pub fn with_money(mut self, cash: Money) -> Self {
        self.state.park.flags.remove(ParkFlags::NO_MONEY);
        self.state.finance.cash = cash;
        self
    }

    pub fn free_entry(mut self) -> Self {
        self.state.park.flags.insert(ParkFlags::PARK_FREE_ENTRY);
        self
    }

    pub fn open(mut self) -> Self {
        self.state.park.flags.insert(ParkFlags::PARK_OPEN);
        self
    }

    pub fn editor(mut self) -> Self {
        self.state.screen = ScreenMode::Editor;
        self
    }

    pub fn sandbox(mut self) -> Self {
        self.state.cheats.sandbox_mode = true;
        self
    }

    pub fn paused(mut self) -> Self {
        self.state.paused = true;
        self
    }

    /// Admits `count` guests with the given happiness and counts them in.
    pub fn with_guests_in_park(mut self, count: u32, happiness: u8) -> Self {
        let location = crate::coords::CoordsXYZ::new(
            DEFAULT_MAP_SIZE / 2 * 32,
            DEFAULT_MAP_SIZE / 2 * 32,
            DEFAULT_SURFACE_HEIGHT as i32 * 8,
        );
        for _ in 0..count {
            let id = self.state.next_guest_id;
            self.state.next_guest_id += 1;
            self.state.guests.push(Guest {
                id,
                location,
                direction: Direction::WEST,
                orientation: 0,
                destination: location.xy(),
                destination_tolerance: 0,
                state: GuestState::Walking,
                outside_of_park: false,
                happiness,
                leaving_park: false,
                lost_countdown: 0,
                cash: self.state.park.guest_initial_cash,
                hunger: self.state.park.guest_initial_hunger,
                thirst: self.state.park.guest_initial_thirst,
                campaign: None,
            });
        }
        self.state.park.guests_in_park += count;
        self
    }

    pub fn build(self) -> GameState {
        self.state
    }
}

impl Default for GameStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let state = GameStateBuilder::default()
            .map_size(8)
            .with_owned_tiles(2, 2, 3, 4)
            .with_park_entrance(5, 5, 3)
            .with_ride(1, 500, true)
            .indestructible_ride(1)
            .with_guests_in_park(3, 200)
            .with_money(Money::gbp(20))
            .build();

        assert_eq!(state.map.size(), 8);
        let owned = state
            .map
            .surfaces()
            .filter(|(_, s)| s.ownership == Ownership::OWNED)
            .count();
        assert_eq!(owned, 6);
        assert!(state.map.entrances(CoordsXY::from_tile(5, 5))[0].is_park_entrance());
        assert!(state.rides[&1]
            .lifecycle
            .contains(LifecycleFlags::INDESTRUCTIBLE));
        assert_eq!(state.park.guests_in_park, 3);
        assert_eq!(state.guests.len(), 3);
        assert!(state.park.has_money());
        assert_eq!(state.finance.cash, Money::gbp(20));
    }

    #[test]
    fn test_seed_changes_rng() {
        let a = GameStateBuilder::new().seed(1).build();
        let b = GameStateBuilder::new().seed(2).build();
        assert_ne!(a.rng, b.rng);
        assert_eq!(a.rng, GameStateBuilder::new().seed(1).build().rng);
    }
}
