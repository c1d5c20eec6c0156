//! Simulation settings and scenario files.
//!
//! A scenario is a JSON document describing the starting park and a
//! script of actions to submit at given ticks:
//!
//! ```json
//! {
//!   "name": "Forest Frontiers",
//!   "seed": 7,
//!   "map_size": 32,
//!   "owned": [{ "x1": 4, "y1": 4, "x2": 12, "y2": 12 }],
//!   "peep_spawns": [{ "x": 144, "y": 400, "z": 16, "direction": 1 }],
//!   "park": { "money": true, "cash": 100000, "open": true },
//!   "actions": [{ "tick": 10, "action": { "type": "park_set_entrance_fee", "fee": 150 } }]
//! }
//! ```
//!
//! Money fields are in tenths of a pound.

use crate::actions::Action;
use crate::coords::{CoordsXY, Direction, MapRange};
use crate::entities::PeepSpawn;
use crate::management::{Award, AwardKind, CampaignKind, MarketingCampaign};
use crate::map::{EntranceElement, Ownership, TileMap, MAXIMUM_MAP_SIZE};
use crate::money::Money;
use crate::park::{calculate_guest_initial_happiness, ParkFlags};
use crate::ride::{
    LifecycleFlags, Ride, RideId, RideStatus, RideTypeTraits, RIDE_RATING_UNDEFINED,
    RIDE_VALUE_UNDEFINED,
};
use crate::state::{GameState, ScreenMode};
use crate::systems;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Compute checksum every N ticks (0 = disabled).
    ///
    /// Recommended values:
    /// - `1`: Every tick (safest)
    /// - `4096`: Every week (balanced)
    /// - `16384`: Every month (lowest overhead)
    pub checksum_frequency: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Weekly checksums
            checksum_frequency: 4096,
        }
    }
}

impl SimConfig {
    pub fn checksum_due(&self, tick: u32) -> bool {
        self.checksum_frequency != 0 && tick % self.checksum_frequency == 0
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Inclusive tile rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl TileRect {
    fn range(&self) -> MapRange {
        MapRange::tiles(self.x1, self.y1, self.x2, self.y2).normalise()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntranceConfig {
    pub x: i32,
    pub y: i32,
    /// Height level; defaults to the surface height.
    #[serde(default)]
    pub height: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// 0 = west, 1 = north, 2 = east, 3 = south.
    #[serde(default)]
    pub direction: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    pub name: String,
    pub open: bool,
    pub money: bool,
    pub cash: Money,
    pub loan: Money,
    pub entrance_fee: Money,
    pub land_price: Money,
    pub construction_rights_price: Money,
    pub free_entry: bool,
    pub unlock_all_prices: bool,
    pub difficult_guest_generation: bool,
    pub difficult_park_rating: bool,
    /// Percentage of guests that start happy.
    pub guest_happiness_percent: u8,
}

impl Default for ParkConfig {
    fn default() -> Self {
        Self {
            name: "Unnamed Park".to_string(),
            open: false,
            money: false,
            cash: Money::gbp(10_000),
            loan: Money::ZERO,
            entrance_fee: Money::gbp(10),
            land_price: Money::gbp(90),
            construction_rights_price: Money::gbp(40),
            free_entry: false,
            unlock_all_prices: false,
            difficult_guest_generation: false,
            difficult_park_rating: false,
            guest_happiness_percent: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideConfig {
    pub id: RideId,
    pub name: String,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub construction_cost: Money,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub value: Option<u16>,
    /// Hundredths, e.g. 650 for 6.50.
    #[serde(default)]
    pub excitement: Option<i16>,
    #[serde(default)]
    pub intensity: Option<i16>,
    #[serde(default)]
    pub bonus_value: u32,
    #[serde(default)]
    pub customers: u16,
    #[serde(default)]
    pub indestructible: bool,
}

impl RideConfig {
    fn build(&self) -> Ride {
        let traits = RideTypeTraits {
            bonus_value: self.bonus_value,
            ..Default::default()
        };
        let mut ride = Ride::new(self.id, self.name.clone(), traits);
        ride.status = if self.open {
            RideStatus::Open
        } else {
            RideStatus::Closed
        };
        ride.construction_cost = self.construction_cost;
        ride.price = self.price;
        ride.value = self.value.unwrap_or(RIDE_VALUE_UNDEFINED);
        ride.excitement = self.excitement.unwrap_or(RIDE_RATING_UNDEFINED);
        ride.intensity = self.intensity.unwrap_or(RIDE_RATING_UNDEFINED);
        ride.num_customers[0] = self.customers;
        if self.indestructible {
            ride.lifecycle.insert(LifecycleFlags::INDESTRUCTIBLE);
        }
        ride
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub kind: CampaignKind,
    #[serde(default = "default_campaign_weeks")]
    pub weeks: u16,
    #[serde(default)]
    pub ride: Option<RideId>,
}

fn default_campaign_weeks() -> u16 {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub tick: u32,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMode {
    #[default]
    Playing,
    Editor,
}

fn default_map_size() -> i32 {
    32
}

fn default_surface_height() -> u8 {
    2
}

/// Starting park plus scripted actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_map_size")]
    pub map_size: i32,
    #[serde(default = "default_surface_height")]
    pub surface_height: u8,
    #[serde(default)]
    pub mode: ScenarioMode,
    #[serde(default)]
    pub sandbox: bool,
    #[serde(default)]
    pub park: ParkConfig,
    #[serde(default)]
    pub owned: Vec<TileRect>,
    #[serde(default)]
    pub for_sale: Vec<TileRect>,
    #[serde(default)]
    pub construction_rights_for_sale: Vec<TileRect>,
    #[serde(default)]
    pub park_entrances: Vec<EntranceConfig>,
    #[serde(default)]
    pub peep_spawns: Vec<SpawnConfig>,
    #[serde(default)]
    pub rides: Vec<RideConfig>,
    #[serde(default)]
    pub awards: Vec<AwardKind>,
    #[serde(default)]
    pub campaigns: Vec<CampaignConfig>,
    #[serde(default)]
    pub actions: Vec<ScheduledAction>,
}

impl ScenarioConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!(
            "Loaded scenario '{}' from {} ({} scripted actions)",
            config.name,
            path.display(),
            config.actions.len()
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size < 3 {
            return Err(ConfigError::Invalid(format!(
                "map_size {} is too small, need at least 3",
                self.map_size
            )));
        }
        if self.map_size > MAXIMUM_MAP_SIZE {
            return Err(ConfigError::Invalid(format!(
                "map_size {} is too large, at most {} is supported",
                self.map_size, MAXIMUM_MAP_SIZE
            )));
        }
        let mut ids: Vec<RideId> = self.rides.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid(format!("duplicate ride id {}", pair[0])));
        }
        Ok(())
    }

    /// Actions scheduled for `tick`, in file order.
    pub fn actions_at(&self, tick: u32) -> Vec<Action> {
        self.actions
            .iter()
            .filter(|scheduled| scheduled.tick == tick)
            .map(|scheduled| scheduled.action.clone())
            .collect()
    }

    /// Last tick with a scripted action, if any.
    pub fn last_action_tick(&self) -> Option<u32> {
        self.actions.iter().map(|scheduled| scheduled.tick).max()
    }

    /// Builds the starting state with every derived figure computed.
    pub fn build_state(&self) -> GameState {
        let mut state = GameState::new(TileMap::new(self.map_size, self.surface_height), self.seed);

        let mut apply = |rects: &[TileRect], ownership: Ownership| {
            for rect in rects {
                for loc in state.map.clamp_range(rect.range()).iter_tiles() {
                    if let Some(surface) = state.map.surface_mut(loc) {
                        surface.ownership = surface.ownership | ownership;
                    }
                }
            }
        };
        apply(&self.owned, Ownership::OWNED);
        apply(&self.for_sale, Ownership::AVAILABLE);
        apply(
            &self.construction_rights_for_sale,
            Ownership::CONSTRUCTION_RIGHTS_AVAILABLE,
        );

        for entrance in &self.park_entrances {
            let height = entrance.height.unwrap_or(self.surface_height);
            if let Some(tile) = state.map.tile_mut(CoordsXY::from_tile(entrance.x, entrance.y)) {
                tile.entrances.push(EntranceElement::park_entrance(height));
            } else {
                log::warn!("Park entrance at ({}, {}) is off the map", entrance.x, entrance.y);
            }
        }

        state.peep_spawns = self
            .peep_spawns
            .iter()
            .map(|spawn| PeepSpawn {
                x: spawn.x,
                y: spawn.y,
                z: spawn.z,
                direction: Direction::new(spawn.direction),
            })
            .collect();

        self.apply_park(&mut state);

        for ride in &self.rides {
            state.rides.insert(ride.id, ride.build());
        }
        state.awards = self.awards.iter().map(|&kind| Award::new(kind)).collect();
        state.campaigns = self
            .campaigns
            .iter()
            .map(|c| MarketingCampaign {
                kind: c.kind,
                weeks_left: c.weeks,
                ride_id: c.ride,
            })
            .collect();

        state.screen = match self.mode {
            ScenarioMode::Playing => ScreenMode::Playing,
            ScenarioMode::Editor => ScreenMode::Editor,
        };
        state.cheats.sandbox_mode = self.sandbox;

        let tiles: Vec<CoordsXY> = state.map.surfaces().map(|(loc, _)| loc).collect();
        for loc in tiles {
            systems::update_fences(&mut state, loc);
        }
        systems::count_remaining_land_rights(&mut state);
        state.park.size = systems::calculate_park_size(&state);
        systems::update_core_metrics(&mut state);
        state.notifications.clear();
        state
    }

    fn apply_park(&self, state: &mut GameState) {
        let config = &self.park;
        let park = &mut state.park;
        park.name = config.name.clone();

        let toggles = [
            (config.open, ParkFlags::PARK_OPEN),
            (!config.money, ParkFlags::NO_MONEY),
            (config.free_entry, ParkFlags::PARK_FREE_ENTRY),
            (config.unlock_all_prices, ParkFlags::UNLOCK_ALL_PRICES),
            (
                config.difficult_guest_generation,
                ParkFlags::DIFFICULT_GUEST_GENERATION,
            ),
            (config.difficult_park_rating, ParkFlags::DIFFICULT_PARK_RATING),
        ];
        for (enabled, flag) in toggles {
            if enabled {
                park.flags.insert(flag);
            } else {
                park.flags.remove(flag);
            }
        }

        park.entrance_fee = config.entrance_fee;
        park.land_price = config.land_price;
        park.construction_rights_price = config.construction_rights_price;
        park.guest_initial_happiness =
            calculate_guest_initial_happiness(config.guest_happiness_percent);

        state.finance.cash = config.cash;
        state.finance.bank_loan = config.loan;
    }
}
