use crate::entities::{Guest, GuestId, GuestState, Litter, PeepSpawn};
use crate::finance::Finance;
use crate::management::{Award, MarketingCampaign};
use crate::map::TileMap;
use crate::observer::{Intent, NotificationQueue};
use crate::park::Park;
use crate::ride::{Ride, RideId};
use crate::rng::ScenarioRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Amount `month_ticks` advances per simulation tick.
pub const MONTH_TICKS_INCREMENT: u16 = 4;

/// The park season runs March through October.
pub const MONTHS_PER_YEAR: u32 = 8;

const DAYS_IN_MONTH: [u8; MONTHS_PER_YEAR as usize] = [31, 30, 31, 30, 31, 31, 30, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Date {
    /// Fraction of the current month elapsed, wrapping at 0x10000.
    pub month_ticks: u16,
    pub months_elapsed: u32,
    /// Zero-based day of the month.
    pub day: u8,
}

/// Calendar boundaries crossed by a single [`Date::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateEvents {
    pub day_start: bool,
    pub week_start: bool,
    pub month_start: bool,
}

impl Date {
    /// Zero-based month of the season (0 = March).
    pub fn month(&self) -> u8 {
        (self.months_elapsed % MONTHS_PER_YEAR) as u8
    }

    /// One-based year.
    pub fn year(&self) -> u32 {
        self.months_elapsed / MONTHS_PER_YEAR + 1
    }

    pub fn days_in_month(&self) -> u8 {
        DAYS_IN_MONTH[self.month() as usize]
    }

    pub fn is_week_start(&self) -> bool {
        self.month_ticks & 0x3FFF == 0
    }

    /// Advances one tick and reports which boundaries were crossed.
    pub fn update(&mut self) -> DateEvents {
        let (month_ticks, wrapped) = self.month_ticks.overflowing_add(MONTH_TICKS_INCREMENT);
        self.month_ticks = month_ticks;

        let mut events = DateEvents {
            week_start: self.is_week_start(),
            ..Default::default()
        };

        if wrapped {
            self.months_elapsed += 1;
            self.day = 0;
            events.month_start = true;
            events.day_start = true;
            return events;
        }

        let day = ((month_ticks as u32 * self.days_in_month() as u32) >> 16) as u8;
        if day != self.day {
            self.day = day;
            events.day_start = true;
        }
        events
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cheats {
    /// Lets editor-only actions run during normal play.
    pub sandbox_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenMode {
    #[default]
    Playing,
    Editor,
}

/// Authoritative simulation state, passed explicitly to every action and
/// system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    pub current_ticks: u32,
    pub date: Date,
    pub map: TileMap,
    pub park: Park,
    pub finance: Finance,
    pub guests: Vec<Guest>,
    pub next_guest_id: GuestId,
    pub litter: Vec<Litter>,
    /// Keyed by id so iteration order is deterministic.
    pub rides: BTreeMap<RideId, Ride>,
    /// Registration order.
    pub awards: Vec<Award>,
    pub campaigns: Vec<MarketingCampaign>,
    pub peep_spawns: Vec<PeepSpawn>,
    pub cheats: Cheats,
    pub screen: ScreenMode,
    pub paused: bool,
    pub rng: ScenarioRng,
    pub land_rights_for_sale: u32,
    pub construction_rights_for_sale: u32,
    /// Pending side effects for observers. Not part of the simulation.
    #[serde(skip)]
    pub notifications: NotificationQueue,
}

impl GameState {
    pub fn new(map: TileMap, seed: u64) -> Self {
        Self {
            map,
            rng: ScenarioRng::from_seed_u64(seed),
            ..Default::default()
        }
    }

    pub fn is_editor(&self) -> bool {
        self.screen == ScreenMode::Editor
    }

    pub fn guest(&self, id: GuestId) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == id)
    }

    /// Moves a guest that has reached the gate into the park.
    ///
    /// Called by the arrival system once the entrance fee is paid.
    ///
    /// Returns `false` if the guest does not exist or is already inside.
    pub fn admit_guest(&mut self, id: GuestId) -> bool {
        let Some(guest) = self.guests.iter_mut().find(|g| g.id == id) else {
            return false;
        };
        if !guest.outside_of_park {
            return false;
        }
        guest.outside_of_park = false;
        guest.state = GuestState::Walking;

        self.park.guests_heading_for_park = self.park.guests_heading_for_park.saturating_sub(1);
        self.park.guests_in_park = self.park.guests_in_park.saturating_add(1);
        self.notifications.broadcast(Intent::UpdateGuestCount);
        true
    }

    /// Computes a checksum of the simulation state for desync detection.
    ///
    /// Notifications are excluded; everything that feeds the next tick is
    /// included.
    pub fn checksum(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.current_ticks.hash(&mut hasher);
        self.date.hash(&mut hasher);
        self.rng.hash(&mut hasher);

        self.map.hash(&mut hasher);
        self.park.hash(&mut hasher);
        self.finance.hash(&mut hasher);

        self.guests.hash(&mut hasher);
        self.next_guest_id.hash(&mut hasher);
        self.litter.hash(&mut hasher);

        // BTreeMap iterates in key order
        for (id, ride) in &self.rides {
            id.hash(&mut hasher);
            ride.hash(&mut hasher);
        }

        self.awards.hash(&mut hasher);
        self.campaigns.hash(&mut hasher);
        self.peep_spawns.hash(&mut hasher);
        self.cheats.hash(&mut hasher);
        self.screen.hash(&mut hasher);
        self.paused.hash(&mut hasher);
        self.land_rights_for_sale.hash(&mut hasher);
        self.construction_rights_for_sale.hash(&mut hasher);

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{Notification, Panel};
    use crate::testing::GameStateBuilder;

    #[test]
    fn test_week_start_every_4096_ticks() {
        let mut date = Date::default();
        let mut weeks = vec![];
        for tick in 1..=16384u32 {
            if date.update().week_start {
                weeks.push(tick);
            }
        }
        assert_eq!(weeks, vec![4096, 8192, 12288, 16384]);
    }

    #[test]
    fn test_month_rollover() {
        let mut date = Date::default();
        let mut month_starts = 0;
        let mut day_starts = 0;
        for _ in 0..16384 {
            let events = date.update();
            month_starts += events.month_start as u32;
            day_starts += events.day_start as u32;
        }
        assert_eq!(month_starts, 1);
        assert_eq!(date.months_elapsed, 1);
        assert_eq!(date.day, 0);
        // Every day of March, including the new day 0 of April
        assert_eq!(day_starts, 31);
    }

    #[test]
    fn test_year_wraps_after_october() {
        let date = Date {
            months_elapsed: 8,
            ..Default::default()
        };
        assert_eq!(date.month(), 0);
        assert_eq!(date.year(), 2);
        assert_eq!(date.days_in_month(), 31);
    }

    #[test]
    fn test_checksum_ignores_notifications() {
        let mut state = GameStateBuilder::new().build();
        let before = state.checksum();
        state.notifications.invalidate(Panel::Finances);
        assert_eq!(state.checksum(), before);

        state.park.rating = 123;
        assert_ne!(state.checksum(), before);
    }

    #[test]
    fn test_checksum_tracks_rng() {
        let mut state = GameStateBuilder::new().build();
        let before = state.checksum();
        state.rng.next_u32();
        assert_ne!(state.checksum(), before);
    }

    #[test]
    fn test_admit_guest() {
        let mut state = GameStateBuilder::new().with_peep_spawn(64, 64, 0).build();
        let id = crate::systems::generation::generate_guest(&mut state).unwrap();
        assert_eq!(state.park.guests_heading_for_park, 1);

        assert!(state.admit_guest(id));
        assert_eq!(state.park.guests_heading_for_park, 0);
        assert_eq!(state.park.guests_in_park, 1);
        assert!(!state.guest(id).unwrap().outside_of_park);
        assert!(state
            .notifications
            .contains(&Notification::Broadcast(Intent::UpdateGuestCount)));

        assert!(!state.admit_guest(id));
        assert!(!state.admit_guest(999));
    }
}
