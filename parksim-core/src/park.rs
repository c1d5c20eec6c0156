//! The park aggregate: derived metrics, settings and weekly histories.
//!
//! Derived fields (`rating`, `value`, `company_value`,
//! `guest_generation_probability`, `suggested_guest_maximum`,
//! `total_ride_value_for_money`, `size`) are written only by the park
//! simulation systems. Settings (`flags`, `entrance_fee`,
//! `same_price_throughout_park`) change only through actions.

use crate::history::History;
use crate::money::Money;
use serde::{Deserialize, Serialize};

pub const RATING_HISTORY_SIZE: usize = 32;
pub const GUESTS_HISTORY_SIZE: usize = 32;
pub const FINANCE_HISTORY_SIZE: usize = 128;

pub const RATING_HISTORY_UNDEFINED: u8 = u8::MAX;
pub const GUESTS_HISTORY_UNDEFINED: u32 = u32::MAX;
pub const MONEY_HISTORY_UNDEFINED: Money = Money::MIN;

pub const MAX_PARK_RATING: u16 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParkFlags(u32);

impl ParkFlags {
    pub const PARK_OPEN: ParkFlags = ParkFlags(1 << 0);
    pub const SHOW_REAL_GUEST_NAMES: ParkFlags = ParkFlags(1 << 4);
    pub const NO_MONEY: ParkFlags = ParkFlags(1 << 11);
    pub const DIFFICULT_GUEST_GENERATION: ParkFlags = ParkFlags(1 << 12);
    pub const PARK_FREE_ENTRY: ParkFlags = ParkFlags(1 << 13);
    pub const DIFFICULT_PARK_RATING: ParkFlags = ParkFlags(1 << 14);
    pub const UNLOCK_ALL_PRICES: ParkFlags = ParkFlags(1 << 31);

    pub const fn empty() -> Self {
        ParkFlags(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        ParkFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: ParkFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn insert(&mut self, flag: ParkFlags) {
        self.0 |= flag.0;
    }

    pub fn remove(&mut self, flag: ParkFlags) {
        self.0 &= !flag.0;
    }

    pub const fn union(self, other: ParkFlags) -> Self {
        ParkFlags(self.0 | other.0)
    }
}

/// Weekly graphs, newest sample first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParkHistories {
    /// Rating divided by 4.
    pub rating: History<u8, RATING_HISTORY_SIZE>,
    pub guests: History<u32, GUESTS_HISTORY_SIZE>,
    /// Cash minus loan.
    pub cash: History<Money, FINANCE_HISTORY_SIZE>,
    pub weekly_profit: History<Money, FINANCE_HISTORY_SIZE>,
    pub park_value: History<Money, FINANCE_HISTORY_SIZE>,
}

impl ParkHistories {
    pub fn reset(&mut self) {
        self.rating.fill(RATING_HISTORY_UNDEFINED);
        self.guests.fill(GUESTS_HISTORY_UNDEFINED);
        self.cash.fill(MONEY_HISTORY_UNDEFINED);
        self.weekly_profit.fill(MONEY_HISTORY_UNDEFINED);
        self.park_value.fill(MONEY_HISTORY_UNDEFINED);
    }
}

impl Default for ParkHistories {
    fn default() -> Self {
        Self {
            rating: History::filled(RATING_HISTORY_UNDEFINED),
            guests: History::filled(GUESTS_HISTORY_UNDEFINED),
            cash: History::filled(MONEY_HISTORY_UNDEFINED),
            weekly_profit: History::filled(MONEY_HISTORY_UNDEFINED),
            park_value: History::filled(MONEY_HISTORY_UNDEFINED),
        }
    }
}

/// Week-over-week guest trend shown next to the guest count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GuestChangeModifier {
    #[default]
    Steady,
    Falling,
    Rising,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Park {
    pub name: String,
    pub flags: ParkFlags,
    pub rating: u16,
    /// Debug override: when set, the rating calculation returns this value.
    pub forced_rating: Option<u16>,
    /// Externally accumulated penalty for ride accidents.
    pub rating_casualty_penalty: i16,
    pub value: Money,
    pub company_value: Money,
    pub total_ride_value_for_money: Money,
    pub suggested_guest_maximum: u32,
    pub guest_generation_probability: u32,
    pub guests_in_park: u32,
    pub guests_in_park_last_week: u32,
    pub guests_heading_for_park: u32,
    pub guest_change_modifier: GuestChangeModifier,
    /// Tiles with land or construction rights owned.
    pub size: u32,
    pub entrance_fee: Money,
    pub land_price: Money,
    pub construction_rights_price: Money,
    /// Shop-item bitmask priced once for the whole park.
    pub same_price_throughout_park: u64,
    pub guest_initial_cash: Money,
    pub guest_initial_happiness: u8,
    pub guest_initial_hunger: u8,
    pub guest_initial_thirst: u8,
    pub histories: ParkHistories,
}

impl Park {
    pub fn new() -> Self {
        Self {
            name: "Unnamed Park".to_string(),
            flags: ParkFlags::NO_MONEY.union(ParkFlags::SHOW_REAL_GUEST_NAMES),
            rating: 0,
            forced_rating: None,
            rating_casualty_penalty: 0,
            value: Money::ZERO,
            company_value: Money::ZERO,
            total_ride_value_for_money: Money::ZERO,
            suggested_guest_maximum: 0,
            guest_generation_probability: 0,
            guests_in_park: 0,
            guests_in_park_last_week: 0,
            guests_heading_for_park: 0,
            guest_change_modifier: GuestChangeModifier::Steady,
            size: 0,
            entrance_fee: Money::gbp(10),
            land_price: Money::gbp(90),
            construction_rights_price: Money::gbp(40),
            same_price_throughout_park: 0,
            guest_initial_cash: Money::gbp(50),
            guest_initial_happiness: calculate_guest_initial_happiness(50),
            guest_initial_hunger: 200,
            guest_initial_thirst: 200,
            histories: ParkHistories::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.flags.contains(ParkFlags::PARK_OPEN)
    }

    pub fn has_money(&self) -> bool {
        !self.flags.contains(ParkFlags::NO_MONEY)
    }

    pub fn ride_prices_unlocked(&self) -> bool {
        self.flags.contains(ParkFlags::UNLOCK_ALL_PRICES)
            || self.flags.contains(ParkFlags::PARK_FREE_ENTRY)
    }

    pub fn entrance_fee_unlocked(&self) -> bool {
        self.flags.contains(ParkFlags::UNLOCK_ALL_PRICES)
            || !self.flags.contains(ParkFlags::PARK_FREE_ENTRY)
    }

    /// Fee actually charged at the gate.
    pub fn effective_entrance_fee(&self) -> Money {
        if !self.has_money() || !self.entrance_fee_unlocked() {
            return Money::ZERO;
        }
        self.entrance_fee
    }

    pub fn total_guests(&self) -> u32 {
        self.guests_in_park
            .saturating_add(self.guests_heading_for_park)
    }
}

impl Default for Park {
    fn default() -> Self {
        Self::new()
    }
}

/// Happiness value for a "percentage happy" scenario setting.
///
/// Percentages are clamped to 15–98 and mapped onto the sequence
/// `floor(π·(9+n)/2)`, returning `(9+n)·4` for the first step that reaches
/// the target.
pub fn calculate_guest_initial_happiness(percentage: u8) -> u8 {
    const SCALE: u32 = 100_000;
    const PI_SCALED: u32 = 314_159;

    let percentage = percentage.clamp(15, 98) as u32;
    for n in 1..55u32 {
        if (PI_SCALED * (9 + n)) / SCALE / 2 >= percentage {
            return ((9 + n) * 4) as u8;
        }
    }
    40
}
