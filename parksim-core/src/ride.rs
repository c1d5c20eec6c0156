//! Ride records as seen by the park economy.
//!
//! Per-type constants (bonus value, track capabilities) come from the
//! external ride catalogue and are carried on each ride as [`RideTypeTraits`].

use crate::money::Money;
use serde::{Deserialize, Serialize};

pub type RideId = u16;

/// `Ride::value` when the ride has not been rated yet.
pub const RIDE_VALUE_UNDEFINED: u16 = 0xFFFF;
/// Excitement/intensity when the ride has not been rated yet.
pub const RIDE_RATING_UNDEFINED: i16 = -1;

/// Ratings are stored in hundredths: 6.00 → 600.
pub const fn ride_rating(whole: i16, hundredths: i16) -> i16 {
    whole * 100 + hundredths
}

/// Segment lengths are 16.16 fixed point.
pub const fn segment_length(units: i32) -> i32 {
    units << 16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RideStatus {
    #[default]
    Closed,
    Open,
    Testing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LifecycleFlags(u32);

impl LifecycleFlags {
    pub const TESTED: LifecycleFlags = LifecycleFlags(1 << 1);
    pub const BROKEN_DOWN: LifecycleFlags = LifecycleFlags(1 << 7);
    pub const CRASHED: LifecycleFlags = LifecycleFlags(1 << 10);
    pub const INDESTRUCTIBLE: LifecycleFlags = LifecycleFlags(1 << 14);

    pub const fn empty() -> Self {
        LifecycleFlags(0)
    }

    pub const fn contains(self, flag: LifecycleFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn insert(&mut self, flag: LifecycleFlags) {
        self.0 |= flag.0;
    }

    pub fn remove(&mut self, flag: LifecycleFlags) {
        self.0 &= !flag.0;
    }

    pub const fn with(self, flag: LifecycleFlags) -> Self {
        LifecycleFlags(self.0 | flag.0)
    }
}

/// Catalogue-provided properties of a ride's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RideTypeTraits {
    /// Guest-capacity and value bonus for the type.
    pub bonus_value: u32,
    pub has_track: bool,
    pub has_data_logging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub name: String,
    pub status: RideStatus,
    pub lifecycle: LifecycleFlags,
    pub traits: RideTypeTraits,
    /// Value for money in money units, or [`RIDE_VALUE_UNDEFINED`].
    pub value: u16,
    pub excitement: i16,
    pub intensity: i16,
    /// Percentage of time broken down (0–100).
    pub downtime: u8,
    /// Customers per 30-second bucket, most recent first.
    pub num_customers: [u16; 10],
    /// Admission price.
    pub price: Money,
    /// Length of the first station's track segment (16.16).
    pub station_segment_length: i32,
    pub construction_cost: Money,
}

impl Ride {
    pub fn new(id: RideId, name: impl Into<String>, traits: RideTypeTraits) -> Self {
        Self {
            id,
            name: name.into(),
            status: RideStatus::Closed,
            lifecycle: LifecycleFlags::empty(),
            traits,
            value: RIDE_VALUE_UNDEFINED,
            excitement: RIDE_RATING_UNDEFINED,
            intensity: RIDE_RATING_UNDEFINED,
            downtime: 0,
            num_customers: [0; 10],
            price: Money::ZERO,
            station_segment_length: 0,
            construction_cost: Money::ZERO,
        }
    }

    pub fn has_ratings(&self) -> bool {
        self.excitement != RIDE_RATING_UNDEFINED
    }

    pub fn has_value(&self) -> bool {
        self.value != RIDE_VALUE_UNDEFINED
    }

    pub fn customers_in_last_5_minutes(&self) -> u32 {
        self.num_customers.iter().map(|&c| c as u32).sum()
    }

    /// Open and neither broken down nor crashed.
    pub fn is_operating(&self) -> bool {
        self.status == RideStatus::Open
            && !self.lifecycle.contains(LifecycleFlags::BROKEN_DOWN)
            && !self.lifecycle.contains(LifecycleFlags::CRASHED)
    }

    /// Money returned by demolishing the ride.
    pub fn refund_price(&self) -> Money {
        self.construction_cost / 2
    }

    pub fn refurbish_price(&self) -> Money {
        self.refund_price() / 2
    }
}
