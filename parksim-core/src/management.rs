//! Park awards and marketing campaigns.
//!
//! Both lists are plain `Vec`s iterated in registration order. Guest
//! generation applies award adjustments one after another, so the order in
//! which awards were granted changes the result and must be kept.

use crate::ride::RideId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwardKind {
    MostUntidy,
    MostTidy,
    BestRollerCoasters,
    BestValue,
    MostBeautiful,
    WorstValue,
    Safest,
    BestStaff,
    BestFood,
    WorstFood,
    BestToilets,
    MostDisappointing,
    BestWaterRides,
    BestCustomDesignedRides,
    MostDazzlingRideColours,
    MostConfusingLayout,
    BestGentleRides,
}

impl AwardKind {
    pub fn is_positive(self) -> bool {
        !matches!(
            self,
            AwardKind::MostUntidy
                | AwardKind::WorstValue
                | AwardKind::WorstFood
                | AwardKind::MostDisappointing
                | AwardKind::MostConfusingLayout
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Award {
    pub kind: AwardKind,
    /// Months left before the award expires.
    pub months_left: u16,
}

impl Award {
    pub fn new(kind: AwardKind) -> Self {
        Self {
            kind,
            months_left: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignKind {
    ParkEntryFree,
    RideFree,
    ParkEntryHalfPrice,
    FoodOrDrinkFree,
    Park,
    Ride,
}

impl CampaignKind {
    /// Chance out of 65535 of pulling in an extra guest each tick.
    pub const fn base_probability(self) -> u32 {
        match self {
            CampaignKind::ParkEntryFree => 400,
            CampaignKind::RideFree => 300,
            CampaignKind::ParkEntryHalfPrice => 200,
            CampaignKind::FoodOrDrinkFree => 200,
            CampaignKind::Park => 250,
            CampaignKind::Ride => 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketingCampaign {
    pub kind: CampaignKind,
    pub weeks_left: u16,
    /// Target ride for ride-specific campaigns.
    pub ride_id: Option<RideId>,
}
