//! Validated, replayable mutations of [`GameState`].
//!
//! Every change to the world goes through an action. Actions are two-phase:
//! [`GameAction::query`] validates against a read-only state and reports the
//! cost, and [`GameAction::execute`] repeats the same validation against the
//! live state before mutating it. Both phases call the same validation
//! function, so a query that passes guarantees the execute passes with the
//! same cost.
//!
//! Flags (editor-only, allowed while paused) and affordability are checked
//! by the [`GameActions`] dispatcher, not by the actions themselves.

pub mod dispatch;
pub mod land_set_rights;
pub mod params;
pub mod park_set_entrance_fee;
pub mod park_set_parameter;
pub mod result;
pub mod ride_demolish;

pub use dispatch::GameActions;
pub use land_set_rights::{LandSetRightsAction, LandSetRightsSetting};
pub use params::{
    ActionPacket, ParameterError, ParameterMap, ParameterReader, ParameterVisitor,
    ParameterWriter,
};
pub use park_set_entrance_fee::{ParkSetEntranceFeeAction, MAX_ENTRANCE_FEE};
pub use park_set_parameter::{ParkParameter, ParkSetParameterAction};
pub use result::{ActionError, ActionResult, ActionStatus, StringId};
pub use ride_demolish::{RideDemolishAction, RideModifyType};

use crate::state::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionFlags(u8);

impl ActionFlags {
    pub const ALLOW_WHILE_PAUSED: ActionFlags = ActionFlags(1 << 0);
    pub const EDITOR_ONLY: ActionFlags = ActionFlags(1 << 2);

    pub const fn empty() -> Self {
        ActionFlags(0)
    }

    pub const fn contains(self, flag: ActionFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

/// Action discriminant with stable wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    LandSetRights,
    ParkSetParameter,
    ParkSetEntranceFee,
    RideDemolish,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::LandSetRights,
        ActionKind::ParkSetParameter,
        ActionKind::ParkSetEntranceFee,
        ActionKind::RideDemolish,
    ];

    /// Id written into packet headers. Never renumber.
    pub const fn id(self) -> u32 {
        match self {
            ActionKind::LandSetRights => 0,
            ActionKind::ParkSetParameter => 1,
            ActionKind::ParkSetEntranceFee => 2,
            ActionKind::RideDemolish => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::LandSetRights => "land_set_rights",
            ActionKind::ParkSetParameter => "park_set_parameter",
            ActionKind::ParkSetEntranceFee => "park_set_entrance_fee",
            ActionKind::RideDemolish => "ride_demolish",
        }
    }
}

/// The flat capability interface shared by every action.
pub trait GameAction {
    fn kind(&self) -> ActionKind;

    fn flags(&self) -> ActionFlags {
        ActionFlags::empty()
    }

    /// Visits each parameter in wire order.
    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor);

    /// Validates without mutating.
    fn query(&self, state: &GameState) -> ActionResult;

    /// Re-validates, then mutates. Leaves `state` untouched on failure.
    fn execute(&self, state: &mut GameState) -> ActionResult;
}

/// Closed set of actions the core understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    LandSetRights(LandSetRightsAction),
    ParkSetParameter(ParkSetParameterAction),
    ParkSetEntranceFee(ParkSetEntranceFeeAction),
    RideDemolish(RideDemolishAction),
}

impl Action {
    /// Default-valued action of `kind`, ready to be filled by a visitor.
    pub fn blank(kind: ActionKind) -> Self {
        match kind {
            ActionKind::LandSetRights => Action::LandSetRights(Default::default()),
            ActionKind::ParkSetParameter => Action::ParkSetParameter(Default::default()),
            ActionKind::ParkSetEntranceFee => Action::ParkSetEntranceFee(Default::default()),
            ActionKind::RideDemolish => Action::RideDemolish(Default::default()),
        }
    }

    fn inner(&self) -> &dyn GameAction {
        match self {
            Action::LandSetRights(a) => a,
            Action::ParkSetParameter(a) => a,
            Action::ParkSetEntranceFee(a) => a,
            Action::RideDemolish(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GameAction {
        match self {
            Action::LandSetRights(a) => a,
            Action::ParkSetParameter(a) => a,
            Action::ParkSetEntranceFee(a) => a,
            Action::RideDemolish(a) => a,
        }
    }
}

impl GameAction for Action {
    fn kind(&self) -> ActionKind {
        self.inner().kind()
    }

    fn flags(&self) -> ActionFlags {
        self.inner().flags()
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        self.inner_mut().accept_parameters(visitor)
    }

    fn query(&self, state: &GameState) -> ActionResult {
        self.inner().query(state)
    }

    fn execute(&self, state: &mut GameState) -> ActionResult {
        self.inner().execute(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::MapRange;
    use crate::map::Ownership;
    use crate::money::Money;
    use crate::testing::GameStateBuilder;
    use proptest::prelude::*;

    #[test]
    fn test_kind_ids_round_trip() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_id(kind.id()), Some(kind));
            assert_eq!(Action::blank(kind).kind(), kind);
        }
        assert_eq!(ActionKind::from_id(4), None);
    }

    #[test]
    fn test_action_json_is_tagged() {
        let action: Action = serde_json::from_str(
            r#"{"type": "park_set_parameter", "parameter": 1, "value": 0}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::ParkSetParameter(ParkSetParameterAction::new(ParkParameter::Open, 0))
        );
    }

    #[test]
    fn test_flags() {
        assert!(Action::blank(ActionKind::LandSetRights)
            .flags()
            .contains(ActionFlags::EDITOR_ONLY));
        assert!(Action::blank(ActionKind::ParkSetParameter)
            .flags()
            .contains(ActionFlags::ALLOW_WHILE_PAUSED));
        assert!(Action::blank(ActionKind::ParkSetEntranceFee)
            .flags()
            .contains(ActionFlags::ALLOW_WHILE_PAUSED));
        assert_eq!(
            Action::blank(ActionKind::RideDemolish).flags(),
            ActionFlags::empty()
        );
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0i32..320, 0i32..320, 0i32..320, 0i32..320, 0u8..6, any::<u8>()).prop_map(
                |(x1, y1, x2, y2, setting, ownership)| {
                    Action::LandSetRights(LandSetRightsAction::from_raw(
                        MapRange::new(x1, y1, x2, y2),
                        setting,
                        ownership,
                    ))
                }
            ),
            (0u8..4, any::<u64>()).prop_map(|(parameter, value)| {
                Action::ParkSetParameter(ParkSetParameterAction::from_raw(parameter, value))
            }),
            (-100i64..11_000).prop_map(|fee| {
                Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money(fee)))
            }),
            (0u16..4, 0u8..3).prop_map(|(ride, modify)| {
                Action::RideDemolish(RideDemolishAction::from_raw(ride, modify))
            }),
        ]
    }

    fn arb_state() -> impl Strategy<Value = GameState> {
        (any::<bool>(), any::<bool>(), any::<bool>(), 0u8..8).prop_map(
            |(money, free_entry, open, entrance_height)| {
                let mut builder = GameStateBuilder::new()
                    .map_size(10)
                    .with_owned_tiles(2, 2, 4, 4)
                    .with_ownership(5, 5, 6, 6, Ownership::AVAILABLE)
                    .with_park_entrance(3, 5, entrance_height)
                    .with_peep_spawn(5 * 32 + 16, 5 * 32 + 16, 0)
                    .with_ride(0, 1000, true)
                    .with_ride(1, 500, false)
                    .with_ride(2, 200, true)
                    .indestructible_ride(2)
                    .with_campaign_for_ride(1);
                if money {
                    builder = builder.with_money(Money::gbp(10_000));
                }
                if free_entry {
                    builder = builder.free_entry();
                }
                if open {
                    builder = builder.open();
                }
                builder.build()
            },
        )
    }

    proptest! {
        /// Query and execute agree on status and cost for every action.
        #[test]
        fn prop_query_execute_equivalence(action in arb_action(), state in arb_state()) {
            let queried = action.query(&state);
            let mut executed_state = state.clone();
            let executed = action.execute(&mut executed_state);

            prop_assert_eq!(queried.status, executed.status);
            prop_assert_eq!(queried.cost, executed.cost);
            prop_assert_eq!(queried.error_title, executed.error_title);
            prop_assert_eq!(queried.position, executed.position);

            if !executed.is_ok() {
                prop_assert_eq!(executed_state.checksum(), state.checksum());
            }
        }
    }
}
