use crate::coords::CoordsXYZ;
use crate::finance::ExpenditureType;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionStatus {
    #[default]
    Ok,
    InvalidParameters,
    NotInEditorMode,
    Disallowed,
    InsufficientFunds,
    GamePaused,
}

/// Message identifiers for the two-line error dialog.
///
/// Titles read "Can't do X…", messages explain why. `None` leaves a line
/// blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StringId {
    #[default]
    None,
    // Titles
    ErrInvalidParameter,
    CantClosePark,
    CantOpenPark,
    CantChangeEntranceFee,
    CantDemolishRide,
    CantRefurbishRide,
    // Messages
    ErrValueOutOfRange,
    ErrSurfaceElementNotFound,
    ErrRideNotFound,
    LandNotForSale,
    GamePaused,
    NotEnoughCash,
    MoneyDisabled,
    EntranceFeeLocked,
    RideIndestructible,
    MustBeClosedFirst,
}

/// Outcome of a query or execute. Plain value; the caller owns it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: ActionStatus,
    pub error_title: StringId,
    pub error_message: StringId,
    /// Positive is a charge, negative a refund.
    pub cost: Money,
    pub position: Option<CoordsXYZ>,
    pub expenditure: Option<ExpenditureType>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(status: ActionStatus, title: StringId, message: StringId) -> Self {
        Self {
            status,
            error_title: title,
            error_message: message,
            ..Default::default()
        }
    }

    pub fn invalid_parameter(message: StringId) -> Self {
        Self::error(
            ActionStatus::InvalidParameters,
            StringId::ErrInvalidParameter,
            message,
        )
    }

    pub fn is_ok(&self) -> bool {
        self.status == ActionStatus::Ok
    }

    /// Converts a failed result into an [`ActionError`] for `?` callers.
    pub fn into_result(self) -> Result<ActionResult, ActionError> {
        if self.is_ok() {
            return Ok(self);
        }
        Err(ActionError {
            status: self.status,
            title: self.error_title,
            message: self.error_message,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("action failed with {status:?}: {title:?} / {message:?}")]
pub struct ActionError {
    pub status: ActionStatus,
    pub title: StringId,
    pub message: StringId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert!(ActionResult::ok().into_result().is_ok());

        let err = ActionResult::invalid_parameter(StringId::ErrValueOutOfRange)
            .into_result()
            .unwrap_err();
        assert_eq!(err.status, ActionStatus::InvalidParameters);
        assert_eq!(err.title, StringId::ErrInvalidParameter);
        assert_eq!(err.message, StringId::ErrValueOutOfRange);
        assert!(err.to_string().contains("InvalidParameters"));
    }
}
