//! Change notifications and the observers that consume them.
//!
//! The core never calls into windows, audio or the network directly. Every
//! side effect it wants the outside world to see is pushed as a
//! [`Notification`] onto the state's [`NotificationQueue`]. Between ticks the
//! driver drains the queue into an [`ObserverRegistry`], which hands each
//! notification to the observers subscribed to its [`Category`].
//!
//! ```text
//! GameActions::execute ─┐
//!                       ├──▶ NotificationQueue ──drain──▶ ObserverRegistry
//! park update systems ──┘                                     │
//!                                        ┌────────────────────┼──────────────┐
//!                                        ▼                    ▼              ▼
//!                                 ConsoleObserver      ReplayRecorder     (windows)
//! ```
//!
//! Observers cannot reach back into the state, so they cannot affect
//! determinism.

pub mod console;
pub mod replay;

use crate::actions::ActionPacket;
use crate::coords::{CoordsXY, CoordsXYZ};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use console::ConsoleObserver;
pub use replay::{read_replay, ReplayEntry, ReplayRecorder};

/// Display panels that can be asked to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    ParkInformation,
    Finances,
    RideList,
}

/// Broadcast intents for anything showing park-wide figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    UpdateParkRating,
    UpdateGuestCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    PlaceItem,
    Demolish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Invalidate(Panel),
    InvalidateTile(CoordsXY),
    Broadcast(Intent),
    Sound { id: SoundId, position: CoordsXYZ },
    /// An action passed validation and was applied; replay it on peers.
    ActionCommitted(ActionPacket),
}

/// Subscription key for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Panels,
    Map,
    Intents,
    Audio,
    Network,
}

impl Notification {
    pub fn category(&self) -> Category {
        match self {
            Notification::Invalidate(_) => Category::Panels,
            Notification::InvalidateTile(_) => Category::Map,
            Notification::Broadcast(_) => Category::Intents,
            Notification::Sound { .. } => Category::Audio,
            Notification::ActionCommitted(_) => Category::Network,
        }
    }
}

/// Pending notifications produced during a tick, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    pub fn push(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    pub fn invalidate(&mut self, panel: Panel) {
        self.push(Notification::Invalidate(panel));
    }

    pub fn broadcast(&mut self, intent: Intent) {
        self.push(Notification::Broadcast(intent));
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    pub fn contains(&self, notification: &Notification) -> bool {
        self.pending.contains(notification)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Errors that can occur while an observer handles a notification.
#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] crate::actions::ParameterError),
}

/// Consumer of core notifications (windows, audio, network, logs).
///
/// Errors returned from `on_notification` are logged by the registry and do
/// not stop delivery to other observers.
pub trait ParkObserver: Send {
    /// Categories this observer wants to receive.
    fn categories(&self) -> &[Category];

    fn on_notification(&mut self, tick: u32, notification: &Notification)
        -> Result<(), ObserverError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Called when the registry is dropped or shut down.
    fn on_shutdown(&mut self) {}
}

/// Registry that routes notifications to subscribed observers.
pub struct ObserverRegistry {
    observers: Vec<Box<dyn ParkObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self { observers: vec![] }
    }

    pub fn register(&mut self, observer: Box<dyn ParkObserver>) {
        log::info!("Registered observer: {}", observer.name());
        self.observers.push(observer);
    }

    /// Delivers each notification, in order, to every observer subscribed to
    /// its category.
    pub fn dispatch(&mut self, tick: u32, notifications: &[Notification]) {
        for notification in notifications {
            let category = notification.category();
            for observer in &mut self.observers {
                if !observer.categories().contains(&category) {
                    continue;
                }
                if let Err(e) = observer.on_notification(tick, notification) {
                    log::warn!("Observer '{}' error: {}", observer.name(), e);
                }
            }
        }
    }

    pub fn shutdown(&mut self) {
        for observer in &mut self.observers {
            observer.on_shutdown();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
