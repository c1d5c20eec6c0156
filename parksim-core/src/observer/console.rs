//! Console observer for following a run in the log.

use super::{Category, Intent, Notification, ObserverError, ParkObserver};

/// Logs notifications as they are delivered.
///
/// Committed actions and park-wide broadcasts go to `info`; panel, tile and
/// sound notifications, which are frequent, go to `trace`.
pub struct ConsoleObserver {
    categories: Vec<Category>,
    /// Notifications seen per category, in `categories` order.
    counts: Vec<u64>,
}

impl ConsoleObserver {
    /// Observer subscribed to every category.
    pub fn new() -> Self {
        Self::with_categories(&[
            Category::Panels,
            Category::Map,
            Category::Intents,
            Category::Audio,
            Category::Network,
        ])
    }

    pub fn with_categories(categories: &[Category]) -> Self {
        Self {
            categories: categories.to_vec(),
            counts: vec![0; categories.len()],
        }
    }

    /// Notifications received for `category` so far.
    pub fn count(&self, category: Category) -> u64 {
        self.categories
            .iter()
            .position(|&c| c == category)
            .map_or(0, |i| self.counts[i])
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkObserver for ConsoleObserver {
    fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn on_notification(
        &mut self,
        tick: u32,
        notification: &Notification,
    ) -> Result<(), ObserverError> {
        let category = notification.category();
        if let Some(i) = self.categories.iter().position(|&c| c == category) {
            self.counts[i] += 1;
        }

        match notification {
            Notification::ActionCommitted(packet) => {
                log::info!(
                    "[tick {}] {} committed ({} byte payload)",
                    tick,
                    packet.kind.name(),
                    packet.payload.len()
                );
            }
            Notification::Broadcast(Intent::UpdateParkRating) => {
                log::info!("[tick {}] park rating updated", tick);
            }
            Notification::Broadcast(Intent::UpdateGuestCount) => {
                log::debug!("[tick {}] guest count updated", tick);
            }
            other => {
                log::trace!("[tick {}] {:?}", tick, other);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ConsoleObserver"
    }

    fn on_shutdown(&mut self) {
        let summary: Vec<String> = self
            .categories
            .iter()
            .zip(&self.counts)
            .map(|(category, count)| format!("{:?}={}", category, count))
            .collect();
        log::info!("Console observer totals: {}", summary.join(", "));
    }
}
