//! Race lifecycle notifications
//!
//! The bus is owned by a [`crate::session::RaceSession`]; wheels subscribe
//! when activated and unsubscribe when deactivated. Listeners are held
//! weakly so a dropped wheel never keeps itself alive through the bus.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Weak;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Returned by a listener to say whether it wants further notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Unsubscribe,
}

pub trait RaceFinishListener {
    fn on_race_finished(&mut self, race: RaceId) -> ListenerControl;
}

pub type ListenerRef = Weak<RefCell<dyn RaceFinishListener>>;

#[derive(Default)]
pub struct RaceEventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ListenerRef)>,
    /// Notifications that found their listener busy
    pending: Vec<(SubscriptionId, RaceId)>,
}

impl RaceEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: ListenerRef) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.pending.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(sid, _)| *sid == id)
    }

    /// Live subscriptions (dropped listeners excluded)
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }

    /// Notifications still waiting for a busy listener
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Notify every live listener; returns how many were notified.
    ///
    /// A listener that is already mutably borrowed (i.e. publishing from
    /// inside its own evaluation) stays subscribed and its notification is
    /// queued for [`RaceEventBus::deliver_pending`].
    pub fn publish_finished(&mut self, race: RaceId) -> usize {
        let mut notified = 0;
        let pending = &mut self.pending;
        self.listeners.retain(|(id, weak)| {
            let Some(listener) = weak.upgrade() else {
                debug!(?id, "pruning dropped race listener");
                return false;
            };
            let Ok(mut listener) = listener.try_borrow_mut() else {
                debug!(?id, "race listener busy, notification queued");
                pending.push((*id, race));
                return true;
            };
            notified += 1;
            listener.on_race_finished(race) == ListenerControl::Keep
        });
        notified
    }

    /// Retry queued notifications; returns how many were delivered.
    /// Listeners that are still busy stay queued.
    pub fn deliver_pending(&mut self) -> usize {
        let mut notified = 0;
        for (id, race) in std::mem::take(&mut self.pending) {
            let Some(pos) = self.listeners.iter().position(|(sid, _)| *sid == id) else {
                continue;
            };
            let Some(listener) = self.listeners[pos].1.upgrade() else {
                debug!(?id, "pruning dropped race listener");
                self.listeners.remove(pos);
                continue;
            };
            let Ok(mut guard) = listener.try_borrow_mut() else {
                self.pending.push((id, race));
                continue;
            };
            notified += 1;
            if guard.on_race_finished(race) == ListenerControl::Unsubscribe {
                self.listeners.remove(pos);
            }
        }
        notified
    }
}

impl std::fmt::Debug for RaceEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceEventBus")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
