use std::collections::hash_map;
use std::collections::HashMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::tracking::events::TrackEvent;

pub type SubscriberId = Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber outbox is full")]
    Full,

    #[error("subscriber is gone")]
    Closed,
}

/// Handle to one live tracking connection. Delivery goes through a bounded
/// outbox drained by the connection's writer, so senders never wait on a
/// slow socket.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub role: String,
    outbox: mpsc::Sender<TrackEvent>,
}

impl Subscriber {
    pub fn new(role: impl Into<String>, outbox: mpsc::Sender<TrackEvent>) -> Self {
        Self::with_id(Uuid::new_v4(), role, outbox)
    }

    pub fn with_id(
        id: SubscriberId,
        role: impl Into<String>,
        outbox: mpsc::Sender<TrackEvent>,
    ) -> Self {
        Self {
            id,
            role: role.into(),
            outbox,
        }
    }

    fn try_deliver(&self, event: TrackEvent) -> Result<(), DeliveryError> {
        self.outbox.try_send(event).map_err(|err| match err {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

type Room = HashMap<SubscriberId, Subscriber>;

/// Per-order rooms of live subscribers. Each room is guarded by its map
/// entry, so membership changes never interleave with a broadcast over the
/// same room.
pub struct TrackingRegistry {
    rooms: DashMap<u64, Room>,
}

impl TrackingRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Adds `subscriber` to the room for `order_id` and greets it. Joining
    /// again with the same id is a no-op and returns `false`.
    pub fn join(&self, order_id: u64, subscriber: Subscriber) -> bool {
        let inserted = {
            let mut room = self.rooms.entry(order_id).or_default();
            match room.entry(subscriber.id) {
                hash_map::Entry::Occupied(_) => false,
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(subscriber.clone());
                    true
                }
            }
        };

        if inserted {
            info!(
                order_id,
                subscriber_id = %subscriber.id,
                role = %subscriber.role,
                "subscriber joined room"
            );
            let hello = TrackEvent::hello(order_id, &subscriber.role);
            if let Err(err) = self.send_to(&subscriber, hello) {
                warn!(
                    order_id,
                    subscriber_id = %subscriber.id,
                    error = %err,
                    "failed to greet subscriber"
                );
            }
        }

        inserted
    }

    /// Removes a subscriber, dropping the room once it is empty. Returns the
    /// removed handle; only one caller ever gets it back.
    pub fn leave(&self, order_id: u64, subscriber_id: SubscriberId) -> Option<Subscriber> {
        match self.rooms.entry(order_id) {
            Entry::Occupied(mut room) => {
                let removed = room.get_mut().remove(&subscriber_id);
                if room.get().is_empty() {
                    room.remove();
                    debug!(order_id, "room closed");
                }
                removed
            }
            Entry::Vacant(_) => None,
        }
    }

    pub fn send_to(&self, subscriber: &Subscriber, event: TrackEvent) -> Result<(), DeliveryError> {
        subscriber.try_deliver(event)
    }

    /// Delivers `event` to every member except `exclude` and returns how many
    /// accepted it. Members whose connection is gone are pruned and the rest
    /// of the room is told they left.
    pub fn broadcast(
        &self,
        order_id: u64,
        event: TrackEvent,
        exclude: Option<SubscriberId>,
    ) -> usize {
        let (delivered, mut pruned) = self.deliver_to_room(order_id, &event, exclude);

        while let Some(gone) = pruned.pop() {
            warn!(order_id, subscriber_id = %gone.id, "pruned unreachable subscriber");
            let notice = TrackEvent::left(order_id, &gone.role);
            let (_, more) = self.deliver_to_room(order_id, &notice, None);
            pruned.extend(more);
        }

        delivered
    }

    /// Handles a text frame from a member: echo to the sender, broadcast to
    /// everyone else.
    pub fn on_message(&self, order_id: u64, sender_id: SubscriberId, text: &str) {
        let Some(sender) = self.member(order_id, sender_id) else {
            debug!(order_id, subscriber_id = %sender_id, "message from non-member ignored");
            return;
        };

        let echo = TrackEvent::echo(order_id, &sender.role, text);
        if let Err(err) = self.send_to(&sender, echo.clone()) {
            warn!(order_id, subscriber_id = %sender_id, error = %err, "echo not delivered");
        }
        self.broadcast(order_id, echo.into_broadcast(), Some(sender_id));
    }

    /// Connection teardown. Removes the subscriber and notifies the room at
    /// most once, however many paths observe the close.
    pub fn disconnect(&self, order_id: u64, subscriber_id: SubscriberId) -> bool {
        match self.leave(order_id, subscriber_id) {
            Some(gone) => {
                info!(order_id, subscriber_id = %subscriber_id, "subscriber left room");
                self.broadcast(order_id, TrackEvent::left(order_id, &gone.role), None);
                true
            }
            None => false,
        }
    }

    pub fn member(&self, order_id: u64, subscriber_id: SubscriberId) -> Option<Subscriber> {
        self.rooms
            .get(&order_id)
            .and_then(|room| room.get(&subscriber_id).cloned())
    }

    pub fn member_count(&self, order_id: u64) -> usize {
        self.rooms.get(&order_id).map(|room| room.len()).unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains_room(&self, order_id: u64) -> bool {
        self.rooms.contains_key(&order_id)
    }

    /// Drops every room. Outboxes close with them, which ends each
    /// connection's writer.
    pub fn shutdown(&self) {
        let rooms = self.rooms.len();
        self.rooms.clear();
        info!(rooms, "tracking registry shut down");
    }

    fn deliver_to_room(
        &self,
        order_id: u64,
        event: &TrackEvent,
        exclude: Option<SubscriberId>,
    ) -> (usize, Vec<Subscriber>) {
        let mut delivered = 0;
        let mut dead = Vec::new();

        {
            let Some(room) = self.rooms.get(&order_id) else {
                return (0, Vec::new());
            };

            for subscriber in room.values() {
                if Some(subscriber.id) == exclude {
                    continue;
                }
                match subscriber.try_deliver(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(DeliveryError::Full) => {
                        warn!(
                            order_id,
                            subscriber_id = %subscriber.id,
                            "outbox full; dropping event"
                        );
                    }
                    Err(DeliveryError::Closed) => dead.push(subscriber.id),
                }
            }
        }

        let pruned = dead
            .into_iter()
            .filter_map(|id| self.leave(order_id, id))
            .collect();

        (delivered, pruned)
    }
}

impl Default for TrackingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
