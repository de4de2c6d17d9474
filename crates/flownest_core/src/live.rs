//! In-process live queries over owner-scoped collections.
//!
//! # Responsibility
//! - Push a fresh owner-filtered result set to every subscriber after each
//!   write to a collection.
//! - Let readers discard snapshots that are older than what they already
//!   show.
//!
//! # Invariants
//! - Revisions issued by one feed are strictly increasing.
//! - A subscriber only ever receives snapshots for its own owner.
//! - Dropping a [`Subscription`] unsubscribes; the sender side is pruned on
//!   the next publish.
//! - Feeds of different collections are independent; no ordering holds
//!   between them.

use crate::model::OwnerId;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One pushed result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub owner_id: OwnerId,
    pub revision: u64,
    pub items: Vec<T>,
}

/// Receiving end of a live query.
pub struct Subscription<T> {
    id: u64,
    collection: &'static str,
    receiver: Receiver<Snapshot<T>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Returns the next pending snapshot without blocking.
    pub fn try_next(&self) -> Option<Snapshot<T>> {
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for the next snapshot.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Snapshot<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drains every pending snapshot and returns them in delivery order.
    pub fn drain(&self) -> Vec<Snapshot<T>> {
        self.receiver.try_iter().collect()
    }
}

struct Subscriber<T> {
    id: u64,
    owner_id: OwnerId,
    sender: Sender<Snapshot<T>>,
}

/// Publish/subscribe hub for one collection.
pub struct CollectionFeed<T> {
    collection: &'static str,
    next_revision: AtomicU64,
    next_subscriber_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber<T>>>,
}

impl<T: Clone> CollectionFeed<T> {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            next_revision: AtomicU64::new(1),
            next_subscriber_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Opens a live query for `owner_id`, delivering `initial` right away.
    pub fn subscribe(&self, owner_id: OwnerId, initial: Vec<T>) -> Subscription<T> {
        let (sender, receiver) = channel();
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let revision = self.issue_revision();

        // The receiver is alive here, so the initial send cannot fail.
        let _ = sender.send(Snapshot {
            owner_id,
            revision,
            items: initial,
        });

        self.lock_subscribers().push(Subscriber {
            id,
            owner_id,
            sender,
        });
        debug!(
            "event=live_subscribe module=live status=ok collection={} subscription_id={} revision={}",
            self.collection, id, revision
        );

        Subscription {
            id,
            collection: self.collection,
            receiver,
        }
    }

    /// Pushes `items` to every live subscriber of `owner_id`.
    ///
    /// Returns the revision stamped on the snapshot.
    pub fn publish(&self, owner_id: OwnerId, items: Vec<T>) -> u64 {
        let revision = self.issue_revision();
        let mut subscribers = self.lock_subscribers();
        let before = subscribers.len();
        subscribers.retain(|subscriber| {
            if subscriber.owner_id != owner_id {
                return true;
            }
            subscriber
                .sender
                .send(Snapshot {
                    owner_id,
                    revision,
                    items: items.clone(),
                })
                .is_ok()
        });
        let pruned = before - subscribers.len();
        debug!(
            "event=live_publish module=live status=ok collection={} revision={} items={} pruned={}",
            self.collection,
            revision,
            items.len(),
            pruned
        );
        revision
    }

    /// Number of registered subscribers, including ones not yet pruned.
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn issue_revision(&self) -> u64 {
        self.next_revision.fetch_add(1, Ordering::SeqCst)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Subscriber<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reader-side state that only moves forward in revision.
#[derive(Debug, Clone)]
pub struct SnapshotView<T> {
    revision: Option<u64>,
    items: Vec<T>,
}

impl<T> Default for SnapshotView<T> {
    fn default() -> Self {
        Self {
            revision: None,
            items: Vec::new(),
        }
    }
}

impl<T> SnapshotView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the view when `snapshot` is newer; returns whether it did.
    pub fn apply(&mut self, snapshot: Snapshot<T>) -> bool {
        if let Some(current) = self.revision {
            if snapshot.revision <= current {
                return false;
            }
        }
        self.revision = Some(snapshot.revision);
        self.items = snapshot.items;
        true
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectionFeed, Snapshot, SnapshotView};
    use uuid::Uuid;

    #[test]
    fn subscribe_delivers_initial_snapshot() {
        let feed = CollectionFeed::<u32>::new("numbers");
        let owner = Uuid::new_v4();
        let subscription = feed.subscribe(owner, vec![1, 2]);

        let snapshot = subscription.try_next().unwrap();
        assert_eq!(snapshot.items, vec![1, 2]);
        assert_eq!(snapshot.owner_id, owner);
        assert!(subscription.try_next().is_none());
    }

    #[test]
    fn publish_reaches_only_matching_owner() {
        let feed = CollectionFeed::<u32>::new("numbers");
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let alice_sub = feed.subscribe(alice, Vec::new());
        let bob_sub = feed.subscribe(bob, Vec::new());
        alice_sub.drain();
        bob_sub.drain();

        feed.publish(alice, vec![7]);

        assert_eq!(alice_sub.drain().len(), 1);
        assert!(bob_sub.drain().is_empty());
    }

    #[test]
    fn dropped_subscription_is_pruned_on_publish() {
        let feed = CollectionFeed::<u32>::new("numbers");
        let owner = Uuid::new_v4();
        let subscription = feed.subscribe(owner, Vec::new());
        assert_eq!(feed.subscriber_count(), 1);

        drop(subscription);
        feed.publish(owner, vec![1]);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn revisions_strictly_increase() {
        let feed = CollectionFeed::<u32>::new("numbers");
        let owner = Uuid::new_v4();
        let first = feed.publish(owner, Vec::new());
        let second = feed.publish(owner, Vec::new());
        assert!(second > first);
    }

    #[test]
    fn view_ignores_stale_snapshot() {
        let owner = Uuid::new_v4();
        let mut view = SnapshotView::new();
        assert!(view.apply(Snapshot {
            owner_id: owner,
            revision: 5,
            items: vec!["kept"],
        }));
        assert!(!view.apply(Snapshot {
            owner_id: owner,
            revision: 4,
            items: vec!["kept", "resurrected"],
        }));
        assert_eq!(view.items(), &["kept"]);
        assert_eq!(view.revision(), Some(5));
    }
}
