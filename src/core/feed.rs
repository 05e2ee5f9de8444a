//! Change feed for continuously-updating query results.
//!
//! A [`Feed`] keeps one entry per subscriber: the key the subscriber asked for
//! (a story query, the statistics record, ...) and the sending half of a
//! channel. After every mutation the owning repository calls
//! [`Feed::publish_with`], which re-evaluates each key and pushes the fresh
//! result. A [`Subscription`] detaches itself when unsubscribed or dropped, and
//! any subscriber whose receiver has gone away is pruned on the next publish.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

struct Subscriber<K, V> {
    id: u64,
    key: K,
    tx: Sender<V>,
}

struct FeedState<K, V> {
    next_id: u64,
    subscribers: Vec<Subscriber<K, V>>,
}

impl<K, V> FeedState<K, V> {
    fn detach(&mut self, id: u64) {
        self.subscribers.retain(|s| s.id != id);
    }
}

/// Registry of subscribers keyed by what they are watching.
pub struct Feed<K, V> {
    state: Arc<Mutex<FeedState<K, V>>>,
}

impl<K, V> Default for Feed<K, V> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedState {
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }
}

impl<K, V> Feed<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for `key`, delivering `evaluate(&key)` straight
    /// away.
    ///
    /// The initial value is computed while the feed is locked, so a concurrent
    /// [`Feed::publish_with`] lands either before it or on the new subscriber.
    pub fn subscribe<F>(&self, key: K, evaluate: F) -> Subscription<V>
    where
        F: FnOnce(&K) -> V,
    {
        let (tx, rx) = mpsc::channel();

        let mut state = lock(&self.state);
        // The receiver is alive right here, so this send cannot fail.
        let _ = tx.send(evaluate(&key));
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push(Subscriber { id, key, tx });
        drop(state);

        let weak: Weak<Mutex<FeedState<K, V>>> = Arc::downgrade(&self.state);
        Subscription {
            id,
            rx,
            detach: Some(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    lock(&state).detach(id);
                }
            })),
        }
    }

    /// Re-evaluate every subscriber's key and push the result.
    ///
    /// Subscribers whose receiving end has been dropped are removed.
    pub fn publish_with<F>(&self, mut evaluate: F)
    where
        F: FnMut(&K) -> V,
    {
        let mut state = lock(&self.state);
        let before = state.subscribers.len();
        state
            .subscribers
            .retain(|s| s.tx.send(evaluate(&s.key)).is_ok());
        let pruned = before - state.subscribers.len();
        if pruned > 0 {
            tracing::debug!("Pruned {pruned} closed subscriber(s)");
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

/// Lock the feed state, recovering from poisoning.
///
/// The state is a plain list; a panic in another holder cannot leave it
/// half-updated in a way that matters to subscribers.
fn lock<K, V>(state: &Mutex<FeedState<K, V>>) -> std::sync::MutexGuard<'_, FeedState<K, V>> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Receiving end of a feed registration.
pub struct Subscription<V> {
    id: u64,
    rx: Receiver<V>,
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl<V> Subscription<V> {
    /// Identifier of this subscription within its feed.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Drain all pending values and return only the newest one.
    #[must_use]
    pub fn latest(&self) -> Option<V> {
        self.rx.try_iter().last()
    }

    /// Detach from the feed. No further values will be delivered.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl<V> Drop for Subscription<V> {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl<V> std::fmt::Debug for Subscription<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initial_value_delivered() {
        let feed: Feed<&'static str, usize> = Feed::new();
        let sub = feed.subscribe("count", |key| key.len());

        assert_eq!(sub.latest(), Some(5));
        assert_eq!(sub.latest(), None);
    }

    #[test]
    fn test_publish_evaluates_each_key() {
        let feed: Feed<i32, i32> = Feed::new();
        let doubled = feed.subscribe(2, |_| 0);
        let tripled = feed.subscribe(3, |_| 0);

        feed.publish_with(|k| k * 10);

        assert_eq!(doubled.latest(), Some(20));
        assert_eq!(tripled.latest(), Some(30));
    }

    #[test]
    fn test_latest_drains_to_newest() {
        let feed: Feed<(), i32> = Feed::new();
        let sub = feed.subscribe((), |_| 1);

        feed.publish_with(|_| 2);
        feed.publish_with(|_| 3);

        assert_eq!(sub.latest(), Some(3));
        assert_eq!(sub.latest(), None);
    }

    #[test]
    fn test_concurrent_publish_never_leaves_subscriber_stale() {
        const WRITES: usize = 200;
        let feed: Feed<(), usize> = Feed::new();
        let version = AtomicUsize::new(0);

        let subs = std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 1..=WRITES {
                    version.store(i, Ordering::SeqCst);
                    feed.publish_with(|_| version.load(Ordering::SeqCst));
                }
            });

            (0..WRITES)
                .map(|_| feed.subscribe((), |_| version.load(Ordering::SeqCst)))
                .collect::<Vec<_>>()
        });

        for sub in subs {
            assert_eq!(sub.latest(), Some(WRITES));
        }
    }

    #[test]
    fn test_unsubscribe_detaches() {
        let feed: Feed<(), i32> = Feed::new();
        let sub = feed.subscribe((), |_| 0);
        assert_eq!(feed.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_detaches() {
        let feed: Feed<(), i32> = Feed::new();
        {
            let _sub = feed.subscribe((), |_| 0);
            assert_eq!(feed.subscriber_count(), 1);
        }
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_feed() {
        let feed: Feed<(), i32> = Feed::new();
        let sub = feed.subscribe((), |_| 7);
        drop(feed);

        assert_eq!(sub.latest(), Some(7));
        sub.unsubscribe();
    }

    #[test]
    fn test_ids_are_unique() {
        let feed: Feed<(), ()> = Feed::new();
        let a = feed.subscribe((), |_| ());
        let b = feed.subscribe((), |_| ());
        assert_ne!(a.id(), b.id());
    }
}
