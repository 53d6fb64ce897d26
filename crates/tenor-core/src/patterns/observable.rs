//! Change notification between market data and the objects derived from it.
//!
//! An [`Observable`] keeps weak references to its [`Observer`]s in an arena of
//! slots, keyed by the address of the observer's allocation. Observers are
//! never owned by what they watch; dropped observers are pruned lazily.
//!
//! Notification is synchronous. The set of observers is snapshotted and the
//! registry lock released before any observer runs, so an observer may
//! register, unregister or notify from inside [`Observer::update`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::warn;

use crate::error::{CoreError, CoreResult};

/// Something that reacts to changes in the observables it is registered with.
pub trait Observer: Send + Sync {
    /// Called once per notification of every observable this observer is
    /// registered with.
    fn update(&self) -> CoreResult<()>;
}

/// Access to the [`Observable`] embedded in a type.
pub trait AsObservable {
    /// Returns the observable that publishes this object's changes.
    fn as_observable(&self) -> &Observable;
}

type ObserverKey = usize;

fn key_of(observer: &Weak<dyn Observer>) -> ObserverKey {
    observer.as_ptr().cast::<()>() as usize
}

struct Slot {
    key: ObserverKey,
    observer: Weak<dyn Observer>,
}

#[derive(Default)]
struct Registry {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    index: HashMap<ObserverKey, usize>,
}

impl Registry {
    fn insert(&mut self, key: ObserverKey, observer: Weak<dyn Observer>) -> bool {
        if let Some(&slot) = self.index.get(&key) {
            match &mut self.slots[slot] {
                // A dead observer may leave its address to a new allocation.
                Some(existing) if existing.observer.strong_count() == 0 => {
                    existing.observer = observer;
                    return true;
                }
                _ => return false,
            }
        }

        let slot = Slot { key, observer };
        let position = match self.free.pop() {
            Some(position) => {
                self.slots[position] = Some(slot);
                position
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, position);
        true
    }

    fn remove(&mut self, key: ObserverKey) -> bool {
        match self.index.remove(&key) {
            Some(position) => {
                self.slots[position] = None;
                self.free.push(position);
                true
            }
            None => false,
        }
    }

    fn holds(&self, position: usize, key: ObserverKey) -> bool {
        matches!(self.slots.get(position), Some(Some(slot)) if slot.key == key)
    }

    fn prune(&mut self) {
        let dead: Vec<ObserverKey> = self
            .slots
            .iter()
            .flatten()
            .filter(|slot| slot.observer.strong_count() == 0)
            .map(|slot| slot.key)
            .collect();
        for key in dead {
            self.remove(key);
        }
    }
}

/// A set of weakly held observers that can be notified of a change.
#[derive(Default)]
pub struct Observable {
    registry: Mutex<Registry>,
}

impl Observable {
    /// Creates an observable with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Returns `false` if it was already registered.
    pub fn register_observer(&self, observer: Weak<dyn Observer>) -> bool {
        let key = key_of(&observer);
        self.registry.lock().insert(key, observer)
    }

    /// Registers the observer behind an `Arc`.
    pub fn register_with<O: Observer + 'static>(&self, observer: &Arc<O>) -> bool {
        let weak: Weak<dyn Observer> = Arc::downgrade(observer) as Weak<dyn Observer>;
        self.register_observer(weak)
    }

    /// Unregisters an observer. Returns `false` if it was not registered.
    pub fn unregister_observer(&self, observer: &Weak<dyn Observer>) -> bool {
        self.registry.lock().remove(key_of(observer))
    }

    /// Unregisters the observer behind an `Arc`.
    pub fn unregister_with<O: Observer + 'static>(&self, observer: &Arc<O>) -> bool {
        let weak: Weak<dyn Observer> = Arc::downgrade(observer) as Weak<dyn Observer>;
        self.unregister_observer(&weak)
    }

    /// Number of registered observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.registry
            .lock()
            .slots
            .iter()
            .flatten()
            .filter(|slot| slot.observer.strong_count() > 0)
            .count()
    }

    /// Calls [`Observer::update`] on every observer registered when the pass
    /// starts.
    ///
    /// Observers unregistered by an earlier observer in the same pass are
    /// skipped; observers registered during the pass wait for the next one.
    /// A failing observer does not stop the pass.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotificationFailed` carrying the first failure if
    /// any observer failed.
    pub fn notify_observers(&self) -> CoreResult<()> {
        let pending: Vec<(usize, ObserverKey, Weak<dyn Observer>)> = {
            let registry = self.registry.lock();
            registry
                .slots
                .iter()
                .enumerate()
                .filter_map(|(position, slot)| {
                    slot.as_ref()
                        .map(|slot| (position, slot.key, slot.observer.clone()))
                })
                .collect()
        };

        let mut failures = 0usize;
        let mut first = None;
        let mut saw_dead = false;

        for (position, key, observer) in pending {
            if !self.registry.lock().holds(position, key) {
                continue;
            }
            let Some(observer) = observer.upgrade() else {
                saw_dead = true;
                continue;
            };
            if let Err(err) = observer.update() {
                warn!(error = %err, "observer update failed");
                failures += 1;
                first.get_or_insert(err);
            }
        }

        if saw_dead {
            self.registry.lock().prune();
        }

        match first {
            None => Ok(()),
            Some(first) => Err(CoreError::NotificationFailed {
                failures,
                first: Box::new(first),
            }),
        }
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// An observer that records whether it has been notified.
///
/// # Example
///
/// ```rust
/// use tenor_core::patterns::Flag;
/// use tenor_core::quote::SimpleQuote;
///
/// let quote = SimpleQuote::new(0.01);
/// let flag = Flag::new();
/// flag.watch(quote.as_ref());
///
/// quote.set_value(0.02).unwrap();
/// assert!(flag.is_up());
/// assert_eq!(flag.notifications(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Flag {
    up: AtomicBool,
    notifications: AtomicUsize,
}

impl Flag {
    /// Creates a lowered flag.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers this flag with an observable.
    pub fn watch<T: AsObservable + ?Sized>(self: &Arc<Self>, target: &T) -> bool {
        target.as_observable().register_with(self)
    }

    /// Unregisters this flag from an observable.
    pub fn unwatch<T: AsObservable + ?Sized>(self: &Arc<Self>, target: &T) -> bool {
        target.as_observable().unregister_with(self)
    }

    /// True once notified, until [`Flag::lower`] is called.
    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }

    /// Lowers the flag. The notification count is kept.
    pub fn lower(&self) {
        self.up.store(false, Ordering::SeqCst);
    }

    /// Total number of notifications received.
    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl Observer for Flag {
    fn update(&self) -> CoreResult<()> {
        self.up.store(true, Ordering::SeqCst);
        self.notifications.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
