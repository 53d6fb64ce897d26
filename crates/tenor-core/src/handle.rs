//! Relinkable, observable references to shared objects.
//!
//! A [`Handle`] is a cell holding an `Arc<T>` that can be re-pointed at
//! runtime. Clones share the cell: a relink through any clone is seen by
//! every holder and notifies every observer of the handle.
//!
//! # Example
//!
//! ```rust
//! use tenor_core::handle::Handle;
//! use tenor_core::patterns::Flag;
//! use tenor_core::quote::{Quote, SimpleQuote};
//!
//! let handle = Handle::<dyn Quote>::empty();
//! let flag = Flag::new();
//! flag.watch(&handle);
//!
//! handle.link_to(SimpleQuote::new(0.01)).unwrap();
//! assert_eq!(flag.notifications(), 1);
//! assert_eq!(handle.current().unwrap().value().unwrap(), 0.01);
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::patterns::{AsObservable, Observable, Observer};

struct Link<T: ?Sized> {
    target: RwLock<Option<Arc<T>>>,
    observable: Observable,
    observe_target: bool,
    me: Weak<Link<T>>,
}

impl<T> Link<T>
where
    T: AsObservable + Send + Sync + ?Sized + 'static,
{
    fn create(target: Option<Arc<T>>, observe_target: bool) -> Arc<Self> {
        let link = Arc::new_cyclic(|me| Self {
            target: RwLock::new(None),
            observable: Observable::new(),
            observe_target,
            me: me.clone(),
        });
        if let Some(target) = target {
            link.attach(&target);
            *link.target.write() = Some(target);
        }
        link
    }

    fn as_observer(&self) -> Weak<dyn Observer> {
        self.me.clone() as Weak<dyn Observer>
    }

    fn attach(&self, target: &Arc<T>) {
        if self.observe_target {
            target.as_observable().register_observer(self.as_observer());
        }
    }

    fn detach(&self, target: &Arc<T>) {
        if self.observe_target {
            target.as_observable().unregister_observer(&self.as_observer());
        }
    }

    fn relink(&self, target: Option<Arc<T>>) -> CoreResult<()> {
        let previous = std::mem::replace(&mut *self.target.write(), target.clone());
        if let Some(previous) = &previous {
            self.detach(previous);
        }
        if let Some(target) = &target {
            self.attach(target);
        }
        self.observable.notify_observers()
    }
}

impl<T> Observer for Link<T>
where
    T: AsObservable + Send + Sync + ?Sized + 'static,
{
    fn update(&self) -> CoreResult<()> {
        self.observable.notify_observers()
    }
}

/// A shared, relinkable reference to a `T`.
///
/// When observing (the default), notifications from the current target are
/// forwarded to the handle's own observers, so dependents registered with
/// the handle see both relinks and changes of whatever it points to.
pub struct Handle<T: ?Sized> {
    link: Arc<Link<T>>,
}

impl<T> Handle<T>
where
    T: AsObservable + Send + Sync + ?Sized + 'static,
{
    /// Creates a handle linked to `target` that forwards its notifications.
    #[must_use]
    pub fn new(target: Arc<T>) -> Self {
        Self {
            link: Link::create(Some(target), true),
        }
    }

    /// Creates a handle linked to `target` that only notifies on relink.
    #[must_use]
    pub fn new_unobserved(target: Arc<T>) -> Self {
        Self {
            link: Link::create(Some(target), false),
        }
    }

    /// Creates a handle with nothing linked.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            link: Link::create(None, true),
        }
    }

    /// Returns the linked object.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyHandle` when nothing is linked.
    pub fn current(&self) -> CoreResult<Arc<T>> {
        self.link
            .target
            .read()
            .clone()
            .ok_or_else(CoreError::empty_handle::<T>)
    }

    /// True when nothing is linked.
    pub fn is_empty(&self) -> bool {
        self.link.target.read().is_none()
    }

    /// Points the handle at `target` and notifies its observers.
    ///
    /// Notifies even when `target` is the object already linked.
    ///
    /// # Errors
    ///
    /// Propagates observer failures from the notification pass.
    pub fn link_to(&self, target: Arc<T>) -> CoreResult<()> {
        self.link.relink(Some(target))
    }

    /// Empties the handle and notifies its observers.
    ///
    /// # Errors
    ///
    /// Propagates observer failures from the notification pass.
    pub fn unlink(&self) -> CoreResult<()> {
        self.link.relink(None)
    }

    /// True if both handles share the same cell.
    pub fn shares_cell_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.link, &other.link)
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized> AsObservable for Handle<T> {
    fn as_observable(&self) -> &Observable {
        &self.link.observable
    }
}

impl<T> Default for Handle<T>
where
    T: AsObservable + Send + Sync + ?Sized + 'static,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("linked", &self.link.target.read().is_some())
            .field("observe_target", &self.link.observe_target)
            .finish()
    }
}
