//! Synchronous, single-threaded change observation.
//!
//! An [`Observable`] holds a value and a registry of listeners. Setting the
//! value publishes it to every live listener in subscription order. A new
//! listener immediately receives the current value, so combined streams
//! start as soon as every input has a value.
//!
//! Stream stages are plain closure adapters:
//! - [`remove_duplicates`] drops a value equal to the one before it.
//! - [`combine_latest`] joins two observables and fires with the latest pair
//!   once both have produced a value.
//!
//! Every subscription returns a [`Subscription`] guard. Dropping it (or
//! calling [`Subscription::cancel`]) unregisters the listener; a listener
//! cancelled while a publish is in flight is skipped for the rest of it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Entry<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    listener: Listener<T>,
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

/// A value whose changes can be observed.
pub struct Observable<T> {
    value: RefCell<T>,
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value` and publish it to every listener, even when it equals
    /// the previous value. Use [`remove_duplicates`] on the listener side to
    /// suppress repeats.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.publish(&value);
    }

    /// Register `listener` and immediately call it with the current value.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(listener);
        let active = Rc::new(Cell::new(true));

        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push(Entry {
                id,
                active: Rc::clone(&active),
                listener: Rc::clone(&listener),
            });
            id
        };

        let registry: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        let subscription = Subscription::new(move || {
            active.set(false);
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().entries.retain(|entry| entry.id != id);
            }
        });

        let current = self.get();
        listener(&current);
        subscription
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    fn publish(&self, value: &T) {
        // Snapshot so listeners can subscribe or cancel while being notified.
        let snapshot: Vec<(Rc<Cell<bool>>, Listener<T>)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.listener)))
            .collect();

        for (active, listener) in snapshot {
            if active.get() {
                listener(value);
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.borrow())
            .field("listeners", &self.registry.borrow().entries.len())
            .finish()
    }
}

/// Guard for a registered listener. Cancels on drop.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A single guard that cancels every subscription in `subscriptions`.
    pub fn all(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || {
            for mut subscription in subscriptions {
                subscription.cancel();
            }
        })
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Wrap `listener` so it only sees values that differ from the previous one.
pub fn remove_duplicates<T, F>(listener: F) -> impl Fn(&T) + 'static
where
    T: PartialEq + Clone + 'static,
    F: Fn(&T) + 'static,
{
    let last: RefCell<Option<T>> = RefCell::new(None);
    move |value: &T| {
        {
            let mut last = last.borrow_mut();
            if last.as_ref() == Some(value) {
                return;
            }
            *last = Some(value.clone());
        }
        listener(value);
    }
}

/// Call `listener` with the latest value of both observables whenever either
/// changes, once both have produced a value.
pub fn combine_latest<A, B, F>(a: &Observable<A>, b: &Observable<B>, listener: F) -> Subscription
where
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(&A, &B) + 'static,
{
    let latest: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));
    let listener = Rc::new(listener);

    let first = {
        let latest = Rc::clone(&latest);
        let listener = Rc::clone(&listener);
        a.subscribe(move |value: &A| {
            let pair = {
                let mut latest = latest.borrow_mut();
                latest.0 = Some(value.clone());
                latest.1.clone().map(|b| (value.clone(), b))
            };
            if let Some((a, b)) = pair {
                listener(&a, &b);
            }
        })
    };

    let second = b.subscribe(move |value: &B| {
        let pair = {
            let mut latest = latest.borrow_mut();
            latest.1 = Some(value.clone());
            latest.0.clone().map(|a| (a, value.clone()))
        };
        if let Some((a, b)) = pair {
            listener(&a, &b);
        }
    });

    Subscription::all(vec![first, second])
}
