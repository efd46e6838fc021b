// ── Component registry ──
//
// Publish/subscribe directory binding string ids to live widget instances.
// Page controllers subscribe to the ids they configure; whoever builds the
// widget registers it. Order of the two calls does not matter.
//
// Every registration replays to all subscribers of that id, so a callback
// fires again when an id is rebound. Nothing is ever unregistered.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

type Callback<C> = Rc<dyn Fn(&C)>;

struct Inner<C> {
    bound: HashMap<String, C>,
    subscribers: HashMap<String, Vec<Callback<C>>>,
}

/// Shared handle to one session's component directory.
///
/// Cloning yields another handle to the same directory.
pub struct Registry<C> {
    inner: Rc<RefCell<Inner<C>>>,
}

impl<C> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                bound: HashMap::new(),
                subscribers: HashMap::new(),
            })),
        }
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Registry")
            .field("bound", &inner.bound.len())
            .field("subscribed", &inner.subscribers.len())
            .finish()
    }
}

impl<C: Clone + 'static> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `instance` (last registration wins), then hand the
    /// instance to every subscriber of `id` in subscription order.
    ///
    /// Callbacks run with no internal borrow held, so they may register or
    /// subscribe on this registry. Subscribers added while this call is
    /// dispatching are not invoked by it.
    pub fn register(&self, id: impl Into<String>, instance: C) {
        let id = id.into();
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            let replaced = inner.bound.insert(id.clone(), instance.clone()).is_some();
            debug!(%id, replaced, "component registered");
            inner.subscribers.get(&id).cloned().unwrap_or_default()
        };

        for callback in callbacks {
            callback(&instance);
        }
    }

    /// Append `callback` to the subscribers of `id`. When `id` is already
    /// bound, the callback also runs right away with the current instance.
    pub fn subscribe(&self, id: impl Into<String>, callback: impl Fn(&C) + 'static) {
        let id = id.into();
        let callback: Callback<C> = Rc::new(callback);
        let current = {
            let mut inner = self.inner.borrow_mut();
            inner
                .subscribers
                .entry(id.clone())
                .or_default()
                .push(Rc::clone(&callback));
            inner.bound.get(&id).cloned()
        };

        trace!(%id, bound = current.is_some(), "component subscribed");
        if let Some(instance) = current {
            callback(&instance);
        }
    }

    /// The instance currently bound to `id`.
    pub fn get(&self, id: &str) -> Option<C> {
        self.inner.borrow().bound.get(id).cloned()
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.inner.borrow().bound.contains_key(id)
    }
}
