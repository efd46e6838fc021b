//! Client-side router: path → view, with history sync and change listeners.
//!
//! The router owns a static route table and exactly one live view, built by a
//! caller-supplied factory from the current route's view id. Navigation
//! replaces the view wholesale and then notifies listeners in registration
//! order. The host's history is reached through the [`History`] trait;
//! [`MemoryHistory`] is the in-process implementation the terminal front end
//! uses.
//!
//! On construction the router consumes the one-shot [`REDIRECT_KEY`] from the
//! session store, so a front end that wrote its last path before exiting
//! comes back on the same page exactly once.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::session::{REDIRECT_KEY, SessionStore};

const ROOT: &str = "/";

/// One navigable page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<K> {
    pub path: String,
    /// Display name, used as the page title.
    pub name: String,
    pub view: K,
}

impl<K> Route<K> {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: K) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
        }
    }
}

// ── Host history ────────────────────────────────────────────────────

/// Navigation history provided by the host.
pub trait History {
    /// Scheme and authority prefix stripped from absolute paths.
    fn origin(&self) -> String;

    fn current_path(&self) -> String;

    /// Add an entry after the current one, discarding forward entries.
    fn push(&self, path: &str);

    /// Overwrite the current entry.
    fn replace(&self, path: &str);
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// History kept in memory, with back/forward.
#[derive(Debug)]
pub struct MemoryHistory {
    origin: String,
    stack: RefCell<Stack>,
}

impl MemoryHistory {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            stack: RefCell::new(Stack {
                entries: vec![ROOT.to_owned()],
                index: 0,
            }),
        }
    }

    /// Step back one entry and hand its path to `restore`.
    ///
    /// `None` when there is nothing behind. The step is undone if `restore`
    /// fails, so the current entry always names the shown route.
    pub fn back<E>(&self, restore: impl FnOnce(&str) -> Result<(), E>) -> Option<Result<(), E>> {
        let target = self.stack.borrow().index.checked_sub(1)?;
        self.step_to(target, restore)
    }

    /// Step forward one entry and hand its path to `restore`, as [`back`](Self::back).
    pub fn forward<E>(
        &self,
        restore: impl FnOnce(&str) -> Result<(), E>,
    ) -> Option<Result<(), E>> {
        let target = self.stack.borrow().index + 1;
        self.step_to(target, restore)
    }

    fn step_to<E>(
        &self,
        target: usize,
        restore: impl FnOnce(&str) -> Result<(), E>,
    ) -> Option<Result<(), E>> {
        let (previous, path) = {
            let mut stack = self.stack.borrow_mut();
            let path = stack.entries.get(target).cloned()?;
            (std::mem::replace(&mut stack.index, target), path)
        };

        // No borrow is held while restoring; the new view may push entries.
        let result = restore(&path);
        if result.is_err() {
            self.stack.borrow_mut().index = previous;
        }
        Some(result)
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.borrow().entries.is_empty()
    }
}

impl History for MemoryHistory {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn current_path(&self) -> String {
        let stack = self.stack.borrow();
        stack
            .entries
            .get(stack.index)
            .cloned()
            .unwrap_or_else(|| ROOT.to_owned())
    }

    fn push(&self, path: &str) {
        let mut stack = self.stack.borrow_mut();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(path.to_owned());
        stack.index = keep;
    }

    fn replace(&self, path: &str) {
        let mut stack = self.stack.borrow_mut();
        let index = stack.index;
        if let Some(entry) = stack.entries.get_mut(index) {
            path.clone_into(entry);
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

type Factory<K, V> = Box<dyn Fn(&K) -> V>;
type Listener<K, V> = Rc<dyn Fn(&Router<K, V>)>;

struct State<V> {
    current: usize,
    view: V,
    /// Bumped by every navigation; a build finishing under a newer
    /// generation was superseded and is discarded.
    generation: u64,
}

/// Maps paths to views and tracks the current one.
pub struct Router<K, V> {
    routes: Vec<Route<K>>,
    history: Rc<dyn History>,
    factory: Factory<K, V>,
    state: RefCell<State<V>>,
    listeners: RefCell<Vec<Listener<K, V>>>,
}

impl<K: 'static, V: 'static> Router<K, V> {
    /// Build the router and its initial view.
    ///
    /// The initial route is the pending redirect when it names a configured
    /// path, `/` otherwise. The current history entry is replaced with it.
    pub fn new(
        routes: Vec<Route<K>>,
        history: Rc<dyn History>,
        session: &dyn SessionStore,
        factory: impl Fn(&K) -> V + 'static,
    ) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert(route.path.as_str()) {
                return Err(CoreError::DuplicateRoute {
                    path: route.path.clone(),
                });
            }
        }

        let redirect = session
            .take(REDIRECT_KEY)
            .map(|p| normalize(&history.origin(), &p));
        let find = |path: &str| routes.iter().position(|r| r.path == path);

        let current = match redirect {
            Some(path) => find(path.as_str()).or_else(|| {
                warn!(%path, "ignoring redirect to unconfigured path");
                find(ROOT)
            }),
            None => find(ROOT),
        }
        .ok_or_else(|| CoreError::RouteNotFound {
            path: ROOT.to_owned(),
        })?;

        let route = &routes[current];
        history.replace(&route.path);
        debug!(path = %route.path, "router started");
        let view = factory(&route.view);

        Ok(Self {
            routes,
            history,
            factory: Box::new(factory),
            state: RefCell::new(State {
                current,
                view,
                generation: 0,
            }),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Navigate to `path`, pushing a history entry.
    ///
    /// `path` may carry the history origin as a prefix. An unconfigured path
    /// is rejected and leaves the current route and view untouched.
    pub fn navigate_to(&self, path: &str) -> Result<(), CoreError> {
        self.navigate(path, true)
    }

    /// Navigate without touching history, for back/forward notifications.
    pub fn restore(&self, path: &str) -> Result<(), CoreError> {
        self.navigate(path, false)
    }

    /// Register a callback run after every successful navigation.
    pub fn add_listener(&self, listener: impl Fn(&Self) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn navigate(&self, path: &str, push: bool) -> Result<(), CoreError> {
        let path = normalize(&self.history.origin(), path);
        let Some(index) = self.routes.iter().position(|r| r.path == path) else {
            warn!(%path, "navigation to unconfigured path");
            return Err(CoreError::RouteNotFound { path });
        };

        let generation = {
            let mut state = self.state.borrow_mut();
            state.current = index;
            state.generation += 1;
            state.generation
        };
        if push {
            self.history.push(&path);
        }
        debug!(%path, push, "navigating");

        // The factory may navigate again; no borrow is held while it runs.
        let view = (self.factory)(&self.routes[index].view);
        let old = {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                debug!(%path, "navigation superseded during view construction");
                return Ok(());
            }
            std::mem::replace(&mut state.view, view)
        };
        drop(old);

        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(self);
        }
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn route(&self) -> &Route<K> {
        let index = self.state.borrow().current;
        &self.routes[index]
    }

    pub fn path(&self) -> &str {
        &self.route().path
    }

    pub fn name(&self) -> &str {
        &self.route().name
    }

    pub fn view_id(&self) -> &K {
        &self.route().view
    }

    pub fn routes(&self) -> &[Route<K>] {
        &self.routes
    }

    pub fn history(&self) -> &Rc<dyn History> {
        &self.history
    }
}

impl<K: 'static, V: Clone + 'static> Router<K, V> {
    /// The live view for the current route.
    pub fn view(&self) -> V {
        self.state.borrow().view.clone()
    }
}

impl<K, V> fmt::Debug for Router<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Router")
            .field("path", &self.routes.get(state.current).map(|r| &r.path))
            .field("routes", &self.routes.len())
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

fn normalize(origin: &str, path: &str) -> String {
    let rest = if origin.is_empty() {
        path
    } else {
        path.strip_prefix(origin).unwrap_or(path)
    };
    if rest.is_empty() {
        ROOT.to_owned()
    } else {
        rest.to_owned()
    }
}
