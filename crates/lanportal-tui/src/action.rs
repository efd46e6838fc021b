//! Everything that can happen in the app. Widget callbacks and router
//! listeners only ever send actions; the app loop performs them.

use lanportal_core::Row;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Resize(u16, u16),
    Render,

    // ── Navigation ──
    Navigate(String),
    Back,
    Forward,
    /// The router installed a new view.
    ViewChanged,

    // ── Page operations ──
    Login,
    Register,
    /// Decide what the home page shows.
    CheckInternet,
    /// Try to get the logged-in user online from the no-internet page.
    RetryInternet,
    LoadUsers,
    /// Flip internet access for the user in this row.
    ToggleAllowed(Row),
    Logout,

    // ── Alerts ──
    Alert(String),
    DismissAlert,
}

impl Action {
    pub fn navigate(path: &str) -> Self {
        Self::Navigate(path.to_owned())
    }

    /// Whether performing this action waits on the backend.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Self::Login
                | Self::Register
                | Self::CheckInternet
                | Self::RetryInternet
                | Self::LoadUsers
                | Self::ToggleAllowed(_)
        )
    }
}

/// Cloneable sending half handed to widget callbacks.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: UnboundedSender<Action>,
}

impl Dispatcher {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self { tx }
    }

    /// Queue `action` for the app loop. Dropped silently once the loop is gone.
    pub fn send(&self, action: Action) {
        if let Err(e) = self.tx.send(action) {
            debug!(action = ?e.0, "app loop closed, action dropped");
        }
    }
}
