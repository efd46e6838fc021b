//! Headless UI runtime for the LAN portal front end.
//!
//! Page controllers are built on four mechanisms, all single-threaded and
//! driven from one UI task:
//!
//! - **[`Registry`]**: publish/subscribe directory binding string ids to
//!   live widgets, so controllers and widget builders never reference each
//!   other directly.
//!
//! - **[`Router`]**: maps paths to typed view ids, keeps host history in
//!   sync through [`History`], and notifies listeners after each navigation.
//!   Consumes the one-shot [`REDIRECT_KEY`] on start-up.
//!
//! - **[`Validator`]**: short-circuiting rule chains with user-facing
//!   messages. Cross-field rules read siblings through [`Fields`].
//!
//! - **[`DataTable`]**: column metadata, case-insensitive substring search,
//!   and merge-back-by-key edits over an untouched canonical row set.
//!
//! [`Portal`] wraps the backend client with the session's credentials and
//! the client-side authorization checks.
//!
//! Every handle here is `Rc`-based and expects to live on one thread.

pub mod error;
pub mod registry;
pub mod router;
pub mod service;
pub mod session;
pub mod table;
pub mod validation;
pub mod widget;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use registry::Registry;
pub use router::{History, MemoryHistory, Route, Router};
pub use service::{Backend, Portal};
pub use session::{CREDENTIALS_KEY, MemoryStore, REDIRECT_KEY, SessionStore};
pub use table::{Cell, Column, ColumnKind, DataTable, Row};
pub use validation::{Fields, NoFields, Rule, Validator};
pub use widget::{Button, Checkbox, Component, InputKind, TextInput};

// Backend types the pages handle directly.
pub use lanportal_api::{Credentials, Device, Login, UserInput, UserView};
