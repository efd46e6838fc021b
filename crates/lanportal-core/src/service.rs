// ── Portal service facade ──
//
// Holds the caller's credentials and fronts every backend operation the
// pages use. Role and identity checks run here first as a fast-fail; the
// backend enforces the same rules. No `RefCell` borrow is held across an
// `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use lanportal_api::{Client, Credentials, Device, Login, UserInput, UserView};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::CoreError;
use crate::session::{CREDENTIALS_KEY, SessionStore};

type ApiResult<T> = Result<T, lanportal_api::Error>;

/// Raw backend operations, one per endpoint.
///
/// `lanportal_api::Client` is the production implementation; tests swap in
/// an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn login(&self, login: &Login) -> ApiResult<Credentials>;
    async fn create_user(&self, user: &UserInput) -> ApiResult<()>;
    async fn get_user(&self, token: &str, id: Uuid) -> ApiResult<UserView>;
    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserView>>;
    async fn list_user_devices(&self, token: &str, user_id: Uuid) -> ApiResult<Vec<Device>>;
    async fn add_device(&self, token: &str, user_id: Uuid) -> ApiResult<()>;
    async fn set_allowed(&self, token: &str, id: Uuid, allowed: bool) -> ApiResult<()>;
}

impl Backend for Client {
    async fn login(&self, login: &Login) -> ApiResult<Credentials> {
        Client::login(self, login).await
    }

    async fn create_user(&self, user: &UserInput) -> ApiResult<()> {
        Client::create_user(self, user).await
    }

    async fn get_user(&self, token: &str, id: Uuid) -> ApiResult<UserView> {
        Client::get_user(self, token, id).await
    }

    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserView>> {
        Client::list_users(self, token).await
    }

    async fn list_user_devices(&self, token: &str, user_id: Uuid) -> ApiResult<Vec<Device>> {
        Client::list_user_devices(self, token, user_id).await
    }

    async fn add_device(&self, token: &str, user_id: Uuid) -> ApiResult<()> {
        Client::add_device(self, token, user_id).await
    }

    async fn set_allowed(&self, token: &str, id: Uuid, allowed: bool) -> ApiResult<()> {
        Client::set_allowed(self, token, id, allowed).await
    }
}

/// Session-aware access to the portal backend.
pub struct Portal<B = Client> {
    backend: B,
    store: Rc<dyn SessionStore>,
    creds: RefCell<Option<Credentials>>,
}

impl<B: Backend> Portal<B> {
    /// Wrap `backend`, picking up credentials persisted by an earlier run.
    pub fn new(backend: B, store: Rc<dyn SessionStore>) -> Self {
        let creds = store.get(CREDENTIALS_KEY).and_then(|raw| {
            serde_json::from_str::<Credentials>(&raw)
                .inspect_err(|e| {
                    warn!(error = %e, "discarding unreadable stored credentials");
                    store.remove(CREDENTIALS_KEY);
                })
                .ok()
        });
        if let Some(creds) = &creds {
            debug!(user_id = %creds.user_id, role = %creds.role, "restored session");
        }
        Self {
            backend,
            store,
            creds: RefCell::new(creds),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.creds.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.creds.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.creds.borrow().as_ref().is_some_and(Credentials::is_admin)
    }

    fn remember(&self, creds: Credentials) {
        match serde_json::to_string(&creds) {
            Ok(raw) => self.store.set(CREDENTIALS_KEY, &raw),
            Err(e) => warn!(error = %e, "could not persist credentials"),
        }
        *self.creds.borrow_mut() = Some(creds);
    }

    fn require_login(&self) -> Result<Credentials, CoreError> {
        self.credentials().ok_or(CoreError::NotAuthenticated)
    }

    /// Credentials allowed to read data owned by `id`: the owner or an admin.
    fn require_owner_or_admin(&self, id: Uuid) -> Result<Credentials, CoreError> {
        let creds = self.require_login()?;
        if creds.user_id != id && !creds.is_admin() {
            return Err(CoreError::Forbidden);
        }
        Ok(creds)
    }

    fn require_admin(&self) -> Result<Credentials, CoreError> {
        let creds = self.require_login()?;
        if !creds.is_admin() {
            return Err(CoreError::Forbidden);
        }
        Ok(creds)
    }

    // ── Session ─────────────────────────────────────────────────────

    pub async fn login(&self, login: &Login) -> Result<Credentials, CoreError> {
        let creds = self.backend.login(login).await?;
        info!(username = %login.username, role = %creds.role, "logged in");
        self.remember(creds.clone());
        Ok(creds)
    }

    /// Forget the session. Callers navigate to the login page afterwards.
    pub fn logout(&self) {
        if self.creds.borrow_mut().take().is_some() {
            info!("logged out");
        }
        self.store.remove(CREDENTIALS_KEY);
    }

    /// Create an account and log into it.
    pub async fn register(&self, user: &UserInput) -> Result<Credentials, CoreError> {
        if self.is_authenticated() {
            return Err(CoreError::AlreadyAuthenticated);
        }
        self.backend.create_user(user).await?;
        info!(username = %user.username, "account created");

        let login = Login {
            username: user.username.clone(),
            password: user.password.clone(),
        };
        self.login(&login).await
    }

    /// Re-read the caller's role from the backend. Any failure ends the
    /// session. The built-in administrator has no user record and is left
    /// as is.
    pub async fn refresh_auth_state(&self) {
        let Some(creds) = self.credentials() else {
            return;
        };
        if creds.is_builtin_admin() {
            return;
        }

        match self.backend.get_user(&creds.biscuit, creds.user_id).await {
            Ok(user) if user.role != creds.role => {
                debug!(from = %creds.role, to = %user.role, "role changed");
                self.remember(Credentials {
                    role: user.role,
                    ..creds
                });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "session no longer valid");
                self.logout();
            }
        }
    }

    // ── Users and devices ───────────────────────────────────────────

    /// Enroll the calling machine for the logged-in user.
    pub async fn add_device(&self) -> Result<(), CoreError> {
        let creds = self.require_login()?;
        self.backend.add_device(&creds.biscuit, creds.user_id).await?;
        Ok(())
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserView, CoreError> {
        let creds = self.require_owner_or_admin(id)?;
        Ok(self.backend.get_user(&creds.biscuit, id).await?)
    }

    pub async fn get_user_devices(&self, id: Uuid) -> Result<Vec<Device>, CoreError> {
        let creds = self.require_owner_or_admin(id)?;
        Ok(self.backend.list_user_devices(&creds.biscuit, id).await?)
    }

    /// Every user. Admin only.
    pub async fn get_users(&self) -> Result<Vec<UserView>, CoreError> {
        let creds = self.require_admin()?;
        Ok(self.backend.list_users(&creds.biscuit).await?)
    }

    /// Grant or revoke internet access. Admin only.
    pub async fn set_allowed(&self, id: Uuid, allowed: bool) -> Result<(), CoreError> {
        let creds = self.require_admin()?;
        self.backend.set_allowed(&creds.biscuit, id, allowed).await?;
        Ok(())
    }
}

impl<B> std::fmt::Debug for Portal<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let creds = self.creds.borrow();
        f.debug_struct("Portal")
            .field("user_id", &creds.as_ref().map(|c| c.user_id))
            .field("role", &creds.as_ref().map(|c| c.role.as_str()))
            .finish_non_exhaustive()
    }
}
