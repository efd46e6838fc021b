// User endpoints
//
// Reading a single user is allowed for the user themself and for admins;
// listing and patching are admin-only. The backend enforces both.

use tracing::debug;
use uuid::Uuid;

use crate::client::Client;
use crate::error::Error;
use crate::models::{AllowedPatch, UserView};

impl Client {
    /// Fetch one user.
    ///
    /// `GET /users/{id}`
    pub async fn get_user(&self, token: &str, id: Uuid) -> Result<UserView, Error> {
        let url = self.url(&format!("users/{id}"))?;
        self.get(url, Some(token)).await
    }

    /// List every user.
    ///
    /// `GET /users`
    pub async fn list_users(&self, token: &str) -> Result<Vec<UserView>, Error> {
        let url = self.url("users")?;
        debug!("listing users");
        self.get(url, Some(token)).await
    }

    /// Grant or revoke internet access for a user.
    ///
    /// `PATCH /users` with `{"id": "...", "is_allowed": bool}`
    pub async fn set_allowed(&self, token: &str, id: Uuid, allowed: bool) -> Result<(), Error> {
        let url = self.url("users")?;
        debug!(%id, allowed, "updating internet access");
        let body = AllowedPatch {
            id,
            is_allowed: allowed,
        };
        self.patch(url, &body, Some(token)).await
    }
}
