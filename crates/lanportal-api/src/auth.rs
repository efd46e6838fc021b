// Authentication and registration endpoints
//
// Login trades a username/password for a bearer token. Registration is
// unauthenticated; the caller logs in afterwards.

use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Credentials, Login, UserInput};

impl Client {
    /// Authenticate and obtain a session token.
    ///
    /// `POST /login` with `{"username": "...", "password": "..."}`
    pub async fn login(&self, login: &Login) -> Result<Credentials, Error> {
        let url = self.url("login")?;
        debug!(username = %login.username, "logging in");

        let body = json!({
            "username": login.username,
            "password": login.password.expose_secret(),
        });

        let creds: Credentials = self.post_json(url, &body, None).await?;
        debug!(role = %creds.role, "login successful");
        Ok(creds)
    }

    /// Create a new user account.
    ///
    /// `POST /users` with the full registration form.
    pub async fn create_user(&self, user: &UserInput) -> Result<(), Error> {
        let url = self.url("users")?;
        debug!(username = %user.username, "registering user");

        let body = json!({
            "username": user.username,
            "firstname": user.firstname,
            "lastname": user.lastname,
            "email": user.email,
            "password": user.password.expose_secret(),
            "phone": user.phone,
        });

        self.post(url, &body, None).await
    }
}
