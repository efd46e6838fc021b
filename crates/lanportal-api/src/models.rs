// Backend request/response types
//
// Field names follow the backend's snake_case JSON. Passwords are carried as
// `SecretString` and only exposed while building a request body.

use chrono::NaiveDateTime;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role string the backend assigns to the built-in administrator.
pub const ADMIN_ROLE: &str = "admin";

// ── Authentication ───────────────────────────────────────────────────

/// Username/password pair sent to `POST /login`.
#[derive(Debug, Clone)]
pub struct Login {
    pub username: String,
    pub password: SecretString,
}

impl Login {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Session token returned by `POST /login`.
///
/// `biscuit` is the bearer token for every authenticated call. The built-in
/// administrator logs in with the nil UUID as `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub biscuit: String,
    pub role: String,
    pub user_id: Uuid,
}

impl Credentials {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Whether these credentials belong to the built-in administrator.
    pub fn is_builtin_admin(&self) -> bool {
        self.user_id.is_nil()
    }
}

// ── Users ────────────────────────────────────────────────────────────

/// Registration payload for `POST /users`.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: SecretString,
    pub phone: String,
}

/// A user as returned by `GET /users` and `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub is_allowed: bool,
}

/// Body of `PATCH /users` when toggling internet access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedPatch {
    pub id: Uuid,
    pub is_allowed: bool,
}

// ── Devices ──────────────────────────────────────────────────────────

/// A network-access device enrolled for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub mac: String,
    pub user_id: Uuid,
    /// Whether the router currently lets this device through.
    pub internet: bool,
    pub date_time: NaiveDateTime,
}

/// Body of `POST /devices`. The backend resolves the MAC from the caller's
/// address, so only the owner is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInput {
    pub user_id: Uuid,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_round_trip_backend_shape() {
        let creds: Credentials = serde_json::from_value(json!({
            "biscuit": "tok",
            "role": "admin",
            "user_id": "00000000-0000-0000-0000-000000000000"
        }))
        .unwrap();
        assert!(creds.is_admin());
        assert!(creds.is_builtin_admin());
    }

    #[test]
    fn device_parses_naive_timestamp() {
        let device: Device = serde_json::from_value(json!({
            "id": "6f0b3f5e-8f4e-4c43-9a5b-0d7b9c1f2a11",
            "mac": "aa:bb:cc:dd:ee:ff",
            "user_id": "1d5b2f0a-3c4e-4f6a-8b9c-0d1e2f3a4b5c",
            "internet": true,
            "date_time": "2024-03-02T18:45:10.123456"
        }))
        .unwrap();
        assert!(device.internet);
        assert_eq!(device.date_time.format("%H:%M").to_string(), "18:45");
    }
}
