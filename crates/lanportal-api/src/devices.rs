// Device endpoints

use tracing::debug;
use uuid::Uuid;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Device, DeviceInput};

impl Client {
    /// List the devices enrolled for a user.
    ///
    /// `GET /devices/{user_id}`
    pub async fn list_user_devices(&self, token: &str, user_id: Uuid) -> Result<Vec<Device>, Error> {
        let url = self.url(&format!("devices/{user_id}"))?;
        self.get(url, Some(token)).await
    }

    /// Enroll the calling machine as a device of `user_id`.
    ///
    /// `POST /devices` with `{"user_id": "..."}`
    pub async fn add_device(&self, token: &str, user_id: Uuid) -> Result<(), Error> {
        let url = self.url("devices")?;
        debug!(%user_id, "enrolling device");
        self.post(url, &DeviceInput { user_id }, Some(token)).await
    }
}
