// lanportal-api: Async Rust client for the LAN portal backend API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;
pub mod users;

pub use client::Client;
pub use error::Error;
pub use models::{AllowedPatch, Credentials, Device, DeviceInput, Login, UserInput, UserView};
pub use transport::TransportConfig;
