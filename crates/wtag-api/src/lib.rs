// wtag-api: Async Rust client for the Wireless Sensor Tags cloud API

pub mod auth;
pub mod client;
pub mod error;
pub mod managers;
pub mod models;
pub mod tags;
pub mod transport;

pub use client::{Service, WirelessTagClient};
pub use error::Error;
pub use models::{TagEntry, TagManagerEntry};
pub use transport::TransportConfig;

/// Production endpoint of the Wireless Sensor Tags cloud.
pub const DEFAULT_BASE_URL: &str = "https://www.mytaglist.com";
