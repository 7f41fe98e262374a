// wtag-core: Tag manager node adapter and the node server built around it.

pub mod address;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod driver;
pub mod error;
pub mod host;
pub mod manager;
pub mod model;
pub mod registry;
pub mod session;
pub mod store;
pub mod tag;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use address::NodeAddress;
pub use command::{CommandName, CommandPayload, NodeCommand};
pub use config::{AuthCredentials, ServerConfig};
pub use controller::Controller;
pub use driver::{Driver, DriverDef, DriverReport, TAG_DRIVERS, TAG_MANAGER_DRIVERS};
pub use error::CoreError;
pub use host::NodeHost;
pub use manager::{Discovery, TAG_MANAGER_NODE_ID, TagManagerNode};
pub use model::{MacAddress, TagManager, TagRecord, TemperatureUnit, UseTags};
pub use registry::NodeRegistry;
pub use session::{CloudSession, TagSession};
pub use store::DriverStore;
pub use tag::{TAG_NODE_ID, TagNode};
pub use wtag_api::DEFAULT_BASE_URL;
