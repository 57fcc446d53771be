//! Static file server for the FamilyCoins frontend during development.

pub mod config;
pub mod routes;

pub use config::{ConfigError, DevServerConfig};
pub use routes::router;
