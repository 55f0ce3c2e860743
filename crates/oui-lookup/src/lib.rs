//! MAC address vendor lookup
//!
//! Resolves MAC addresses to the organization owning their OUI block,
//! using a local JSON cache of the IEEE registry and downloading the
//! registry when the cache has no answer.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod source;

pub use config::Config;
pub use engine::LookupEngine;
pub use error::{DatabaseError, LookupError, NetworkError};
pub use models::{BlockType, VendorRecord};
pub use oui_proto::MacAddress;
pub use source::{HttpRegistrySource, RegistrySource};
