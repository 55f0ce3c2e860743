//! MAC address and IEEE OUI registry primitives
//!
//! This library holds the pure parsing pieces of the vendor lookup: MAC
//! address notation handling and the registry text format. It performs no
//! I/O and can be reused by any tool that needs OUI data.

pub mod mac;
pub mod registry;

pub use mac::{MacAddress, MacParseError};
pub use registry::{parse_registry, RegistryError};
