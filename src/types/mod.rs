//! Core type definitions using newtype patterns for type safety.
//!
//! These types prevent common logic errors by making invalid states unrepresentable
//! at compile time.

mod port;
mod subnet;

pub use port::{Port, PortError, PortSpec, DEFAULT_PORTS};
pub use subnet::{is_valid_cidr, validate_cidr, Subnet, SubnetError};
