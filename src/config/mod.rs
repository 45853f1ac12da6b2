//! Configuration management for netsweep.
//!
//! Provides XDG-compliant settings storage. Command-line flags override
//! whatever the settings file says.

mod settings;

pub use settings::{AppSettings, Paths};
