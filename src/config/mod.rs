//! Configuration loading and management for the SIT ledger.
//!
//! This module loads the SIT policy (conversion threshold and grace period)
//! from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use sit_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/sit").unwrap();
//! println!("Loaded policy: {}", config.policy().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::SitPolicy;
