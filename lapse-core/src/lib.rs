//! # Lapse Core
//!
//! Core errors, clocks, and configuration for lapse expiring cells.
//!
//! This crate provides the building blocks shared by the cell implementations:
//!
//! - **Errors**: Configuration and producer failures
//! - **Constants**: TTL bounds and defaults
//! - **Clock**: The time source a cell compares deadlines against
//! - **Config**: Serializable cell configuration with validation
//!
//! ## Example
//!
//! ```rust
//! use lapse_core::{CellConfig, LapseError};
//!
//! let config: CellConfig = serde_json::from_str(r#"{"expires_after_secs": 5.0}"#).unwrap();
//! assert_eq!(config.ttl().unwrap().as_secs(), 5);
//!
//! let bad = CellConfig::from_secs(-1.0);
//! assert!(matches!(bad.validate(), Err(LapseError::ConfigError(_))));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used items at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CellConfig;
pub use constants::*;
pub use error::{LapseError, ProducerError, Result};
