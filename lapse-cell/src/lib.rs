//! Lazily-expiring value cells.
//!
//! An [`ExpiringCell`] holds at most one value and forgets it once its TTL
//! has elapsed. There is no timer: expiry is checked whenever the cell is
//! read. [`SharedExpiringCell`] puts the same cell behind a mutex for use
//! across threads.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod cell;
mod shared;
mod stats;

pub use cell::ExpiringCell;
pub use shared::SharedExpiringCell;
pub use stats::CellStats;

pub use lapse_core::{
    CellConfig, Clock, LapseError, ManualClock, ProducerError, Result, SystemClock,
};
