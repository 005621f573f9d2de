//! # Reverie Common Library
//!
//! Shared code for the Reverie journal-analysis workspace:
//! - Error type and result alias
//! - Configuration loading (TOML → environment → defaults)
//! - Clock abstraction used by the caches

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
pub use time::{Clock, ManualClock, SystemClock};
