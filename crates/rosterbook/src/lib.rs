//! `rosterbook` - A student roster manager with durable flat-file storage
//!
//! This library provides the core functionality for keeping a small collection
//! of student records (identity, demographics, and per-subject marks) in sync
//! with a flat JSON file on disk.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod record;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::Student;
pub use store::{RosterStats, Store};
