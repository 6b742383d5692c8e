//! `criminal-intent` - A local record book for office crimes
//!
//! This library provides the record model, the storage gateway that keeps the
//! whole record collection as one JSON blob in a key-value store, and the
//! persisted theme selection.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod crime;
pub mod error;
pub mod ids;
pub mod kv;
pub mod logging;
pub mod storage;
pub mod theme;

pub use config::Config;
pub use crime::{Crime, CrimeFormData};
pub use error::{Error, Result};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use logging::init_logging;
pub use storage::{CrimeStats, CrimeStorage};
pub use theme::{Theme, ThemeProvider};
