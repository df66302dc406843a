//! Foldermonitor-Common: shared error type and path helpers.
//!
//! - **Error Handling**: the [`Error`] enum and [`Result`] alias used by every
//!   fallible operation of the watcher, router and deleter.
//! - **Path Utilities**: extension matching used to route files by type.
//!
//! # Examples
//!
//! ```
//! use foldermonitor_common::paths::has_extension;
//! use foldermonitor_common::{Error, Result};
//! use std::path::Path;
//!
//! assert!(has_extension(Path::new("track.m4a"), "m4a"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_a_file("/tmp/folder"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod paths;

pub use error::{Error, Result};
