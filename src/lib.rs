//! Foldermonitor - routes finished downloads into the media library
//!
//! Watches one directory for new subfolders, waits for the download to
//! settle, copies media files to their destinations by extension and then
//! removes the folder. The library crate exposes the pipeline pieces for
//! integration testing.

pub mod cleanup;
pub mod config;
pub mod logging;
pub mod monitor;
pub mod processor;
pub mod route;
pub mod watch;
