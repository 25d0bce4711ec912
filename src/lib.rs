//! Subscout - subtitle automation for Plex
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod downloader;
pub mod plex;
pub mod processor;
pub mod providers;
pub mod server;
pub mod startup;
pub mod subtitles;
