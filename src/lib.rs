//! Photoforge - batch photo conversion and host health checks
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod conversion;
pub mod health;
pub mod logging;
pub mod network;
pub mod progress;
