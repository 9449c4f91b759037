//! # Configuration
//!
//! Client configuration shared by the web crate and the CLI.

pub mod client;

pub use client::{ClientConfig, ConfigError};
