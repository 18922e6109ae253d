//! # Presença Common Library
//!
//! Shared code for the presença services including:
//! - Common error types
//! - Configuration loading (CLI → env → TOML → default)
//! - SQLite database initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
