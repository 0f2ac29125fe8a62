//! Core types and shared functionality for mcp-unfurl.
//!
//! This crate provides:
//! - URL-keyed title cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, TitleRecord};
pub use config::AppConfig;
pub use error::Error;
