//! SQLite-backed title cache.
//!
//! This module provides a persistent URL-keyed title store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - One row per URL, overwritten on every re-resolution
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Time-based eviction for the retention sweep

pub mod connection;
pub mod migrations;
pub mod titles;

pub use crate::Error;

pub use connection::CacheDb;
pub use titles::TitleRecord;
