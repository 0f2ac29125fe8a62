//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-unfurl server.
#![allow(unused_imports)]

pub mod cache;
pub mod resolve;
pub mod resolve_batch;

pub use resolve::{ResolveTitleOutput, ResolveTitleParams};
pub use resolve_batch::{ResolveBatchOutput, ResolveBatchParams};
