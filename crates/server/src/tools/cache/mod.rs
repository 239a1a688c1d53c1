//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the SQLite nutrition cache.

pub mod purge;

pub use purge::{CachePurgeOutput, CachePurgeParams, purge_impl};
