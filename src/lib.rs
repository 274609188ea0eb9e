//! library-lending-mcp: MCP server keeping library lending records
//!
//! Tracks books, registered borrowers, and which copies are out with whom.
//! State lives in memory for the lifetime of the process.
//!
//! # Modules
//!
//! - [`registry`] — Books, people, loans and the lending operations
//! - [`mcp`] — MCP protocol implementation exposing the operations as tools
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Startup error types

pub mod config;
pub mod error;
pub mod mcp;
pub mod registry;
