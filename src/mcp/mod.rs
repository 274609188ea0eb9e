//! Model Context Protocol (MCP) server implementation.
//!
//! This module exposes the lending registry operations as MCP tools. The
//! server communicates over a line-delimited transport (stdio in production)
//! using JSON-RPC 2.0 messages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        MCP Server                        │
//! │                                                          │
//! │   ┌─────────────┐    ┌─────────────┐    ┌────────────┐   │
//! │   │  Transport  │───▶│   Server    │───▶│  Registry  │   │
//! │   │   (lines)   │    │ (lifecycle) │    │ (lending)  │   │
//! │   └─────────────┘    └─────────────┘    └────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Reply, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::{Frame, LineTransport, StdioTransport};
