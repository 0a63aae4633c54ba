//! MCP tool handlers for the kanban server
//!
//! Each tool group lives in its own file; the `#[mcp_server]` impl in
//! `lib.rs` only forwards to these.

pub mod board;
pub mod keyboard;
pub mod move_item;
pub mod notification;
