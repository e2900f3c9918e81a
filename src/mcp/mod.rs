//! MCP (Model Context Protocol) server
//!
//! Exposes the menu lookup to MCP clients (Claude Desktop, Cursor, ...) as the
//! `get_meal_menu` tool:
//!
//! - JSON-RPC over stdio transport
//! - schemars-derived input schema
//! - A fresh feed fetch per tool call
//!
//! # Example
//!
//! ```bash
//! DATA_SOURCE_URL=https://example.com/meals.json bobmenu serve
//! ```

pub mod protocol;
pub mod server;
pub mod tool;

pub use server::McpServer;
pub use tool::{GetMealMenuArgs, MenuTool};
