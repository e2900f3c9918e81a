// Library interface for bobmenu
// This allows the binary crate and tests to import the modules

pub mod cli;
pub mod config;
pub mod logging;
pub mod mcp;
pub mod menu;
pub mod source;
