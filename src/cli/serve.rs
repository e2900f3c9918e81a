//! `bobmenu serve` - run the MCP server over stdio

use anyhow::{Context, Result};
use clap::Args;

use crate::config::GlobalConfig;
use crate::mcp::{McpServer, MenuTool};
use crate::source;

#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {}

pub async fn run(_args: ServeArgs, config: &GlobalConfig) -> Result<()> {
    let source = source::from_config(config).context("Failed to set up menu feed source")?;
    let tool = MenuTool::new(source, config.default_floor.clone());

    McpServer::new(tool).run().await
}
