//! `bobmenu menu` - one-shot menu lookup from the command line

use anyhow::{Context, Result};
use clap::Args;

use crate::config::GlobalConfig;
use crate::mcp::tool::{metadata, GetMealMenuArgs};
use crate::mcp::MenuTool;
use crate::source;

#[derive(Args, Clone, Debug, Default)]
pub struct MenuArgs {
    /// Date to look up (YYYY-MM-DD); defaults to the latest date in the feed
    #[arg(long, short = 'D')]
    pub date: Option<String>,

    /// Floor to show (e.g. 10F); "all" ignores --default-floor
    #[arg(long, short = 'f')]
    pub floor: Option<String>,

    /// Print the tool's JSON schema instead of running it
    #[arg(long, alias = "mcp-schema")]
    pub schema: bool,
}

/// Returns whether a report was produced; error strings go to stdout too
pub async fn run(args: MenuArgs, config: &GlobalConfig) -> Result<bool> {
    if args.schema {
        println!("{}", serde_json::to_string_pretty(&metadata())?);
        return Ok(true);
    }

    let source = source::from_config(config).context("Failed to set up menu feed source")?;
    let tool = MenuTool::new(source, config.default_floor.clone());

    let result = tool
        .call(GetMealMenuArgs {
            date: args.date,
            floor: args.floor,
        })
        .await;

    match result {
        Ok(report) => {
            println!("{}", report);
            Ok(true)
        }
        Err(e) => {
            println!("{}", e);
            Ok(e.is_soft())
        }
    }
}
