//! `bobmenu fetch` - save the remote feed into the local cache file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::GlobalConfig;
use crate::source::{self, refresh_cache};

#[derive(Args, Clone, Debug, Default)]
pub struct FetchArgs {
    /// Write here instead of <cache-dir>/<cache-filename>
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub async fn run(args: FetchArgs, config: &GlobalConfig) -> Result<()> {
    let remote = source::remote_from_config(config)?;
    let path = args.output.unwrap_or_else(|| config.cache_path());

    let days = refresh_cache(&remote, &path)
        .await
        .with_context(|| format!("Failed to refresh menu cache from {}", remote.url()))?;

    println!("Saved {} days of menus to {}", days, path.display());
    Ok(())
}
