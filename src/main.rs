use anyhow::Result;
use clap::{Parser, Subcommand};

use bobmenu::{cli, config};

#[derive(Parser)]
#[command(name = "bobmenu")]
#[command(about = "SSAFY cafeteria menu lookup, served as an MCP tool")]
#[command(long_about = "\
SSAFY cafeteria menu lookup, served as an MCP tool

bobmenu reads a date-keyed JSON menu feed (from a URL or a local cache file)
and answers \"what's for lunch\" queries grouped by floor.

TYPICAL WORKFLOWS:

  As an MCP server (Claude Desktop, Cursor, ...):
    DATA_SOURCE_URL=https://example.com/meals.json bobmenu serve

  One-off lookups:
    bobmenu -u https://example.com/meals.json menu --date 2025-10-23 --floor 10F

  Offline cache:
    bobmenu -u https://example.com/meals.json fetch   # writes data/meals.json
    bobmenu --source cache menu

For more details on each command, use: bobmenu <command> --help
")]
struct Cli {
    /// Global configuration arguments
    #[command(flatten)]
    config: config::ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server over stdio
    ///
    ///  - Reads JSON-RPC requests on stdin, writes responses on stdout.
    ///
    ///  - Exposes the get_meal_menu tool.
    ///
    /// Example:
    ///
    ///  $ bobmenu serve
    ///
    ///  $ bobmenu --default-floor 10F -v serve
    ///
    Serve(cli::serve::ServeArgs),

    /// Look up a menu and print the report
    ///
    /// Example:
    ///
    ///  $ bobmenu menu
    ///
    ///  $ bobmenu menu --date 2025-10-23 --floor 20F
    ///
    ///  $ bobmenu menu --schema
    ///
    Menu(cli::menu::MenuArgs),

    /// Download the remote feed into the local cache file
    ///
    /// Example:
    ///
    ///  $ bobmenu -u https://example.com/meals.json fetch
    ///
    ///  $ bobmenu fetch -o /var/cache/bob/meals.json
    ///
    Fetch(cli::fetch::FetchArgs),

    /// Display version information
    Version,

    /// List all commands (hidden, for tooling)
    #[command(hide = true)]
    ListCommands,
}

fn list_commands() {
    use clap::CommandFactory;

    for subcmd in Cli::command().get_subcommands() {
        let name = subcmd.get_name();
        if name != "help" && name != "list-commands" {
            println!("{}", name);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let global_config = config::GlobalConfig::from_args(&cli.config)?;
    global_config.init_tracing();

    tracing::debug!("bobmenu starting");

    match cli.command {
        Commands::Serve(args) => cli::serve::run(args, &global_config).await?,
        Commands::Menu(args) => {
            if !cli::menu::run(args, &global_config).await? {
                std::process::exit(1);
            }
        }
        Commands::Fetch(args) => cli::fetch::run(args, &global_config).await?,
        Commands::Version => println!("{}", cli::version("bobmenu")),
        Commands::ListCommands => list_commands(),
    }

    tracing::debug!("bobmenu shutting down");
    Ok(())
}
