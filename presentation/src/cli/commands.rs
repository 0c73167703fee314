//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for lumiere
#[derive(Parser, Debug)]
#[command(name = "lumiere")]
#[command(author, version, about = "Embed Lua scripts and expose host members under a library table")]
#[command(long_about = r#"
Lumiere runs a Lua script against a host that publishes values and functions
under a single global table (`lib` by default).

Without a SCRIPT or --eval, `main.lua` from the current directory is run.
Script failures are reported as diagnostics on stderr and in the log file.

Configuration is loaded from (in priority order):
1. LUMIERE_<SECTION>__<KEY>           Environment overrides (e.g. LUMIERE_LOG__LEVEL=debug)
2. --config <path>                    Explicit config file
3. ./lumiere.toml or ./.lumiere.toml  Project-level config
4. ~/.config/lumiere/config.toml      Global config

Example:
  lumiere
  lumiere scripts/level1.lua --entrypoint start
  lumiere -e 'print(lib.version)'
"#)]
pub struct Cli {
    /// Script to run (defaults to `main.lua` in the current directory)
    #[arg(conflicts_with = "eval")]
    pub script: Option<PathBuf>,

    /// Run a literal chunk instead of a script file
    #[arg(short, long, value_name = "CODE")]
    pub eval: Option<String>,

    /// Member of the library table to call after the script has run
    #[arg(long, value_name = "NAME")]
    pub entrypoint: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
