use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use avrcycles::commands::{
    costs_command, functions_command, total_command, ListingArgs, OutputFormat,
};
use avrcycles::init_tracing;

/// Worst-case clock-cycle estimates from AVR disassembly listings.
///
/// This CLI is a thin wrapper around `avrcycles-core` (exposed in code as
/// `avrcycles_core`). Produce a listing with e.g.
/// `avr-objdump -d build/app.elf > build/app.avra` and point a command at it.
#[derive(Parser, Debug)]
#[command(
    name = "avrcycles",
    version,
    about = "Estimate AVR clock cycles from disassembly listings",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ListingOpts {
    /// Path to the listing (.avra or .lss unless the config says otherwise).
    path: String,

    /// Listing dialect (objdump, whitespace). Defaults to the config value, then objdump.
    #[arg(long)]
    dialect: Option<String>,

    /// Analyzer config file (.json, .yaml, or .yml).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total cycles and instructions across the whole listing.
    Total {
        #[command(flatten)]
        listing: ListingOpts,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Per-function local and call-inclusive cycle totals.
    ///
    /// A function's total is its own cost plus the total of every function it
    /// calls, once per call site. Recursive edges are broken and reported.
    Functions {
        #[command(flatten)]
        listing: ListingOpts,

        /// Cycles charged for a call that closes a recursion cycle.
        #[arg(long)]
        recursion_cost: Option<u64>,

        /// Only report the function with this symbol name.
        #[arg(long)]
        name: Option<String>,

        /// Emit a JSON report envelope.
        #[arg(long, default_value_t = false, conflicts_with = "yaml")]
        json: bool,

        /// Emit a YAML report envelope.
        #[arg(long, default_value_t = false)]
        yaml: bool,
    },

    /// Print the instruction cost table in effect.
    Costs {
        /// Analyzer config file whose overrides should be applied.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl ListingOpts {
    fn into_args(self, recursion_cost: Option<u64>) -> ListingArgs {
        ListingArgs { path: self.path, dialect: self.dialect, config: self.config, recursion_cost }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Total { listing, json } => total_command(&listing.into_args(None), json)?,
        Command::Functions { listing, recursion_cost, name, json, yaml } => {
            let format = if json {
                OutputFormat::Json
            } else if yaml {
                OutputFormat::Yaml
            } else {
                OutputFormat::Text
            };
            functions_command(&listing.into_args(recursion_cost), format, name.as_deref())?
        }
        Command::Costs { config, json } => costs_command(config.as_deref(), json)?,
    }

    Ok(())
}
