//! CLI argument definitions for brrr-scrub.
//!
//! Kept in the library so that integration tests can use
//! [`Cli::try_parse_from`] without spawning a subprocess.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{self, discover_and_load_config, ScrubFileConfig, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::report::ReportFormat;
use crate::scrub::{RootBindings, ScrubConfig};
use crate::source;

/// Parse `--roots a,b` into root bindings.
fn parse_roots(s: &str) -> std::result::Result<RootBindings, String> {
    let names: Vec<String> = s.split(',').map(|n| n.trim().to_string()).collect();
    config::root_bindings(&names).map_err(|e| e.to_string())
}

/// brrr-scrub: neutralize foreign scripting-API statements in migrated scripts.
///
/// Every statement that depends on the root bindings (`pm` and `postman` by
/// default), directly or through aliases, is wrapped in a block comment.
/// Everything else is left byte-for-byte untouched.
#[derive(Parser, Debug)]
#[command(name = "brrr-scrub")]
#[command(version)]
#[command(about = "Comment out foreign scripting-API statements in migrated scripts", long_about = None)]
#[command(after_help = "\
CONFIGURATION:\
\n  brrr-scrub looks for a .brrr-scrub.toml config file, searching from the\
\n  current directory up to the nearest .git root. Use `brrr-scrub init` to\
\n  generate a default config. CLI flags always override config file settings.\
\n\
\nEXAMPLES:\
\n  brrr-scrub transform test.js                   Print the scrubbed script\
\n  brrr-scrub transform test.js --in-place        Rewrite the file\
\n  cat test.js | brrr-scrub transform -           Read from stdin\
\n  brrr-scrub analyze test.js --format json       Show aliases and ranges\
\n  brrr-scrub --roots ctx,context transform a.js  Use other root names")]
pub struct Cli {
    /// Path to a .brrr-scrub.toml config file.
    #[arg(long, global = true, help_heading = "Global Options")]
    pub config: Option<PathBuf>,

    /// The two root bindings, comma-separated (e.g. `pm,postman`).
    #[arg(long, global = true, value_parser = parse_roots, help_heading = "Global Options")]
    pub roots: Option<RootBindings>,

    /// Flag lines by name when a script only parses with error recovery.
    #[arg(long, global = true, help_heading = "Global Options")]
    pub line_fallback: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Global Options")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose", help_heading = "Global Options")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite a script, commenting out dependent statements.
    Transform {
        /// Script to read (stdin when omitted or `-`).
        input: Option<PathBuf>,

        /// Write the result here instead of stdout.
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the input file.
        #[arg(long)]
        in_place: bool,
    },

    /// Report aliases, tainted ranges and commented blocks.
    Analyze {
        /// Script to read (stdin when omitted or `-`).
        input: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Generate a default .brrr-scrub.toml.
    Init {
        /// Where to write the config file.
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Log filter directive selected by `-v` / `-q`.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Build the pipeline configuration from the config file and flags.
    ///
    /// An explicit `--config` must load. A discovered file that fails to load
    /// is reported and ignored.
    pub fn scrub_config(&self, cwd: &Path) -> Result<ScrubConfig> {
        let file_config = match &self.config {
            Some(path) => {
                let config = ScrubFileConfig::load(path)?;
                info!("Loaded config from {}", path.display());
                Some(config)
            }
            None => match discover_and_load_config(cwd) {
                Ok(Some((config, path))) => {
                    info!("Using config: {}", path.display());
                    Some(config)
                }
                Ok(None) => None,
                Err(e) => {
                    warn!("Failed to load {}: {}", CONFIG_FILE_NAME, e);
                    None
                }
            },
        };

        let mut config = match file_config {
            Some(file) => file.to_scrub_config()?,
            None => ScrubConfig::default(),
        };
        if let Some(roots) = &self.roots {
            config.roots = roots.clone();
        }
        if self.line_fallback {
            config.line_scan_fallback = true;
        }
        Ok(config)
    }
}

/// Semantic checks clap cannot express. Returns an error message.
pub fn validate_cli_semantics(cli: &Cli) -> std::result::Result<(), String> {
    if let Commands::Transform {
        input,
        in_place: true,
        ..
    } = &cli.command
    {
        if source::is_stdio(input.as_deref()) {
            return Err("--in-place requires an input file".to_string());
        }
    }
    Ok(())
}
