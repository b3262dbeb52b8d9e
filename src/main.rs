//! brrr-scrub: comment out foreign scripting-API statements in scripts.
//!
//! # Usage
//!
//! ```bash
//! # Print the scrubbed script
//! brrr-scrub transform test.js
//!
//! # Rewrite in place
//! brrr-scrub transform test.js --in-place
//!
//! # Inspect aliases and ranges
//! brrr-scrub analyze test.js --format json
//!
//! # Generate default config
//! brrr-scrub init
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brrr_scrub::{
    exit_code, report, source, validate_cli_semantics, Cli, Commands, ScrubError,
    ScrubFileConfig, Scrubber,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(msg) = validate_cli_semantics(&cli) {
        eprintln!("Error: {}", msg);
        std::process::exit(exit_code::CONFIG_ERROR);
    }

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<ScrubError>()
            .map(ScrubError::exit_code)
            .unwrap_or(exit_code::INTERNAL_ERROR);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    match &cli.command {
        Commands::Transform {
            input,
            output,
            in_place,
        } => {
            let scrubber = Scrubber::new(cli.scrub_config(&cwd)?);
            let script = source::read_script(input.as_deref())
                .context("failed to read script")?;
            let result = scrubber.transform(&script);

            let target = if *in_place {
                input.as_deref()
            } else {
                output.as_deref()
            };
            source::write_script(target, &result).context("failed to write output")?;
            if let Some(path) = target {
                info!("Wrote {}", path.display());
            }
        }
        Commands::Analyze { input, format } => {
            let scrubber = Scrubber::new(cli.scrub_config(&cwd)?);
            let script = source::read_script(input.as_deref())
                .context("failed to read script")?;
            let analysis = scrubber.analyze(&script);
            let rendered = report::render(&analysis, *format)?;
            source::write_script(None, &rendered)?;
        }
        Commands::Init { output, force } => run_init(output, *force)?,
    }

    Ok(())
}

fn run_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(ScrubError::AlreadyExists(output.to_path_buf()).into());
    }
    std::fs::write(output, ScrubFileConfig::default_toml())
        .map_err(|e| ScrubError::io_with_path(e, output))?;
    println!("Created {}", output.display());
    Ok(())
}
