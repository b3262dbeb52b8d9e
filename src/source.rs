//! Script input and output for the CLI.
//!
//! A missing path or `-` means stdin / stdout.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Result, ScrubError};

/// Whether `path` designates a standard stream.
pub fn is_stdio(path: Option<&Path>) -> bool {
    match path {
        None => true,
        Some(p) => p.as_os_str() == "-",
    }
}

/// Read a script from `path`, or from stdin.
pub fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if !is_stdio(Some(p)) => {
            std::fs::read_to_string(p).map_err(|e| ScrubError::io_with_path(e, p))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Write `content` to `path`, or to stdout. No trailing newline is added.
pub fn write_script(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) if !is_stdio(Some(p)) => {
            std::fs::write(p, content).map_err(|e| ScrubError::io_with_path(e, p))
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
