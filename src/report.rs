//! Rendering of [`ScrubReport`]s for `brrr-scrub analyze`.

use std::fmt::Write as _;

use clap::ValueEnum;

use crate::error::Result;
use crate::scrub::{LineRange, ScrubReport};

/// Output format of the analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Full report as JSON.
    Json,
}

fn join_ranges(ranges: &[LineRange]) -> String {
    if ranges.is_empty() {
        return "-".to_string();
    }
    ranges
        .iter()
        .map(LineRange::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `report` in the requested format.
pub fn render(report: &ScrubReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &ScrubReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "parse tier:  {}", report.tier.as_str());
    let _ = writeln!(out, "aliases:     {}", report.aliases.join(", "));
    let _ = writeln!(out, "direct:      {}", join_ranges(&report.direct));
    let _ = writeln!(out, "cascaded:    {}", join_ranges(&report.cascaded));
    let _ = writeln!(out, "blocks:      {}", join_ranges(&report.blocks));
    if report.line_scan {
        let _ = writeln!(out, "note:        ranges come from the line-scan fallback");
    }
    if report.is_clean() {
        let _ = writeln!(out, "result:      clean, script unchanged");
    } else {
        let lines: usize = report.blocks.iter().map(|b| b.end - b.start + 1).sum();
        let _ = writeln!(
            out,
            "result:      {} block(s), {} line(s) commented",
            report.blocks.len(),
            lines
        );
    }
    out
}
