//! Script scrubbing pipeline.
//!
//! Statements that depend on the root bindings of a foreign scripting API are
//! neutralized by wrapping them in block comments, while every independent
//! line is left byte-for-byte untouched.
//!
//! ```text
//! parse -> resolve aliases -> taint statements -> cascade -> merge -> comment
//! ```

pub mod aliases;
pub mod ast;
pub mod cascade;
pub mod commenter;
pub mod fallback;
pub mod parser;
pub mod patterns;
pub mod ranges;
pub mod taint;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use parser::ParseTier;
pub use ranges::LineRange;

/// Default root bindings of the foreign API.
pub const DEFAULT_ROOTS: [&str; 2] = ["pm", "postman"];

/// The two global names the foreign scripting API is reached through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBindings {
    primary: String,
    secondary: String,
}

impl RootBindings {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn names(&self) -> [&str; 2] {
        [&self.primary, &self.secondary]
    }
}

impl Default for RootBindings {
    fn default() -> Self {
        Self::new(DEFAULT_ROOTS[0], DEFAULT_ROOTS[1])
    }
}

/// Pipeline options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrubConfig {
    pub roots: RootBindings,
    /// Flag lines by word search when a loosely parsed script yields no
    /// tainted statements.
    pub line_scan_fallback: bool,
}

/// Everything the pipeline computed for one script.
#[derive(Debug, Clone, Serialize)]
pub struct ScrubReport {
    pub tier: ParseTier,
    /// Final alias set, sorted.
    pub aliases: Vec<String>,
    pub direct: Vec<LineRange>,
    pub cascaded: Vec<LineRange>,
    /// Disjoint commented blocks, ascending.
    pub blocks: Vec<LineRange>,
    /// Whether the line-scan fallback produced `direct`.
    pub line_scan: bool,
    pub output: String,
}

impl ScrubReport {
    pub fn is_clean(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Runs the scrub pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    config: ScrubConfig,
}

impl Scrubber {
    pub fn new(config: ScrubConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    /// Rewrite `source`, commenting out every statement that depends on the
    /// root bindings.
    pub fn transform(&self, source: &str) -> String {
        self.analyze(source).output
    }

    pub fn analyze(&self, source: &str) -> ScrubReport {
        let parsed = parser::parse(source);
        let aliases = aliases::resolve_aliases(&parsed.program, &self.config.roots);

        let mut direct = taint::find_tainted_ranges(&parsed.program, &aliases);
        let cascaded = cascade::find_cascaded_ranges(&parsed.program, &direct);

        let lines: Vec<&str> = source.split('\n').collect();

        let mut line_scan = false;
        if direct.is_empty()
            && cascaded.is_empty()
            && parsed.tier == ParseTier::Loose
            && self.config.line_scan_fallback
        {
            direct = fallback::scan_lines(&lines, &aliases);
            line_scan = !direct.is_empty();
            if line_scan {
                debug!("Line scan flagged {} lines", direct.len());
            }
        }

        let mut all = direct.clone();
        all.extend_from_slice(&cascaded);
        let merged = ranges::merge_ranges(&all);

        let output = if merged.is_empty() {
            source.to_string()
        } else {
            commenter::apply_comments(&lines, &merged)
        };

        debug!(
            "Scrubbed script: tier={} aliases={} direct={} cascaded={} blocks={}",
            parsed.tier.as_str(),
            aliases.len(),
            direct.len(),
            cascaded.len(),
            merged.len()
        );

        let mut alias_list: Vec<String> = aliases.into_iter().collect();
        alias_list.sort();
        let mut blocks = merged;
        blocks.reverse();

        ScrubReport {
            tier: parsed.tier,
            aliases: alias_list,
            direct,
            cascaded,
            blocks,
            line_scan,
            output,
        }
    }
}

/// Rewrite `source` with the default root bindings.
///
/// ```
/// let out = brrr_scrub::transform("const x = 1;\npm.test('t', () => {});");
/// assert_eq!(out, "const x = 1;\n/* pm.test('t', () => {}); */");
/// ```
pub fn transform(source: &str) -> String {
    Scrubber::default().transform(source)
}
