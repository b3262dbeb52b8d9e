//! Word-search fallback for scripts the parser could only partially recover.
//!
//! When the loose tier hides statements inside error fragments, the AST
//! passes may find nothing even though the script plainly uses the root
//! bindings. This scan flags every line that mentions an alias as a whole
//! word, ignoring `//` comments.

use regex::Regex;
use tracing::warn;

use super::patterns::NameSet;
use super::ranges::LineRange;

/// Build a whole-word matcher for `names`. `None` if there is nothing to match.
pub fn alias_pattern(names: &NameSet) -> Option<Regex> {
    if names.is_empty() {
        return None;
    }
    let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let alternation = sorted
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&format!(r"\b(?:{})\b", alternation)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Failed to build line-scan pattern: {}", e);
            None
        }
    }
}

/// Portion of `line` before a `//` comment that is not inside a string.
pub fn code_portion(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' || b == b'`' => quote = Some(b),
            None if b == b'/' && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            None => {}
        }
        i += 1;
    }
    line
}

/// Single-line ranges of every line whose code mentions a name in `names`.
pub fn scan_lines(lines: &[&str], names: &NameSet) -> Vec<LineRange> {
    let Some(pattern) = alias_pattern(names) else {
        return Vec::new();
    };

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .filter(|(_, line)| pattern.is_match(code_portion(line)))
        .map(|(index, _)| LineRange::single(index + 1))
        .collect()
}
