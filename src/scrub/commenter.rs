//! Block-comment rewriting over a stable line array.

use super::ranges::LineRange;

/// Wrap every range of `lines` in a block comment and join the result.
///
/// A single-line range becomes `/* line */`. A multi-line range gets `/*\n`
/// fused to the front of its first line and `\n*/` fused to the end of its
/// last line, so the line array never changes length and the interior stays
/// byte-identical. Ranges outside the array are ignored.
pub fn apply_comments(lines: &[&str], ranges: &[LineRange]) -> String {
    let mut out: Vec<String> = lines.iter().map(|line| line.to_string()).collect();

    for range in ranges {
        if range.start == 0 || range.start > range.end || range.end > out.len() {
            continue;
        }
        let first = range.start - 1;
        let last = range.end - 1;

        if first == last {
            out[first] = format!("/* {} */", out[first]);
        } else {
            out[first] = format!("/*\n{}", out[first]);
            out[last] = format!("{}\n*/", out[last]);
        }
    }

    out.join("\n")
}
