//! Line ranges and range merging.

use serde::Serialize;

use super::ast::Loc;

/// Inclusive, 1-indexed span of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

impl From<Loc> for LineRange {
    fn from(loc: Loc) -> Self {
        Self::new(loc.start_line, loc.end_line)
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_line() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Collapse overlapping and touching ranges into disjoint blocks.
///
/// Two ranges are merged when the next one starts on or before the last line
/// of the current block. Adjacent but non-overlapping ranges (`1-2`, `3-4`)
/// stay separate. The result is ordered by descending start line.
pub fn merge_ranges(ranges: &[LineRange]) -> Vec<LineRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|range| range.start);

    let mut merged: Vec<LineRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(current) if range.start <= current.end => {
                current.end = current.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }

    merged.reverse();
    merged
}
