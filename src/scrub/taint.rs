//! Statement tainting: every statement that mentions an alias.

use tracing::trace;

use super::ast::Node;
use super::patterns::{self, NameSet};
use super::ranges::LineRange;

/// Ranges of all statements (at any depth) that reference an alias.
///
/// Declarations, expression statements, named function declarations and
/// control-flow statements qualify. Nodes without a location come from
/// error recovery and are skipped.
pub fn find_tainted_ranges(program: &Node, aliases: &NameSet) -> Vec<LineRange> {
    let mut ranges = Vec::new();
    program.walk(&mut |node| {
        if !node.is_taintable_statement() {
            return;
        }
        let Some(loc) = node.loc else {
            return;
        };
        if patterns::contains_reference(node, aliases) {
            ranges.push(LineRange::from(loc));
        }
    });
    trace!("Found {} tainted statements", ranges.len());
    ranges
}
