//! One-hop cascade through names declared inside tainted statements.
//!
//! A variable, function or object method declared within a commented-out
//! statement no longer exists at runtime, so statements that use it must go
//! too. Only one hop is followed: names declared inside cascaded statements
//! are not chased further.

use tracing::trace;

use super::ast::{Node, NodeKind, PropertyName};
use super::patterns::{self, NameSet};
use super::ranges::LineRange;

/// Names declared by `node`, if it is a declaring construct.
fn declared_names<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match &node.kind {
        NodeKind::VariableDeclaration(declarators) => {
            out.extend(declarators.iter().filter_map(|d| d.name()));
        }
        NodeKind::FunctionDeclaration(func) => out.extend(func.name()),
        NodeKind::Property {
            key: PropertyName::Static(name),
            value,
        } if matches!(value.kind, NodeKind::Function(_)) => out.push(name),
        _ => {}
    }
}

/// Names declared by nodes starting inside one of `initial`.
pub fn commented_names(program: &Node, initial: &[LineRange]) -> NameSet {
    let mut names = NameSet::default();
    program.walk(&mut |node| {
        let Some(loc) = node.loc else {
            return;
        };
        if !initial.iter().any(|r| r.contains_line(loc.start_line)) {
            return;
        }
        let mut declared = Vec::new();
        declared_names(node, &mut declared);
        names.extend(declared.into_iter().filter(|n| !n.is_empty()).map(str::to_string));
    });
    names
}

/// Ranges of declarations, expression statements and returns that use a name
/// declared inside the `initial` ranges.
pub fn find_cascaded_ranges(program: &Node, initial: &[LineRange]) -> Vec<LineRange> {
    let names = commented_names(program, initial);
    if names.is_empty() {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    program.walk(&mut |node| {
        let cascades = matches!(
            node.kind,
            NodeKind::VariableDeclaration(_) | NodeKind::ExpressionStatement(_) | NodeKind::Return(_)
        );
        if !cascades {
            return;
        }
        let Some(loc) = node.loc else {
            return;
        };
        if patterns::contains_reference(node, &names) {
            ranges.push(LineRange::from(loc));
        }
    });
    trace!(
        "Cascade over {} commented names found {} statements",
        names.len(),
        ranges.len()
    );
    ranges
}
