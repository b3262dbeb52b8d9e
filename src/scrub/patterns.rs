//! Shape predicates shared by the alias, taint and cascade passes.

use rustc_hash::FxHashSet;

use super::ast::{Node, NodeKind};

/// Set of binding names a predicate matches against.
pub type NameSet = FxHashSet<String>;

/// `node` is an identifier whose name is in `names`.
pub fn is_bare_ref(node: &Node, names: &NameSet) -> bool {
    node.as_identifier().is_some_and(|name| names.contains(name))
}

/// `node` reaches a name in `names` by following member objects and callees,
/// e.g. `pm`, `pm.response`, `pm.response.json().data`.
pub fn resolves_to(node: &Node, names: &NameSet) -> bool {
    match &node.kind {
        NodeKind::Identifier(name) => names.contains(name),
        NodeKind::Member { object, .. } => resolves_to(object, names),
        NodeKind::Call { callee, .. } => resolves_to(callee, names),
        _ => false,
    }
}

/// Property access whose object chain is rooted in `names`.
pub fn is_rooted_member(node: &Node, names: &NameSet) -> bool {
    match &node.kind {
        NodeKind::Member { object, .. } => resolves_to(object, names),
        _ => false,
    }
}

/// Call whose callee is a name in `names` or a member chain rooted in one.
pub fn is_rooted_call(node: &Node, names: &NameSet) -> bool {
    match &node.kind {
        NodeKind::Call { callee, .. } => {
            is_bare_ref(callee, names) || is_rooted_member(callee, names)
        }
        _ => false,
    }
}

/// `node` contains, at any depth, a reference to a name in `names`.
///
/// Rooted member chains and rooted calls always contain their root
/// identifier, so a single identifier search covers all three shapes.
pub fn contains_reference(node: &Node, names: &NameSet) -> bool {
    if names.is_empty() {
        return false;
    }
    node.any(&mut |n| is_bare_ref(n, names))
}
