//! Fixed-point alias resolution.
//!
//! Starting from the two root bindings, every pass walks the whole program and
//! grows two sets:
//!
//! - the **alias** set: names bound to a root binding, to a property access
//!   or call rooted in an alias, or to an alias itself;
//! - the **tainted** set: names reached through one property access on a
//!   tainted name, plus named functions whose parameters or body mention an
//!   alias.
//!
//! Passes repeat until neither set grows, after which the tainted set is
//! merged into the alias set.

use tracing::debug;

use super::ast::{Node, NodeKind};
use super::patterns::{self, NameSet};
use super::RootBindings;

/// Which set a binding joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Alias,
    Tainted,
}

/// Per-invocation resolution state.
#[derive(Debug, Clone)]
pub struct AliasContext {
    pub aliases: NameSet,
    pub tainted: NameSet,
}

impl AliasContext {
    pub fn new(roots: &RootBindings) -> Self {
        Self {
            aliases: roots.names().iter().map(|name| name.to_string()).collect(),
            tainted: NameSet::default(),
        }
    }

    /// Classify the value bound to a name, if it makes the name an alias.
    fn classify(&self, init: &Node) -> Option<Binding> {
        if patterns::is_bare_ref(init, &self.aliases)
            || patterns::is_rooted_member(init, &self.aliases)
            || patterns::is_rooted_call(init, &self.aliases)
        {
            return Some(Binding::Alias);
        }

        if let NodeKind::Member { object, .. } = &init.kind {
            if patterns::is_bare_ref(object, &self.tainted) {
                return Some(Binding::Tainted);
            }
        }

        None
    }

    /// Record `name` in the set for `binding`. Returns whether it was new.
    fn bind(&mut self, name: &str, binding: Binding) -> bool {
        let set = match binding {
            Binding::Alias => &mut self.aliases,
            Binding::Tainted => &mut self.tainted,
        };
        if set.contains(name) {
            return false;
        }
        set.insert(name.to_string())
    }

    fn visit(&mut self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::VariableDeclaration(declarators) => {
                let mut grew = false;
                for declarator in declarators {
                    let (Some(name), Some(init)) = (declarator.name(), declarator.init.as_ref())
                    else {
                        continue;
                    };
                    if let Some(binding) = self.classify(init) {
                        grew |= self.bind(name, binding);
                    }
                }
                grew
            }
            NodeKind::Assignment { target, value } => {
                let Some(name) = target.as_identifier() else {
                    return false;
                };
                match self.classify(value) {
                    Some(binding) => self.bind(name, binding),
                    None => false,
                }
            }
            NodeKind::FunctionDeclaration(func) => {
                let Some(name) = func.name() else {
                    return false;
                };
                let mentions_alias = func
                    .params
                    .iter()
                    .chain(std::iter::once(func.body.as_ref()))
                    .any(|part| patterns::contains_reference(part, &self.aliases));
                if mentions_alias {
                    self.bind(name, Binding::Tainted)
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// One full scan of `program`. Returns whether either set grew.
    fn scan(&mut self, program: &Node) -> bool {
        let mut grew = false;
        program.walk(&mut |node| {
            grew |= self.visit(node);
        });
        grew
    }

    /// Run passes until nothing changes, then fold tainted names into the
    /// alias set.
    pub fn resolve(mut self, program: &Node) -> NameSet {
        let mut passes = 1;
        while self.scan(program) {
            passes += 1;
        }
        debug!(
            "Alias resolution settled after {} passes ({} aliases, {} tainted)",
            passes,
            self.aliases.len(),
            self.tainted.len()
        );
        self.aliases.extend(self.tainted);
        self.aliases
    }
}

/// Compute the full alias set of `program` for the given root bindings.
pub fn resolve_aliases(program: &Node, roots: &RootBindings) -> NameSet {
    AliasContext::new(roots).resolve(program)
}
