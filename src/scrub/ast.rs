//! Typed syntax tree consumed by the scrub passes.
//!
//! The parser lowers the tree-sitter concrete syntax tree into this much
//! smaller representation. Only the shapes the passes actually distinguish
//! get their own variant; every other construct is kept as
//! [`NodeKind::Other`] so that nested references remain reachable by a walk.

/// Inclusive, 1-indexed line span of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Loc {
    pub start_line: usize,
    pub end_line: usize,
}

impl Loc {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

/// A syntax tree node. `loc` is `None` for error-recovered fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Vec<Node>),
    /// `var`, `let` or `const` declaration.
    VariableDeclaration(Vec<Declarator>),
    ExpressionStatement(Box<Node>),
    /// Named function (or generator) declaration.
    FunctionDeclaration(Function),
    Return(Option<Box<Node>>),
    ControlFlow(ControlFlowKind, Vec<Node>),
    /// Identifier reference or binding name.
    Identifier(String),
    Member {
        object: Box<Node>,
        property: PropertyName,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    /// Plain `=` assignment.
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    /// Arrow function, function expression or class method.
    Function(Function),
    /// Object literal entry: `key: value` or a method.
    Property {
        key: PropertyName,
        value: Box<Node>,
    },
    /// Region the loose parser could not make sense of.
    Fragment(Vec<Node>),
    Other(Vec<Node>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlowKind {
    If,
    For,
    ForIn,
    While,
    DoWhile,
    Switch,
    Try,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Static(String),
    Computed(Box<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub target: Node,
    pub init: Option<Node>,
}

impl Declarator {
    /// Declared name when the target is a single identifier.
    pub fn name(&self) -> Option<&str> {
        self.target.as_identifier()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Box<Node>>,
    pub params: Vec<Node>,
    pub body: Box<Node>,
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().and_then(Node::as_identifier)
    }
}

impl Node {
    pub fn new(kind: NodeKind, loc: Option<Loc>) -> Self {
        Self { kind, loc }
    }

    pub fn identifier(name: impl Into<String>, loc: Option<Loc>) -> Self {
        Self::new(NodeKind::Identifier(name.into()), loc)
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this node is a statement the tainter may comment out.
    pub fn is_taintable_statement(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::VariableDeclaration(_)
                | NodeKind::ExpressionStatement(_)
                | NodeKind::FunctionDeclaration(_)
                | NodeKind::ControlFlow(..)
        )
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        match &self.kind {
            NodeKind::Program(items)
            | NodeKind::ControlFlow(_, items)
            | NodeKind::Fragment(items)
            | NodeKind::Other(items) => out.extend(items.iter()),
            NodeKind::VariableDeclaration(declarators) => {
                for declarator in declarators {
                    out.push(&declarator.target);
                    if let Some(init) = &declarator.init {
                        out.push(init);
                    }
                }
            }
            NodeKind::ExpressionStatement(expr) => out.push(expr),
            NodeKind::FunctionDeclaration(func) | NodeKind::Function(func) => {
                push_function(func, &mut out)
            }
            NodeKind::Return(arg) => out.extend(arg.as_deref()),
            NodeKind::Identifier(_) => {}
            NodeKind::Member { object, property } => {
                out.push(object);
                if let PropertyName::Computed(expr) = property {
                    out.push(expr);
                }
            }
            NodeKind::Call { callee, arguments } => {
                out.push(callee);
                out.extend(arguments.iter());
            }
            NodeKind::Assignment { target, value } => {
                out.push(target);
                out.push(value);
            }
            NodeKind::Property { key, value } => {
                if let PropertyName::Computed(expr) = key {
                    out.push(expr);
                }
                out.push(value);
            }
        }
        out
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Whether this node or any descendant satisfies `pred`.
    pub fn any(&self, pred: &mut dyn FnMut(&Node) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        for child in self.children() {
            if child.any(pred) {
                return true;
            }
        }
        false
    }
}

fn push_function<'a>(func: &'a Function, out: &mut Vec<&'a Node>) {
    out.extend(func.name.as_deref());
    out.extend(func.params.iter());
    out.push(&func.body);
}
