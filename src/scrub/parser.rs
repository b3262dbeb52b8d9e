//! Script parsing with graceful degradation.
//!
//! Scripts are parsed with tree-sitter and lowered into the typed tree from
//! [`super::ast`]. Three tiers are tried in order:
//!
//! 1. **Module**: the ECMAScript grammar, accepted only if the tree is free
//!    of `ERROR` and `MISSING` nodes.
//! 2. **Script**: the TypeScript grammar (a superset that also accepts type
//!    annotations), again accepted only if error-free.
//! 3. **Loose**: the error-recovered ECMAScript tree, used as-is. Unparseable
//!    regions become [`NodeKind::Fragment`] nodes without a location, which
//!    keeps them invisible to the statement passes.
//!
//! Parsing never fails: if no grammar can even be loaded the result is an
//! empty program and the script passes through unchanged.
//!
//! Lowering stops at [`MAX_DEPTH`] levels. Deeper subtrees (long operator
//! chains, long `else if` ladders) become empty fragments, so every later
//! pass and the tree's own drop recurse a bounded number of times.

use std::cell::Cell;

use serde::Serialize;
use tracing::{debug, warn};
use tree_sitter::{Language, Node as TsNode, Parser, Tree};

use super::ast::{ControlFlowKind, Declarator, Function, Loc, Node, NodeKind, PropertyName};

/// Deepest AST level that is lowered. Anything below is dropped.
pub const MAX_DEPTH: usize = 256;

/// Which parsing tier produced the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTier {
    Module,
    Script,
    Loose,
}

impl ParseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseTier::Module => "module",
            ParseTier::Script => "script",
            ParseTier::Loose => "loose",
        }
    }
}

/// A lowered script together with the tier that produced it.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    pub program: Node,
    pub tier: ParseTier,
}

#[derive(Debug, Clone, Copy)]
enum Grammar {
    JavaScript,
    TypeScript,
}

impl Grammar {
    fn language(self) -> Language {
        match self {
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
        }
    }
}

/// Parse `source` into a typed tree, falling back tier by tier.
pub fn parse(source: &str) -> ParsedScript {
    let module_tree = parse_with(Grammar::JavaScript, source);
    if let Some(tree) = &module_tree {
        if !tree.root_node().has_error() {
            return lower_tree(tree, source, ParseTier::Module);
        }
    }

    if let Some(tree) = parse_with(Grammar::TypeScript, source) {
        if !tree.root_node().has_error() {
            debug!("Parsed script with the typescript grammar");
            return lower_tree(&tree, source, ParseTier::Script);
        }
    }

    warn!("Standard parsing failed, using error-tolerant parse");
    match module_tree {
        Some(tree) => lower_tree(&tree, source, ParseTier::Loose),
        None => ParsedScript {
            program: Node::new(NodeKind::Program(Vec::new()), None),
            tier: ParseTier::Loose,
        },
    }
}

fn parse_with(grammar: Grammar, source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&grammar.language()) {
        warn!("Failed to load {} grammar: {}", grammar.name(), e);
        return None;
    }
    parser.parse(source, None)
}

fn lower_tree(tree: &Tree, source: &str, tier: ParseTier) -> ParsedScript {
    let lowering = Lowering {
        source: source.as_bytes(),
        depth: Cell::new(0),
        truncated: Cell::new(false),
    };
    let program = lowering.lower(tree.root_node());
    if lowering.truncated.get() {
        warn!(
            "Script nests deeper than {} levels, deeper code is not analyzed",
            MAX_DEPTH
        );
    }
    ParsedScript { program, tier }
}

fn loc_of(node: TsNode) -> Loc {
    Loc::new(node.start_position().row + 1, node.end_position().row + 1)
}

fn empty() -> Node {
    Node::new(NodeKind::Other(Vec::new()), None)
}

/// CST to AST lowering over one source buffer.
struct Lowering<'s> {
    source: &'s [u8],
    depth: Cell<usize>,
    truncated: Cell<bool>,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: TsNode) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn lower(&self, node: TsNode) -> Node {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            self.truncated.set(true);
            return Node::new(NodeKind::Fragment(Vec::new()), None);
        }
        self.depth.set(depth + 1);
        let lowered = self.lower_node(node);
        self.depth.set(depth);
        lowered
    }

    fn lower_node(&self, node: TsNode) -> Node {
        if node.is_error() {
            return Node::new(NodeKind::Fragment(self.lower_children(node)), None);
        }

        let loc = Some(loc_of(node));
        let kind = match node.kind() {
            "program" => NodeKind::Program(self.lower_children(node)),
            "lexical_declaration" | "variable_declaration" => {
                NodeKind::VariableDeclaration(self.lower_declarators(node))
            }
            "expression_statement" => match self.first_child(node) {
                Some(expr) => NodeKind::ExpressionStatement(Box::new(expr)),
                None => NodeKind::Other(Vec::new()),
            },
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration(self.lower_function(node))
            }
            "return_statement" => NodeKind::Return(self.first_child(node).map(Box::new)),
            "if_statement" => self.control_flow(ControlFlowKind::If, node),
            "for_statement" => self.control_flow(ControlFlowKind::For, node),
            "for_in_statement" => self.control_flow(ControlFlowKind::ForIn, node),
            "while_statement" => self.control_flow(ControlFlowKind::While, node),
            "do_statement" => self.control_flow(ControlFlowKind::DoWhile, node),
            "switch_statement" => self.control_flow(ControlFlowKind::Switch, node),
            "try_statement" => self.control_flow(ControlFlowKind::Try, node),
            "identifier" | "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                NodeKind::Identifier(self.text(node).to_string())
            }
            "member_expression" => NodeKind::Member {
                object: Box::new(self.field(node, "object")),
                property: PropertyName::Static(
                    node.child_by_field_name("property")
                        .map(|p| self.text(p).to_string())
                        .unwrap_or_default(),
                ),
            },
            "subscript_expression" => NodeKind::Member {
                object: Box::new(self.field(node, "object")),
                property: PropertyName::Computed(Box::new(self.field(node, "index"))),
            },
            "call_expression" => self.lower_call(node),
            "assignment_expression" => NodeKind::Assignment {
                target: Box::new(self.field(node, "left")),
                value: Box::new(self.field(node, "right")),
            },
            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                NodeKind::Function(self.lower_function(node))
            }
            "pair" => NodeKind::Property {
                key: self.property_key(node.child_by_field_name("key")),
                value: Box::new(self.field(node, "value")),
            },
            "method_definition" => NodeKind::Property {
                key: self.property_key(node.child_by_field_name("name")),
                value: Box::new(Node::new(NodeKind::Function(self.lower_function(node)), loc)),
            },
            "class_body" => NodeKind::Other(self.lower_class_body(node)),
            "parenthesized_expression" => {
                let mut inner = self.lower_children(node);
                if inner.len() == 1 {
                    return inner.remove(0);
                }
                NodeKind::Other(inner)
            }
            _ => NodeKind::Other(self.lower_children(node)),
        };
        Node::new(kind, loc)
    }

    fn lower_children(&self, node: TsNode) -> Vec<Node> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| !child.is_extra() && !child.is_missing())
            .map(|child| self.lower(child))
            .collect()
    }

    fn first_child(&self, node: TsNode) -> Option<Node> {
        let mut cursor = node.walk();
        let child = node
            .named_children(&mut cursor)
            .find(|child| !child.is_extra() && !child.is_missing());
        child.map(|c| self.lower(c))
    }

    fn field(&self, node: TsNode, name: &str) -> Node {
        node.child_by_field_name(name)
            .filter(|child| !child.is_missing())
            .map(|child| self.lower(child))
            .unwrap_or_else(empty)
    }

    fn control_flow(&self, kind: ControlFlowKind, node: TsNode) -> NodeKind {
        NodeKind::ControlFlow(kind, self.lower_children(node))
    }

    fn lower_declarators(&self, node: TsNode) -> Vec<Declarator> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "variable_declarator")
            .map(|declarator| Declarator {
                target: self.field(declarator, "name"),
                init: declarator
                    .child_by_field_name("value")
                    .filter(|value| !value.is_missing())
                    .map(|value| self.lower(value)),
            })
            .collect()
    }

    fn lower_function(&self, node: TsNode) -> Function {
        let name = node
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| Box::new(self.lower(n)));

        let params = if let Some(params) = node.child_by_field_name("parameters") {
            self.lower_children(params)
        } else if let Some(param) = node.child_by_field_name("parameter") {
            vec![self.lower(param)]
        } else {
            Vec::new()
        };

        Function {
            name,
            params,
            body: Box::new(self.field(node, "body")),
        }
    }

    /// Tagged templates are not calls; they stay opaque.
    fn lower_call(&self, node: TsNode) -> NodeKind {
        let callee = self.field(node, "function");
        match node.child_by_field_name("arguments") {
            Some(args) if args.kind() == "template_string" => {
                NodeKind::Other(vec![callee, self.lower(args)])
            }
            Some(args) => NodeKind::Call {
                callee: Box::new(callee),
                arguments: self.lower_children(args),
            },
            None => NodeKind::Call {
                callee: Box::new(callee),
                arguments: Vec::new(),
            },
        }
    }

    fn property_key(&self, key: Option<TsNode>) -> PropertyName {
        let Some(key) = key else {
            return PropertyName::Static(String::new());
        };
        match key.kind() {
            "computed_property_name" => match self.first_child(key) {
                Some(expr) => PropertyName::Computed(Box::new(expr)),
                None => PropertyName::Static(String::new()),
            },
            "string" => PropertyName::Static(
                self.text(key)
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string(),
            ),
            _ => PropertyName::Static(self.text(key).to_string()),
        }
    }

    /// Class methods are plain functions, not object-literal properties.
    fn lower_class_body(&self, node: TsNode) -> Vec<Node> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| !child.is_extra() && !child.is_missing())
            .map(|member| {
                if member.kind() == "method_definition" {
                    Node::new(
                        NodeKind::Function(self.lower_function(member)),
                        Some(loc_of(member)),
                    )
                } else {
                    self.lower(member)
                }
            })
            .collect()
    }
}
