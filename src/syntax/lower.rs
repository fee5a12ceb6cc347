//! Lowering from the tree-sitter Go grammar to [`Node`].
//!
//! Bindings are decided here, from the kind of the parent construct and the
//! grammar field the identifier sits in. Only defining positions receive a
//! binding; every other identifier is a use.

use smallvec::SmallVec;
use tree_sitter::Node as TsNode;

use super::{Binding, Ident, Node};

/// tree-sitter kinds that are identifier occurrences.
const IDENT_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "package_identifier",
    "label_name",
];

fn is_ident(node: TsNode) -> bool {
    IDENT_KINDS.contains(&node.kind())
}

/// Lower a `source_file` root. Returns `None` when there is no package clause.
pub(super) fn lower_file(root: TsNode, source: &str) -> Option<Node> {
    let lowerer = Lowerer { source };

    let clause = root
        .children(&mut root.walk())
        .find(|c| c.kind() == "package_clause")?;
    let package = clause
        .named_children(&mut clause.walk())
        .find(|c| is_ident(*c))
        .map(|n| lowerer.text(n))?;

    let children = lowerer.lower_children(root, |child, _| child.kind() != "package_clause");

    Some(Node::File {
        package,
        package_offset: clause.start_byte(),
        children,
    })
}

/// Kinds allowed at the top level of a file, after the package clause.
const TOP_LEVEL_KINDS: &[&str] = &[
    "import_declaration",
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "var_declaration",
    "const_declaration",
];

/// A file layout that tree-sitter accepts but Go does not.
#[derive(Debug)]
pub(super) enum LayoutError {
    MissingPackage,
    /// The package clause is present but not the first thing in the file.
    PackageNotFirst { line: usize },
    /// A statement, expression or second package clause at the top level.
    TopLevelStatement { line: usize, kind: &'static str },
}

/// Check that `root` is a package clause followed only by declarations.
pub(super) fn check_layout(root: TsNode) -> Result<(), LayoutError> {
    let mut cursor = root.walk();
    let mut items = root
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment");

    match items.next() {
        Some(first) if first.kind() == "package_clause" => {}
        Some(first) => {
            let mut cursor = root.walk();
            let clause = root
                .named_children(&mut cursor)
                .find(|c| c.kind() == "package_clause");
            return Err(match clause {
                Some(clause) => LayoutError::PackageNotFirst {
                    line: clause.start_position().row + 1,
                },
                None if TOP_LEVEL_KINDS.contains(&first.kind()) => LayoutError::MissingPackage,
                None => LayoutError::TopLevelStatement {
                    line: first.start_position().row + 1,
                    kind: first.kind(),
                },
            });
        }
        None => return Err(LayoutError::MissingPackage),
    }

    match items.find(|c| !TOP_LEVEL_KINDS.contains(&c.kind())) {
        Some(stray) => Err(LayoutError::TopLevelStatement {
            line: stray.start_position().row + 1,
            kind: stray.kind(),
        }),
        None => Ok(()),
    }
}

/// First error or missing node in the tree, pre-order.
pub(super) fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

struct Lowerer<'s> {
    source: &'s str,
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: TsNode) -> String {
        self.source[node.byte_range()].to_string()
    }

    fn ident(&self, node: TsNode, binding: Option<Binding>) -> Ident {
        Ident::new(self.text(node), node.start_byte(), binding)
    }

    /// Lower one node. `binding` applies if `node` is an identifier, or is
    /// handed to the direct identifier children of an `expression_list`.
    fn lower(&self, node: TsNode, binding: Option<Binding>) -> Node {
        if is_ident(node) {
            return Node::Ident(self.ident(node, binding));
        }

        match node.kind() {
            "function_declaration" | "method_declaration" => self.lower_func(node),
            "var_spec" | "const_spec" => self.lower_value_spec(node),
            "expression_list" => Node::Other {
                kind: node.kind(),
                children: self.lower_children_with(node, |_, _| true, |_, _| binding),
            },
            kind => Node::Other {
                kind,
                children: self.lower_children(node, |_, _| true),
            },
        }
    }

    fn lower_func(&self, node: TsNode) -> Node {
        let Some(name) = node.child_by_field_name("name") else {
            return Node::Other {
                kind: node.kind(),
                children: self.lower_children(node, |_, _| true),
            };
        };

        Node::Func {
            name: self.ident(name, Some(Binding::Func)),
            offset: node.start_byte(),
            children: self.lower_children(node, |_, field| field != Some("name")),
        }
    }

    fn lower_value_spec(&self, node: TsNode) -> Node {
        let mut names: SmallVec<[Ident; 2]> = SmallVec::new();
        let mut children = Vec::new();

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let field = cursor.field_name();
                if child.is_named() && child.kind() != "comment" {
                    if field == Some("name") && is_ident(child) {
                        names.push(self.ident(child, Some(Binding::Value)));
                    } else {
                        children.push(self.lower(child, None));
                    }
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        Node::ValueGroup { names, children }
    }

    fn lower_children<F>(&self, node: TsNode, keep: F) -> Vec<Node>
    where
        F: Fn(TsNode, Option<&'static str>) -> bool,
    {
        self.lower_children_with(node, keep, |child, field| binding_for(node, child, field))
    }

    /// Lower the named children of `node`, skipping comments and anything
    /// `keep` rejects. `bind` decides the binding handed to each child.
    fn lower_children_with<F, B>(&self, node: TsNode, keep: F, bind: B) -> Vec<Node>
    where
        F: Fn(TsNode, Option<&'static str>) -> bool,
        B: Fn(TsNode, Option<&'static str>) -> Option<Binding>,
    {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return out;
        }

        loop {
            let child = cursor.node();
            let field = cursor.field_name();
            if child.is_named() && child.kind() != "comment" && keep(child, field) {
                out.push(self.lower(child, bind(child, field)));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }

        out
    }
}

/// Binding introduced for `child`, found in grammar field `field` of `parent`.
fn binding_for(parent: TsNode, child: TsNode, field: Option<&str>) -> Option<Binding> {
    let binding = match (parent.kind(), field) {
        ("type_spec" | "type_alias", Some("name")) => Binding::Type,
        ("field_declaration" | "method_elem" | "method_spec", Some("name")) => Binding::Field,
        ("function_declaration" | "method_declaration", Some("name")) => Binding::Func,
        ("var_spec" | "const_spec", Some("name")) => Binding::Value,
        ("parameter_declaration", Some("name")) if in_type_parameter_list(parent) => {
            Binding::TypeParameter
        }
        ("parameter_declaration" | "variadic_parameter_declaration", Some("name")) => {
            Binding::Parameter
        }
        ("type_parameter_declaration", Some("name")) => Binding::TypeParameter,
        ("labeled_statement", Some("label")) => Binding::Label,
        ("import_spec", Some("name")) => Binding::Import,
        ("short_var_declaration", Some("left")) => Binding::ShortVar,
        ("range_clause" | "receive_statement", Some("left")) if defines(parent) => {
            Binding::ShortVar
        }
        ("type_switch_statement", Some("alias")) => Binding::ShortVar,
        _ => return None,
    };

    // Only identifiers and the lists that hold them can carry a binding.
    if is_ident(child) || child.kind() == "expression_list" {
        Some(binding)
    } else {
        None
    }
}

fn in_type_parameter_list(node: TsNode) -> bool {
    node.parent()
        .is_some_and(|p| p.kind() == "type_parameter_list")
}

/// Whether a clause with an optional left-hand side uses `:=` rather than `=`.
fn defines(node: TsNode) -> bool {
    node.children(&mut node.walk()).any(|c| c.kind() == ":=")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::super::parse_str;
    use super::*;

    fn lowered(src: &str) -> Node {
        parse_str(Path::new("t.go"), src).unwrap().root
    }

    #[test]
    fn test_comments_are_dropped() {
        let root = lowered("package p\n\n// c1\n/* c2 */\nvar x = 1 // c3\n");
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].kind(), "var_declaration");
    }

    #[test]
    fn test_value_spec_keeps_initializer_as_children() {
        let root = lowered("package p\n\nvar a, b = 1, func() int { c := 2; return c }()\n");
        let decl = &root.children()[0];
        let spec = &decl.children()[0];

        match spec {
            Node::ValueGroup { names, children } => {
                let names: Vec<_> = names.iter().map(|n| n.name.as_str()).collect();
                assert_eq!(names, ["a", "b"]);
                let inner: Vec<_> = children.iter().flat_map(|c| c.idents()).collect();
                assert!(inner.iter().any(|i| i.name == "c" && i.binding == Some(Binding::ShortVar)));
            }
            other => panic!("expected value group, got {}", other.kind()),
        }
    }

    #[test]
    fn test_func_children_exclude_name() {
        let root = lowered("package p\n\nfunc F(x int) { y := x; _ = y }\n");
        let func = &root.children()[0];
        assert!(matches!(func, Node::Func { .. }));
        assert!(!func.children().iter().any(|c| matches!(c, Node::Ident(i) if i.name == "F")));
    }

    #[test]
    fn test_grouped_declarations() {
        let root = lowered("package p\n\nconst (\n    A = iota\n    B\n)\n\ntype (\n    S struct{}\n    T = S\n)\n");
        let names: Vec<_> = root
            .idents()
            .into_iter()
            .filter(|i| i.binding.is_some())
            .map(|i| (i.name.as_str(), i.binding))
            .collect();
        assert_eq!(
            names,
            [
                ("A", Some(Binding::Value)),
                ("B", Some(Binding::Value)),
                ("S", Some(Binding::Type)),
                ("T", Some(Binding::Type)),
            ]
        );
    }

    #[test]
    fn test_first_error_points_at_broken_line() {
        let src = "package p\n\nvar ok = 1\n\nfunc (\n";
        let err = parse_str(Path::new("t.go"), src).unwrap_err();
        match err {
            crate::syntax::ParseError::Syntax { line, .. } => assert!(line >= 5),
            other => panic!("unexpected error: {other}"),
        }
    }
}
