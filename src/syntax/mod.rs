//! Go syntax trees.
//!
//! Source is parsed with tree-sitter and immediately lowered into a small
//! owned tree. The lowered tree keeps only what tagging needs: the package
//! clause, function declarations, value specs, identifier occurrences and
//! the nesting of everything else. Each identifier that introduces a name
//! carries a [`Binding`] naming the construct it was declared by.

mod lower;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::Parser;

use crate::position::SourceMap;

// Thread-local parser caching to avoid re-initialization overhead.
//
// Parser initialization can fail (grammar ABI mismatch), so it is reported
// as an error rather than a panic.
thread_local! {
    static GO_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_go_parser() -> Result<Parser, ()> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|_| ())?;
    Ok(p)
}

/// Execute a function with a cached Go parser.
pub(crate) fn with_go_parser<F, R>(f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut Parser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(init_go_parser().map_err(|()| ParseError::ParserInit)?);
        }

        let parser = slot.as_mut().ok_or(ParseError::ParserInit)?;
        Ok(f(parser))
    })
}

/// The declaration construct that introduced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// `type T ...` or `type T = U`.
    Type,
    /// Struct field or interface method.
    Field,
    /// Function or method name.
    Func,
    /// Name in a `var` or `const` spec.
    Value,
    /// Function, method or function-type parameter (receivers and results included).
    Parameter,
    /// Generic type parameter.
    TypeParameter,
    /// Left-hand side of `:=`, including range clauses and type-switch aliases.
    ShortVar,
    /// Statement label.
    Label,
    /// Import alias.
    Import,
}

/// An identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    /// Byte offset of the identifier in the source.
    pub offset: usize,
    /// Set only on the occurrence that declares the name. Uses, and the
    /// blank identifier `_`, carry `None`.
    pub binding: Option<Binding>,
}

impl Ident {
    pub fn new(name: impl Into<String>, offset: usize, binding: Option<Binding>) -> Self {
        let name = name.into();
        let binding = if is_blank(&name) { None } else { binding };
        Self {
            name,
            offset,
            binding,
        }
    }

    /// Whether this is the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.name)
    }
}

fn is_blank(name: &str) -> bool {
    name == "_"
}

/// A node of the lowered syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root of a file.
    File {
        /// Package name from the package clause.
        package: String,
        /// Offset of the `package` keyword.
        package_offset: usize,
        /// Top-level declarations (the package clause itself excluded).
        children: Vec<Node>,
    },
    /// Function or method declaration.
    Func {
        name: Ident,
        /// Offset of the `func` keyword.
        offset: usize,
        /// Receiver, signature and body.
        children: Vec<Node>,
    },
    /// A single `var` or `const` spec, e.g. `a, b = 1, 2`.
    ValueGroup {
        names: SmallVec<[Ident; 2]>,
        /// Declared type and initializer expressions.
        children: Vec<Node>,
    },
    /// Identifier occurrence of any flavour (plain, type, field, package, label).
    Ident(Ident),
    /// Everything else, keyed by its tree-sitter kind.
    Other {
        kind: &'static str,
        children: Vec<Node>,
    },
}

impl Node {
    /// Child nodes, in source order.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::File { children, .. }
            | Node::Func { children, .. }
            | Node::ValueGroup { children, .. }
            | Node::Other { children, .. } => children,
            Node::Ident(_) => &[],
        }
    }

    /// Short description of the node kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::File { .. } => "source_file",
            Node::Func { .. } => "function_declaration",
            Node::ValueGroup { .. } => "value_spec",
            Node::Ident(_) => "identifier",
            Node::Other { kind, .. } => kind,
        }
    }

    /// Every identifier in this subtree, pre-order, including function and
    /// value-spec names.
    #[cfg(test)]
    pub(crate) fn idents(&self) -> Vec<&Ident> {
        fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Ident>) {
            match node {
                Node::Ident(ident) => out.push(ident),
                Node::Func { name, .. } => out.push(name),
                Node::ValueGroup { names, .. } => out.extend(names.iter()),
                _ => {}
            }
            for child in node.children() {
                collect(child, out);
            }
        }

        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }
}

/// A successfully parsed source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub source_map: SourceMap,
    /// Always a [`Node::File`].
    pub root: Node,
}

impl ParsedFile {
    pub fn path(&self) -> &Path {
        self.source_map.path()
    }
}

/// Reasons a file cannot be turned into a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to initialize Go parser")]
    ParserInit,

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: source is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    #[error("{path}: parser produced no tree")]
    NoTree { path: PathBuf },

    #[error("{path}:{line}: syntax error")]
    Syntax { path: PathBuf, line: usize },

    #[error("{path}: expected package clause")]
    MissingPackage { path: PathBuf },

    #[error("{path}:{line}: package clause must come first")]
    PackageNotFirst { path: PathBuf, line: usize },

    #[error("{path}:{line}: {kind} outside of a declaration")]
    TopLevelStatement {
        path: PathBuf,
        line: usize,
        kind: &'static str,
    },
}

/// Parse Go source bytes into a lowered syntax tree.
///
/// Any syntax error makes the whole file unusable; no partial tree is
/// returned.
pub fn parse(path: &Path, bytes: &[u8]) -> Result<ParsedFile, ParseError> {
    let source = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;

    let tree = with_go_parser(|parser| parser.parse(source, None))?.ok_or_else(|| {
        ParseError::NoTree {
            path: path.to_path_buf(),
        }
    })?;

    let source_map = SourceMap::new(path, source);
    let ts_root = tree.root_node();

    if ts_root.has_error() {
        let line = lower::first_error(ts_root)
            .map(|n| n.start_position().row + 1)
            .unwrap_or(1);
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            line,
        });
    }

    lower::check_layout(ts_root).map_err(|e| match e {
        lower::LayoutError::MissingPackage => ParseError::MissingPackage {
            path: path.to_path_buf(),
        },
        lower::LayoutError::PackageNotFirst { line } => ParseError::PackageNotFirst {
            path: path.to_path_buf(),
            line,
        },
        lower::LayoutError::TopLevelStatement { line, kind } => ParseError::TopLevelStatement {
            path: path.to_path_buf(),
            line,
            kind,
        },
    })?;

    let root = lower::lower_file(ts_root, source).ok_or_else(|| ParseError::MissingPackage {
        path: path.to_path_buf(),
    })?;

    Ok(ParsedFile { source_map, root })
}

/// Parse Go source text. Convenience wrapper over [`parse`].
pub fn parse_str(path: &Path, source: &str) -> Result<ParsedFile, ParseError> {
    parse(path, source.as_bytes())
}

/// Read a file from disk and parse it.
pub fn parse_file(path: &Path) -> Result<ParsedFile, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &bytes)
}
