//! Tag extraction from a lowered syntax tree.
//!
//! The walk is pre-order and depth-first. Each node is dispatched on its
//! kind and the handler decides whether its children are visited:
//!
//! - file: tag the package name at the `package` keyword, then descend.
//! - function / method: tag the name at the `func` keyword, never descend.
//!   Nothing declared inside a body is tagged.
//! - value spec: tag each declared name at its own position, never descend.
//!   Closures in initializers stay hidden.
//! - anything else: tag identifiers that [`classify`] accepts, descend.
//!
//! [`classify`]: crate::classify

use crate::classify::is_indexable;
use crate::collector::{Tag, TagCollector};
use crate::position::SourceMap;
use crate::syntax::{Ident, Node, ParsedFile};

/// Whether a visited node's children should be walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Children,
    Skip,
}

/// Walks one file's tree and appends tags to a collector.
pub struct TagVisitor<'a> {
    source_map: &'a SourceMap,
    tags: &'a mut TagCollector,
    emitted: usize,
}

impl<'a> TagVisitor<'a> {
    pub fn new(source_map: &'a SourceMap, tags: &'a mut TagCollector) -> Self {
        Self {
            source_map,
            tags,
            emitted: 0,
        }
    }

    /// Number of tags appended so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Visit `node` and, unless it suppresses descent, its subtree.
    pub fn visit(&mut self, node: &Node) {
        if self.visit_node(node) == Descend::Children {
            for child in node.children() {
                self.visit(child);
            }
        }
    }

    /// Handle a single node without recursing.
    pub fn visit_node(&mut self, node: &Node) -> Descend {
        match node {
            Node::File {
                package,
                package_offset,
                ..
            } => {
                self.emit(package, *package_offset);
                Descend::Children
            }
            Node::Func { name, offset, .. } => {
                if !name.is_blank() {
                    self.emit(&name.name, *offset);
                }
                Descend::Skip
            }
            Node::ValueGroup { names, .. } => {
                for ident in names {
                    self.emit_if_declared(ident);
                }
                Descend::Skip
            }
            Node::Ident(ident) => {
                self.emit_if_declared(ident);
                Descend::Children
            }
            Node::Other { .. } => Descend::Children,
        }
    }

    fn emit_if_declared(&mut self, ident: &Ident) {
        if is_indexable(ident) {
            self.emit(&ident.name, ident.offset);
        }
    }

    fn emit(&mut self, name: &str, offset: usize) {
        let position = self.source_map.resolve(offset);
        self.tags.append(Tag::at(name, position));
        self.emitted += 1;
    }
}

/// Append the tags of one parsed file to `tags`. Returns how many were added.
pub fn extract_tags(file: &ParsedFile, tags: &mut TagCollector) -> usize {
    let mut visitor = TagVisitor::new(&file.source_map, tags);
    visitor.visit(&file.root);
    visitor.emitted()
}
