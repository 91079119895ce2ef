//! Span highlighter: decorate each node's slice of the original query.

pub mod decorator;

pub use decorator::{AnsiDecorator, Decorator, PlainDecorator};

use log::debug;

use crate::parse::{AstNode, LeafGroup, NodeKind};

/// Copy `query`, wrapping every explainable node's span with its decoration.
///
/// Nodes are applied in increasing span-start order. Characters outside any
/// span are copied as-is, so stripping the decoration yields `query` again.
/// `Other` nodes, empty spans, and spans that are out of bounds or overlap an
/// earlier span are left undecorated.
pub fn highlight(query: &str, units: &[LeafGroup], decorator: &dyn Decorator) -> String {
    let mut nodes: Vec<&AstNode> = units.iter().flatten().collect();
    nodes.sort_by_key(|node| node.span().start);

    let mut out = String::with_capacity(query.len() * 2);
    let mut cursor = 0;
    for node in nodes {
        let kind = node.kind();
        let span = node.span();
        if kind == NodeKind::Other || span.is_empty() {
            continue;
        }
        if span.start < cursor {
            debug!("skipping {kind:?} at {span:?}: overlaps previous span");
            continue;
        }
        let (Some(gap), Some(text)) = (query.get(cursor..span.start), query.get(span.range()))
        else {
            debug!("skipping {kind:?} at {span:?}: not a valid slice of the query");
            continue;
        };
        out.push_str(gap);
        out.push_str(&decorator.decorate(text, kind));
        cursor = span.end;
    }
    out.push_str(query.get(cursor..).unwrap_or_default());
    out
}
