//! Explanation generator: one record per explainable node.
//!
//! [`generate`] does the kind dispatch and text assembly; [`render`] turns the
//! records into the indented block shown to the user, decorating each label
//! through a [`Decorator`].

pub mod record;

pub use record::Explanation;

use crate::highlight::Decorator;
use crate::parse::{AstNode, ControlOperator, LeafGroup, OptionSchema};

pub const ASSIGNMENT_TEXT: &str = "A variable passed to the program process";
pub const ARGUMENT_TEXT: &str = "An argument";
pub const PIPE_TEXT: &str =
    "A pipe connects the STDOUT of the first process to the STDIN of the second";
pub const AND_TEXT: &str =
    "command2 is executed if, and only if, command1 returns an exit status of zero";
pub const OR_TEXT: &str =
    "command2 is executed if, and only if, command1 returns a non-zero exit status";

/// Explain every node of every group, in document order.
pub fn generate(units: &[LeafGroup]) -> Vec<Explanation> {
    units.iter().flatten().filter_map(explain_node).collect()
}

/// Explain a single node. `None` for nodes without wording.
pub fn explain_node(node: &AstNode) -> Option<Explanation> {
    let kind = node.kind();
    let record = match node {
        AstNode::Program { schema, .. } | AstNode::Subcommand { schema, .. } => {
            Explanation::new(kind, vec![schema.name.clone()], Some(schema.summary.clone()))
        }
        AstNode::Sudo { schema, .. } => {
            Explanation::new(kind, vec!["sudo".into()], Some(schema.summary.clone()))
        }
        AstNode::Option { schema, .. } | AstNode::StickyOption { schema, .. } => {
            Explanation::new(kind, option_labels(schema), Some(schema.summary.clone()))
        }
        AstNode::Assignment { word, .. } => {
            Explanation::new(kind, vec![word.clone()], Some(ASSIGNMENT_TEXT.into()))
        }
        AstNode::Argument { word, .. } => {
            Explanation::new(kind, vec![word.clone()], Some(ARGUMENT_TEXT.into()))
        }
        AstNode::Pipe { pipe, .. } => {
            Explanation::new(kind, vec![pipe.clone()], Some(PIPE_TEXT.into()))
        }
        AstNode::Operator { op, .. } => {
            Explanation::new(kind, vec![op.clone()], operator_text(op).map(String::from))
        }
        AstNode::Other { .. } => return None,
    };
    Some(record)
}

/// Short aliases as one label, long aliases as another; empty groups dropped.
fn option_labels(schema: &OptionSchema) -> Vec<String> {
    [schema.short_aliases(), schema.long_aliases()]
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|group| group.join(", "))
        .collect()
}

/// Wording for the short-circuit operators. Other operators have none.
fn operator_text(op: &str) -> Option<&'static str> {
    match ControlOperator::from_symbol(op)? {
        ControlOperator::And => Some(AND_TEXT),
        ControlOperator::Or => Some(OR_TEXT),
        ControlOperator::Semi | ControlOperator::Background => None,
    }
}

/// Join records into the display block, one newline-terminated line each.
pub fn render(records: &[Explanation], decorator: &dyn Decorator) -> String {
    records.iter().map(|r| r.render(decorator)).collect()
}
