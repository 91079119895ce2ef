//! Types produced by the shell parser and consumed by the explainer.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Byte range of a node within the original query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// Knowledge attached to a program, subcommand, or `sudo` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Display name, e.g. `"ls"` even when typed as `/bin/ls`.
    pub name: String,
    /// One-line description from the knowledge base.
    pub summary: String,
}

/// Knowledge attached to an option node.
///
/// Also the on-disk shape of an option entry in the knowledge base, which is
/// why `takes_value` lives here: the parser needs it to tell `-n5` apart from
/// a cluster of boolean flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub takes_value: bool,
}

impl OptionSchema {
    /// Short aliases, empty when absent.
    pub fn short_aliases(&self) -> &[String] {
        self.short.as_deref().unwrap_or_default()
    }

    /// Long aliases, empty when absent.
    pub fn long_aliases(&self) -> &[String] {
        self.long.as_deref().unwrap_or_default()
    }

    pub fn matches_short(&self, flag: &str) -> bool {
        self.short_aliases().iter().any(|s| s == flag)
    }

    pub fn matches_long(&self, flag: &str) -> bool {
        self.long_aliases().iter().any(|l| l == flag)
    }
}

/// Discriminant of an [`AstNode`], used for dispatch and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Program,
    Option,
    StickyOption,
    Subcommand,
    Assignment,
    Operator,
    Sudo,
    Argument,
    Pipe,
    /// Syntax with no explanation wording (redirections, comments).
    Other,
}

/// One classified element of a parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AstNode {
    Program { span: Span, schema: CommandSchema },
    Subcommand { span: Span, schema: CommandSchema },
    Sudo { span: Span, schema: CommandSchema },
    Option { span: Span, schema: OptionSchema },
    /// An option with its value glued on: `-n5`, `--width=80`.
    StickyOption { span: Span, schema: OptionSchema },
    /// A `NAME=value` word preceding (or standing in for) a command.
    Assignment { span: Span, word: String },
    Argument { span: Span, word: String },
    /// A list operator such as `&&`, `||`, `;` or `&`.
    Operator { span: Span, op: String },
    Pipe { span: Span, pipe: String },
    /// Recognized syntax without wording; `grammar` is the tree-sitter node kind.
    Other { span: Span, grammar: String },
}

impl AstNode {
    pub fn span(&self) -> Span {
        match self {
            AstNode::Program { span, .. }
            | AstNode::Subcommand { span, .. }
            | AstNode::Sudo { span, .. }
            | AstNode::Option { span, .. }
            | AstNode::StickyOption { span, .. }
            | AstNode::Assignment { span, .. }
            | AstNode::Argument { span, .. }
            | AstNode::Operator { span, .. }
            | AstNode::Pipe { span, .. }
            | AstNode::Other { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Program { .. } => NodeKind::Program,
            AstNode::Subcommand { .. } => NodeKind::Subcommand,
            AstNode::Sudo { .. } => NodeKind::Sudo,
            AstNode::Option { .. } => NodeKind::Option,
            AstNode::StickyOption { .. } => NodeKind::StickyOption,
            AstNode::Assignment { .. } => NodeKind::Assignment,
            AstNode::Argument { .. } => NodeKind::Argument,
            AstNode::Operator { .. } => NodeKind::Operator,
            AstNode::Pipe { .. } => NodeKind::Pipe,
            AstNode::Other { .. } => NodeKind::Other,
        }
    }
}

/// Nodes produced from a single lexical unit, e.g. `-la` → `-l`, `-a`.
pub type LeafGroup = Vec<AstNode>;

/// All leaf groups of a command, in left-to-right order.
pub type ParsedUnits = Vec<LeafGroup>;

/// Shell list operators that carry their own wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOperator {
    /// `&&`: run next only if previous succeeded
    And,
    /// `||`: run next only if previous failed
    Or,
    /// `;`: run next unconditionally
    Semi,
    /// `&`: run previous in the background
    Background,
}

impl ControlOperator {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlOperator::And => "&&",
            ControlOperator::Or => "||",
            ControlOperator::Semi => ";",
            ControlOperator::Background => "&",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(ControlOperator::And),
            "||" => Some(ControlOperator::Or),
            ";" => Some(ControlOperator::Semi),
            "&" => Some(ControlOperator::Background),
            _ => None,
        }
    }
}

/// A query together with whatever the parser made of it.
///
/// `leaf_nodes` is `None` when the parser produced nothing to explain.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainResponse {
    pub query: String,
    pub leaf_nodes: Option<ParsedUnits>,
}
