pub mod shell;
pub mod tokenize;
pub mod types;

pub use shell::{ShellParser, parse};
pub use types::{
    AstNode, CommandSchema, ControlOperator, ExplainResponse, LeafGroup, NodeKind, OptionSchema,
    ParsedUnits, Span,
};
