use serde::Serialize;

use crate::highlight::Decorator;
use crate::parse::NodeKind;

/// One line of explanation, kept undecorated until display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub kind: NodeKind,
    /// Label parts, decorated one by one and joined with `", "`.
    pub labels: Vec<String>,
    /// `None` only for operators without wording.
    pub text: Option<String>,
}

impl Explanation {
    pub fn new(kind: NodeKind, labels: Vec<String>, text: Option<String>) -> Self {
        Self { kind, labels, text }
    }

    /// The undecorated label, as it would read without styling.
    pub fn label(&self) -> String {
        self.labels.join(", ")
    }

    /// Render as `  label: text` (or `  op - text` for operators), newline-terminated.
    pub fn render(&self, decorator: &dyn Decorator) -> String {
        let label = self
            .labels
            .iter()
            .map(|part| decorator.decorate(part, self.kind))
            .collect::<Vec<_>>()
            .join(", ");
        let text = self.text.as_deref().unwrap_or_default();
        match self.kind {
            NodeKind::Operator => format!("  {label} - {text}\n"),
            _ => format!("  {label}: {text}\n"),
        }
    }
}
