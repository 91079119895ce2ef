//! Interactive front end: prompt for a command, print its explanation.

use std::io::Write;

use dialoguer::Input;
use log::warn;
use serde::Serialize;

use crate::error::Result;
use crate::explain::{self, Explanation};
use crate::highlight::{self, Decorator};
use crate::logging;
use crate::parse::{ExplainResponse, LeafGroup};

/// Message shown when the parser produced nothing to explain.
pub const NO_RESULT: &str = "No result";

const PROMPT: &str = "Explain a command:";

/// Prints explanations with a fixed icon and decoration style.
pub struct ExplainConsole {
    icon: String,
    decorator: Box<dyn Decorator>,
}

/// Machine-readable form of one explained query.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub query: &'a str,
    pub leaf_nodes: Option<&'a [LeafGroup]>,
    pub explanations: Vec<Explanation>,
}

impl ExplainConsole {
    pub fn new(icon: impl Into<String>, decorator: Box<dyn Decorator>) -> Self {
        Self {
            icon: icon.into(),
            decorator,
        }
    }

    /// Ask for the command to explain.
    pub fn prompt(&self) -> Result<String> {
        let query = Input::<String>::new()
            .with_prompt(format!("{} {PROMPT}", self.icon))
            .allow_empty(true)
            .interact_text()?;
        Ok(query)
    }

    /// The explanation block for `units`, decorated for display.
    pub fn make_help(&self, units: &[LeafGroup]) -> String {
        explain::render(&explain::generate(units), self.decorator.as_ref())
    }

    /// Print the highlighted query followed by its explanation block.
    ///
    /// Without parse results only the "No result" error is printed.
    pub fn render(&self, out: &mut dyn Write, response: &ExplainResponse) -> Result<()> {
        writeln!(out)?;
        match response.leaf_nodes.as_deref() {
            Some(units) if !units.is_empty() => {
                let records = explain::generate(units);
                logging::log_explanation(&response.query, &records);
                let decorated =
                    highlight::highlight(&response.query, units, self.decorator.as_ref());
                writeln!(out, "  {decorated}")?;
                writeln!(out)?;
                write!(out, "{}", explain::render(&records, self.decorator.as_ref()))?;
            }
            _ => self.error(out, NO_RESULT)?,
        }
        writeln!(out)?;
        Ok(())
    }

    /// Print the response as pretty JSON.
    pub fn render_json(&self, out: &mut dyn Write, response: &ExplainResponse) -> Result<()> {
        let units = response.leaf_nodes.as_deref();
        let report = Report {
            query: &response.query,
            leaf_nodes: units,
            explanations: units.map(explain::generate).unwrap_or_default(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn error(&self, out: &mut dyn Write, msg: &str) -> Result<()> {
        warn!("{msg}");
        writeln!(out, "  ✖ {msg}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainDecorator;
    use crate::parse::{AstNode, CommandSchema, Span};

    fn console() -> ExplainConsole {
        ExplainConsole::new(">", Box::new(PlainDecorator))
    }

    fn rendered(response: &ExplainResponse) -> String {
        let mut out = Vec::new();
        console().render(&mut out, response).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn ls_units() -> Vec<LeafGroup> {
        vec![vec![AstNode::Program {
            span: Span::new(0, 2),
            schema: CommandSchema {
                name: "ls".into(),
                summary: "list directory contents".into(),
            },
        }]]
    }

    #[test]
    fn renders_query_then_help() {
        let response = ExplainResponse {
            query: "ls".into(),
            leaf_nodes: Some(ls_units()),
        };
        assert_eq!(
            rendered(&response),
            "\n  ls\n\n  ls: list directory contents\n\n"
        );
    }

    #[test]
    fn make_help_matches_rendered_block() {
        assert_eq!(console().make_help(&ls_units()), "  ls: list directory contents\n");
    }

    #[test]
    fn missing_nodes_reports_no_result() {
        let response = ExplainResponse {
            query: "".into(),
            leaf_nodes: None,
        };
        assert_eq!(rendered(&response), "\n  ✖ No result\n\n");
    }

    #[test]
    fn empty_nodes_reports_no_result() {
        let response = ExplainResponse {
            query: "ls".into(),
            leaf_nodes: Some(vec![]),
        };
        let out = rendered(&response);
        assert!(out.contains(NO_RESULT));
        assert!(!out.contains("  ls\n"));
    }

    #[test]
    fn json_report_includes_explanations() {
        let response = ExplainResponse {
            query: "ls".into(),
            leaf_nodes: Some(ls_units()),
        };
        let mut out = Vec::new();
        console().render_json(&mut out, &response).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["query"], "ls");
        assert_eq!(json["explanations"][0]["labels"][0], "ls");
        assert_eq!(json["leaf_nodes"][0][0]["kind"], "program");
    }

    #[test]
    fn json_report_without_nodes() {
        let response = ExplainResponse {
            query: " ".into(),
            leaf_nodes: None,
        };
        let mut out = Vec::new();
        console().render_json(&mut out, &response).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(json["leaf_nodes"].is_null());
        assert_eq!(json["explanations"], serde_json::json!([]));
    }
}
