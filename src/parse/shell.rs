//! Turn a command string into classified leaf groups.
//!
//! tree-sitter-bash provides the syntax tree; the words of each simple command
//! are then classified against the knowledge [`Registry`].

use std::ops::Range;

use log::debug;
use tree_sitter::{Node, Parser};

use super::tokenize;
use super::types::{
    AstNode, ControlOperator, ExplainResponse, LeafGroup, OptionSchema, ParsedUnits, Span,
};
use crate::config::{ProgramSpec, SubcommandSpec};
use crate::error::Result;
use crate::knowledge::{self, OptionMatch, OptionScope, Registry};

/// Program name that gets a dedicated [`AstNode::Sudo`] node.
const SUDO: &str = "sudo";

/// Grammar node kinds reported as [`AstNode::Other`].
const UNEXPLAINED: &[&str] = &[
    "file_redirect",
    "heredoc_redirect",
    "herestring_redirect",
    "comment",
];

/// Builtins whose syntax tree node is not a plain `command`; their keyword is
/// explained as the program.
const DECLARATIONS: &[&str] = &["declaration_command", "unset_command"];

/// A reusable bash parser.
pub struct ShellParser {
    parser: Parser,
}

impl ShellParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_bash::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Parse `query` and classify every node it contains.
    pub fn parse(&mut self, query: &str, registry: &Registry) -> ExplainResponse {
        ExplainResponse {
            query: query.to_string(),
            leaf_nodes: self.leaf_nodes(query, registry),
        }
    }

    fn leaf_nodes(&mut self, query: &str, registry: &Registry) -> Option<ParsedUnits> {
        if query.trim().is_empty() {
            return None;
        }
        let tree = self.parser.parse(query, None)?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("syntax errors in {query:?}; explaining what parsed");
        }

        let mut walker = Walker {
            source: query,
            registry,
            units: Vec::new(),
        };
        walker.visit(root);
        if walker.units.is_empty() {
            None
        } else {
            Some(walker.units)
        }
    }
}

/// Parse a single query with a fresh parser.
pub fn parse(query: &str, registry: &Registry) -> Result<ExplainResponse> {
    Ok(ShellParser::new()?.parse(query, registry))
}

/// A word of a simple command with its position in the query.
#[derive(Debug, Clone, Copy)]
struct Word<'s> {
    text: &'s str,
    span: Span,
}

struct Walker<'s, 'r> {
    source: &'s str,
    registry: &'r Registry,
    units: ParsedUnits,
}

impl<'s, 'r> Walker<'s, 'r> {
    fn visit(&mut self, node: Node<'_>) {
        let kind = node.kind();
        if node.is_named() {
            match kind {
                k if k == "command" || DECLARATIONS.contains(&k) => {
                    return self.visit_command(node);
                }
                "variable_assignment" => {
                    let word = self.word(node);
                    return self.push(AstNode::Assignment {
                        span: word.span,
                        word: word.text.to_string(),
                    });
                }
                k if UNEXPLAINED.contains(&k) => return self.push_other(node),
                _ => {}
            }
        } else {
            let span = span_of(node);
            if let Some(op) = ControlOperator::from_symbol(kind) {
                return self.push(AstNode::Operator {
                    span,
                    op: op.as_str().to_string(),
                });
            }
            // `|` also separates `case` patterns.
            if matches!(kind, "|" | "|&")
                && node.parent().is_some_and(|p| p.kind() == "pipeline")
            {
                return self.push(AstNode::Pipe {
                    span,
                    pipe: kind.to_string(),
                });
            }
        }

        for child in children(node) {
            self.visit(child);
        }
    }

    fn visit_command(&mut self, node: Node<'_>) {
        let mut state = CommandState::new(self.registry);
        for child in children(node) {
            match child.kind() {
                "variable_assignment" => self.visit(child),
                k if UNEXPLAINED.contains(&k) => self.push_other(child),
                _ => {
                    let word = self.word(child);
                    if word.text.is_empty() {
                        continue;
                    }
                    let group = state.classify(word);
                    self.units.push(group);
                }
            }
        }
    }

    fn word(&self, node: Node<'_>) -> Word<'s> {
        let span = span_of(node);
        Word {
            text: self.source.get(span.range()).unwrap_or_default(),
            span,
        }
    }

    fn push(&mut self, node: AstNode) {
        self.units.push(vec![node]);
    }

    fn push_other(&mut self, node: Node<'_>) {
        self.push(AstNode::Other {
            span: span_of(node),
            grammar: node.kind().to_string(),
        });
    }
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Where the classifier is within a simple command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Next word names the program.
    ProgramName,
    /// After `sudo`: its own options, then the program it runs.
    SudoOptions,
    /// After the program name.
    Arguments,
}

/// Classifies the words of one simple command, left to right.
struct CommandState<'r> {
    registry: &'r Registry,
    position: Position,
    program: Option<&'r ProgramSpec>,
    subcommand: Option<&'r SubcommandSpec>,
    /// A positional word was seen, so no later word can be a subcommand.
    positional_seen: bool,
    /// The previous option takes the next word as its value.
    value_pending: bool,
    /// A bare `--` ended option parsing.
    options_ended: bool,
}

impl<'r> CommandState<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            position: Position::ProgramName,
            program: None,
            subcommand: None,
            positional_seen: false,
            value_pending: false,
            options_ended: false,
        }
    }

    fn scope(&self) -> OptionScope<'r> {
        let mut scope = OptionScope::new();
        if let Some(sub) = self.subcommand {
            scope = scope.with(&sub.options);
        }
        if let Some(program) = self.program {
            scope = scope.with(&program.options);
        }
        scope
    }

    fn classify(&mut self, word: Word<'_>) -> LeafGroup {
        let literal = tokenize::unquote(word.text);
        match self.position {
            Position::ProgramName => self.classify_program(word, &literal),
            Position::SudoOptions => {
                if self.value_pending {
                    self.value_pending = false;
                    return argument(word, literal);
                }
                if literal == "--" {
                    return argument(word, literal);
                }
                if let Some(group) = self.classify_option(word, &literal) {
                    return group;
                }
                if tokenize::is_assignment(&literal) {
                    return vec![AstNode::Assignment {
                        span: word.span,
                        word: word.text.to_string(),
                    }];
                }
                self.classify_program(word, &literal)
            }
            Position::Arguments => self.classify_argument(word, literal),
        }
    }

    fn classify_program(&mut self, word: Word<'_>, literal: &str) -> LeafGroup {
        let spec = self.registry.program(literal);
        self.program = spec;
        self.subcommand = None;

        if tokenize::base_name(literal) == SUDO {
            debug!("sudo at {:?}", word.span);
            self.position = Position::SudoOptions;
            let schema = spec
                .map(ProgramSpec::schema)
                .unwrap_or_else(|| knowledge::unknown_program(SUDO));
            return vec![AstNode::Sudo {
                span: word.span,
                schema,
            }];
        }

        self.position = Position::Arguments;
        let schema = match spec {
            Some(spec) => spec.schema(),
            None => {
                debug!("no knowledge for program {literal:?}");
                knowledge::unknown_program(literal)
            }
        };
        vec![AstNode::Program {
            span: word.span,
            schema,
        }]
    }

    fn classify_argument(&mut self, word: Word<'_>, literal: String) -> LeafGroup {
        if self.value_pending {
            self.value_pending = false;
            return argument(word, literal);
        }
        if self.options_ended {
            return argument(word, literal);
        }
        if literal == "--" {
            self.options_ended = true;
            return argument(word, literal);
        }
        if let Some(group) = self.classify_option(word, &literal) {
            return group;
        }

        if !self.positional_seen
            && self.subcommand.is_none()
            && let Some(sub) = self.program.and_then(|p| p.subcommand(&literal))
        {
            self.subcommand = Some(sub);
            self.positional_seen = true;
            return vec![AstNode::Subcommand {
                span: word.span,
                schema: sub.schema(),
            }];
        }

        if !literal.starts_with('-') {
            self.positional_seen = true;
        }
        argument(word, literal)
    }

    fn classify_option(&mut self, word: Word<'_>, literal: &str) -> Option<LeafGroup> {
        let matched = self.scope().resolve(literal)?;
        self.value_pending = matched.expects_value();
        let group = match matched {
            OptionMatch::Flag(schema) => vec![AstNode::Option {
                span: word.span,
                schema: schema.clone(),
            }],
            OptionMatch::Sticky(schema) => vec![AstNode::StickyOption {
                span: word.span,
                schema: schema.clone(),
            }],
            // Sub-spans index the raw word, so quoted clusters stay whole.
            OptionMatch::Cluster { flags, sticky } if word.text == literal => {
                let last = flags.len().saturating_sub(1);
                flags
                    .into_iter()
                    .enumerate()
                    .map(|(i, (schema, range))| {
                        let span =
                            Span::new(word.span.start + range.start, word.span.start + range.end);
                        let schema = schema.clone();
                        if sticky && i == last {
                            AstNode::StickyOption { span, schema }
                        } else {
                            AstNode::Option { span, schema }
                        }
                    })
                    .collect()
            }
            OptionMatch::Cluster { flags, .. } => vec![AstNode::Option {
                span: word.span,
                schema: merge_cluster(literal, &flags),
            }],
        };
        Some(group)
    }
}

/// Fold a quoted cluster such as `'-la'` into one option listing every flag.
fn merge_cluster(literal: &str, flags: &[(&OptionSchema, Range<usize>)]) -> OptionSchema {
    let short = flags
        .iter()
        .filter_map(|(_, range)| {
            let at = range.start.max(1);
            literal.get(at..at + 1)
        })
        .map(|letter| format!("-{letter}"))
        .collect();
    let summary = flags
        .iter()
        .map(|(schema, _)| schema.summary.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    OptionSchema {
        summary,
        short: Some(short),
        long: None,
        takes_value: false,
    }
}

fn argument(word: Word<'_>, literal: String) -> LeafGroup {
    vec![AstNode::Argument {
        span: word.span,
        word: literal,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parse::NodeKind;

    fn units(query: &str) -> ParsedUnits {
        let registry = Registry::from_config(&Config::default_config());
        parse(query, &registry).unwrap().leaf_nodes.unwrap()
    }

    fn kinds(query: &str) -> Vec<Vec<NodeKind>> {
        units(query)
            .iter()
            .map(|g| g.iter().map(AstNode::kind).collect())
            .collect()
    }

    fn texts(query: &str) -> Vec<String> {
        units(query)
            .iter()
            .flatten()
            .map(|n| query[n.span().range()].to_string())
            .collect()
    }

    #[test]
    fn empty_query_has_no_result() {
        let registry = Registry::from_config(&Config::default_config());
        assert!(parse("", &registry).unwrap().leaf_nodes.is_none());
        assert!(parse("   ", &registry).unwrap().leaf_nodes.is_none());
    }

    #[test]
    fn program_and_cluster() {
        assert_eq!(
            kinds("ls -la"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Option, NodeKind::Option]
            ]
        );
        assert_eq!(texts("ls -la"), vec!["ls", "-l", "a"]);
    }

    #[test]
    fn program_schema_from_knowledge() {
        let u = units("/bin/ls");
        match &u[0][0] {
            AstNode::Program { schema, .. } => {
                assert_eq!(schema.name, "ls");
                assert_eq!(schema.summary, "list directory contents");
            }
            other => panic!("expected program, got {other:?}"),
        }
    }

    #[test]
    fn unknown_program_and_flags() {
        assert_eq!(
            kinds("frob --zap x"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Argument],
                vec![NodeKind::Argument]
            ]
        );
    }

    #[test]
    fn and_operator() {
        let u = units("ls && pwd");
        assert_eq!(u.len(), 3);
        match &u[1][0] {
            AstNode::Operator { op, span } => {
                assert_eq!(op, "&&");
                assert_eq!(*span, Span::new(3, 5));
            }
            other => panic!("expected operator, got {other:?}"),
        }
    }

    #[test]
    fn or_and_semicolon_operators() {
        let ops: Vec<String> = units("a || b; c")
            .iter()
            .flatten()
            .filter_map(|n| match n {
                AstNode::Operator { op, .. } => Some(op.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(ops, vec!["||", ";"]);
    }

    #[test]
    fn pipe() {
        assert_eq!(
            kinds("cat file | grep -i pat"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Argument],
                vec![NodeKind::Pipe],
                vec![NodeKind::Program],
                vec![NodeKind::Option],
                vec![NodeKind::Argument]
            ]
        );
    }

    #[test]
    fn assignment_prefix() {
        let u = units("FOO=bar make");
        match &u[0][0] {
            AstNode::Assignment { word, span } => {
                assert_eq!(word, "FOO=bar");
                assert_eq!(*span, Span::new(0, 7));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        assert_eq!(u[1][0].kind(), NodeKind::Program);
    }

    #[test]
    fn sudo_then_program() {
        assert_eq!(
            kinds("sudo -u root rm -rf /tmp/x"),
            vec![
                vec![NodeKind::Sudo],
                vec![NodeKind::Option],
                vec![NodeKind::Argument],
                vec![NodeKind::Program],
                vec![NodeKind::Option, NodeKind::Option],
                vec![NodeKind::Argument]
            ]
        );
    }

    #[test]
    fn subcommand_and_its_options() {
        let u = units("git commit -m 'fix it'");
        assert_eq!(u[1][0].kind(), NodeKind::Subcommand);
        assert_eq!(u[2][0].kind(), NodeKind::Option);
        match &u[3][0] {
            AstNode::Argument { word, .. } => assert_eq!(word, "fix it"),
            other => panic!("expected argument, got {other:?}"),
        }
    }

    #[test]
    fn subcommand_only_first_positional() {
        let u = units("git log status");
        assert_eq!(u[1][0].kind(), NodeKind::Subcommand);
        assert_eq!(u[2][0].kind(), NodeKind::Argument);
    }

    #[test]
    fn program_options_before_subcommand() {
        assert_eq!(
            kinds("git -C repo status"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Option],
                vec![NodeKind::Argument],
                vec![NodeKind::Subcommand]
            ]
        );
    }

    #[test]
    fn sticky_options() {
        assert_eq!(
            kinds("head -n5 --lines=3 f"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::StickyOption],
                vec![NodeKind::StickyOption],
                vec![NodeKind::Argument]
            ]
        );
    }

    #[test]
    fn quoted_cluster_folds_into_one_option() {
        let u = units("ls '-la'");
        assert_eq!(u[1].len(), 1);
        match &u[1][0] {
            AstNode::Option { schema, span } => {
                assert_eq!(schema.short_aliases(), ["-l", "-a"]);
                assert_eq!(*span, Span::new(3, 8));
            }
            other => panic!("expected option, got {other:?}"),
        }
    }

    #[test]
    fn double_dash_ends_options() {
        assert_eq!(
            kinds("rm -- -f"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Argument],
                vec![NodeKind::Argument]
            ]
        );
    }

    #[test]
    fn case_pattern_bar_is_not_a_pipe() {
        let all: Vec<NodeKind> = kinds("case $x in a|b) echo hi;; esac")
            .into_iter()
            .flatten()
            .collect();
        assert!(!all.contains(&NodeKind::Pipe), "{all:?}");
        assert_eq!(texts("case $x in a|b) echo hi;; esac"), vec!["echo", "hi"]);
    }

    #[test]
    fn pipe_and_case_together() {
        let pipes = units("case $x in a|b) ls | wc -l;; esac")
            .iter()
            .flatten()
            .filter(|n| n.kind() == NodeKind::Pipe)
            .count();
        assert_eq!(pipes, 1);
    }

    #[test]
    fn sudo_double_dash_then_program() {
        assert_eq!(
            kinds("sudo -- rm -rf x"),
            vec![
                vec![NodeKind::Sudo],
                vec![NodeKind::Argument],
                vec![NodeKind::Program],
                vec![NodeKind::Option, NodeKind::Option],
                vec![NodeKind::Argument]
            ]
        );
        assert_eq!(texts("sudo -- rm -rf x")[2], "rm");
    }

    #[test]
    fn declaration_keyword_is_the_program() {
        let u = units("export FOO=1");
        match &u[0][0] {
            AstNode::Program { schema, span } => {
                assert_eq!(schema.name, "export");
                assert_eq!(*span, Span::new(0, 6));
            }
            other => panic!("expected program, got {other:?}"),
        }
        assert_eq!(u[1][0].kind(), NodeKind::Assignment);
    }

    #[test]
    fn declaration_options_resolve() {
        assert_eq!(
            kinds("declare -x PATH=/bin"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Option],
                vec![NodeKind::Assignment]
            ]
        );
        assert_eq!(kinds("unset -f greet")[0], vec![NodeKind::Program]);
    }

    #[test]
    fn value_flag_inside_cluster_is_sticky() {
        assert_eq!(
            kinds("tar -xfz a"),
            vec![
                vec![NodeKind::Program],
                vec![NodeKind::Option, NodeKind::StickyOption],
                vec![NodeKind::Argument]
            ]
        );
        assert_eq!(texts("tar -xfz a"), vec!["tar", "-x", "fz", "a"]);
    }

    #[test]
    fn cluster_value_may_contain_a_path() {
        assert_eq!(
            texts("tar -xf/tmp/a.tar"),
            vec!["tar", "-x", "f/tmp/a.tar"]
        );
    }

    #[test]
    fn redirect_is_other() {
        let u = units("ls > out.txt");
        let last = u.last().unwrap();
        match &last[0] {
            AstNode::Other { grammar, .. } => assert_eq!(grammar, "file_redirect"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn spans_are_ordered_and_disjoint() {
        let u = units("sudo FOO=1 tar -xzf a.tgz && ls -la | wc -l");
        let spans: Vec<Span> = u.iter().flatten().map(AstNode::span).collect();
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{pair:?}");
        }
    }

    #[test]
    fn subshell_contents_are_walked() {
        let found = units("(cd /tmp && ls)")
            .iter()
            .flatten()
            .any(|n| matches!(n, AstNode::Operator { op, .. } if op == "&&"));
        assert!(found);
    }

    #[test]
    fn parser_is_reusable() {
        let registry = Registry::from_config(&Config::default_config());
        let mut parser = ShellParser::new().unwrap();
        let first = parser.parse("ls", &registry);
        let second = parser.parse("cat a", &registry);
        assert_eq!(first.leaf_nodes.unwrap().len(), 1);
        assert_eq!(second.leaf_nodes.unwrap().len(), 2);
    }
}
