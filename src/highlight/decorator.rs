use std::io::{self, Write};

use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use crate::parse::NodeKind;

/// Kind-aware styling of a piece of text.
pub trait Decorator {
    fn decorate(&self, text: &str, kind: NodeKind) -> String;
}

/// Leaves text untouched. Used for JSON output and when color is off.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainDecorator;

impl Decorator for PlainDecorator {
    fn decorate(&self, text: &str, _kind: NodeKind) -> String {
        text.to_string()
    }
}

/// Styles text with ANSI escapes through termcolor.
///
/// Whether escapes are actually emitted follows the [`ColorChoice`]
/// (`Auto` honors `TERM=dumb` and `NO_COLOR`).
pub struct AnsiDecorator {
    writer: BufferWriter,
}

impl AnsiDecorator {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            writer: BufferWriter::stdout(choice),
        }
    }
}

impl Decorator for AnsiDecorator {
    fn decorate(&self, text: &str, kind: NodeKind) -> String {
        let Some(spec) = color_spec(kind) else {
            return text.to_string();
        };
        let mut buf = self.writer.buffer();
        if paint(&mut buf, &spec, text).is_err() {
            return text.to_string();
        }
        String::from_utf8(buf.into_inner()).unwrap_or_else(|_| text.to_string())
    }
}

fn paint(buf: &mut Buffer, spec: &ColorSpec, text: &str) -> io::Result<()> {
    buf.set_color(spec)?;
    buf.write_all(text.as_bytes())?;
    buf.reset()
}

/// Per-kind style. Every styled kind is underlined so adjacent spans stay
/// distinguishable; `Other` is never styled.
fn color_spec(kind: NodeKind) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match kind {
        NodeKind::Program => spec.set_fg(Some(Color::Green)).set_bold(true),
        NodeKind::Subcommand => spec.set_fg(Some(Color::Cyan)).set_bold(true),
        NodeKind::Sudo => spec.set_fg(Some(Color::Red)).set_bold(true),
        NodeKind::Option | NodeKind::StickyOption => spec.set_fg(Some(Color::Yellow)),
        NodeKind::Assignment => spec.set_fg(Some(Color::Magenta)),
        NodeKind::Argument => spec.set_fg(Some(Color::Blue)),
        NodeKind::Operator | NodeKind::Pipe => spec.set_fg(Some(Color::Magenta)).set_bold(true),
        NodeKind::Other => return None,
    };
    spec.set_underline(true);
    Some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_is_identity() {
        assert_eq!(PlainDecorator.decorate("ls", NodeKind::Program), "ls");
    }

    #[test]
    fn ansi_wraps_styled_kinds() {
        let d = AnsiDecorator::new(ColorChoice::Always);
        let out = d.decorate("ls", NodeKind::Program);
        assert!(out.starts_with("\x1b["));
        assert!(out.contains("ls"));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn ansi_never_is_plain() {
        let d = AnsiDecorator::new(ColorChoice::Never);
        assert_eq!(d.decorate("-l", NodeKind::Option), "-l");
    }

    #[test]
    fn other_is_never_styled() {
        let d = AnsiDecorator::new(ColorChoice::Always);
        assert_eq!(d.decorate("> out", NodeKind::Other), "> out");
    }

    #[test]
    fn kinds_get_distinct_styles() {
        assert_ne!(color_spec(NodeKind::Program), color_spec(NodeKind::Option));
        assert_eq!(color_spec(NodeKind::Option), color_spec(NodeKind::StickyOption));
    }
}
