use std::ops::Range;

use annotate_snippets::{Level, Renderer, Snippet};

use crate::isa;

/// The positional arguments joined back into one line, so diagnostics can
/// point at a single argument the way they would point into a source file.
#[derive(Debug)]
pub struct CommandLine {
    /// Arguments separated by single spaces
    source: String,
    /// Byte range of every argument in `source`
    spans: Vec<Range<usize>>,
}

impl CommandLine {
    pub fn new<'a>(args: impl IntoIterator<Item = &'a str>) -> Self {
        let mut source = String::new();
        let mut spans = Vec::new();
        for arg in args {
            if !source.is_empty() {
                source.push(' ');
            }
            let start = source.len();
            // quote what would otherwise be invisible
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                source.push_str(&format!("{arg:?}"));
            } else {
                source.push_str(arg);
            }
            spans.push(start..source.len());
        }
        Self { source, spans }
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    /// Span of argument `arg`, or the end of the line if there is no such argument
    pub fn span(&self, arg: usize) -> Range<usize> {
        self.spans
            .get(arg)
            .cloned()
            .unwrap_or(self.source.len()..self.source.len())
    }
    /// Renders `err` with the blamed argument underlined
    pub fn render(&self, renderer: &Renderer, err: &isa::Error) -> String {
        let title = err.to_string();
        let hint = err.hint();
        let prefix = match err {
            isa::Error::InvalidRegister { .. } => "Register Error",
            isa::Error::UnknownInstruction { .. } | isa::Error::OperandCount { .. } => "Instruction Error",
        };
        let title = format!("{prefix}: {title}");

        let msg = Level::Error.title(&title)
            .snippet(
                Snippet::source(self.source())
                    .fold(true)
                    .annotation(Level::Error
                        .span(self.span(err.argument()))
                        .label(&hint))
            );

        let out = renderer.render(msg).to_string();
        out
    }
}
