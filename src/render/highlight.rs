use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use super::html::html_escape;
use super::rows::RowKind;

const FALLBACK_THEME: &str = "InspiredGitHub";

/// Cached syntax highlighting state, loaded once and reused for all files.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                log::warn!("unknown highlight theme {theme_name:?}, using {FALLBACK_THEME}");
                theme_set
                    .themes
                    .remove(FALLBACK_THEME)
                    .unwrap_or_default()
            }
        };
        Highlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Highlight a single line of code as inline-styled HTML spans, with no
    /// state carried over from surrounding lines.
    pub fn highlight_line(&self, line: &str, filename: &str) -> String {
        self.session(filename).highlight(line, RowKind::Context)
    }

    /// Start highlighting a file. The session keeps parse state from line to
    /// line so multi-line constructs (block comments, raw strings) stay
    /// coloured across a hunk.
    pub fn session(&self, filename: &str) -> HighlightSession<'_> {
        let syntax = self
            .syntax_set
            .find_syntax_for_file(filename)
            .ok()
            .flatten()
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        HighlightSession {
            highlighter: self,
            syntax,
            old_side: HighlightLines::new(syntax, &self.theme),
            new_side: HighlightLines::new(syntax, &self.theme),
        }
    }
}

/// Per-file highlighting state. Removed lines run through the old side, added
/// and revealed lines through the new side, diff context through both.
pub struct HighlightSession<'h> {
    highlighter: &'h Highlighter,
    syntax: &'h SyntaxReference,
    old_side: HighlightLines<'h>,
    new_side: HighlightLines<'h>,
}

impl HighlightSession<'_> {
    /// Forget parse state; called wherever the table skips lines.
    pub fn reset(&mut self) {
        let highlighter = self.highlighter;
        let theme = &highlighter.theme;
        self.old_side = HighlightLines::new(self.syntax, theme);
        self.new_side = HighlightLines::new(self.syntax, theme);
    }

    /// Falls back to escaped plain text when highlighting fails.
    pub fn highlight(&mut self, line: &str, kind: RowKind) -> String {
        let highlighter = self.highlighter;
        let syntax_set = &highlighter.syntax_set;
        // syntect needs a trailing newline
        let input = format!("{line}\n");

        let html = match kind {
            RowKind::Removed => to_html(&mut self.old_side, &input, syntax_set),
            RowKind::Context => {
                let _ = self.old_side.highlight_line(&input, syntax_set);
                to_html(&mut self.new_side, &input, syntax_set)
            }
            _ => to_html(&mut self.new_side, &input, syntax_set),
        };

        match html {
            Some(html) => html.trim_end_matches('\n').to_string(),
            None => html_escape(line),
        }
    }
}

fn to_html(lines: &mut HighlightLines<'_>, input: &str, syntax_set: &SyntaxSet) -> Option<String> {
    lines
        .highlight_line(input, syntax_set)
        .ok()
        .and_then(|ranges| styled_line_to_highlighted_html(&ranges, IncludeBackground::No).ok())
}

/// How code text becomes table-cell HTML.
pub enum CodeFormatter {
    Plain,
    Highlighted(Highlighter),
}

impl CodeFormatter {
    pub fn format(&self, line: &str, filename: &str) -> String {
        match self {
            CodeFormatter::Plain => html_escape(line),
            CodeFormatter::Highlighted(h) => h.highlight_line(line, filename),
        }
    }

    /// Formatter for the rows of one file table.
    pub fn for_file(&self, filename: &str) -> FileFormatter<'_> {
        match self {
            CodeFormatter::Plain => FileFormatter::Plain,
            CodeFormatter::Highlighted(h) => FileFormatter::Highlighted(h.session(filename)),
        }
    }
}

pub enum FileFormatter<'h> {
    Plain,
    Highlighted(HighlightSession<'h>),
}

impl FileFormatter<'_> {
    pub fn reset(&mut self) {
        if let FileFormatter::Highlighted(session) = self {
            session.reset();
        }
    }

    pub fn format(&mut self, line: &str, kind: RowKind) -> String {
        match self {
            FileFormatter::Plain => html_escape(line),
            FileFormatter::Highlighted(session) => session.highlight(line, kind),
        }
    }
}
