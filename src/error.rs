use thiserror::Error;

use crate::source::{line_col, Span};

/// 文法之禍 — the single error kind covering lexing, macro expansion and
/// parsing. Carries the offending source range both as codepoint offsets
/// and as 1-based line/column pairs so the display string is self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("文法之禍[{line}:{col}-{end_line}:{end_col}]: {msg}")]
pub struct GrammarError {
    pub msg: String,
    pub span: Span,
    pub line: usize,
    pub col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl GrammarError {
    pub fn at(msg: impl Into<String>, span: Span, chars: &[char]) -> Self {
        let (line, col) = line_col(chars, span.start);
        let (end_line, end_col) = line_col(chars, span.end);
        GrammarError {
            msg: msg.into(),
            span,
            line,
            col,
            end_line,
            end_col,
        }
    }
}
