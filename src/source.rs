use std::path::{Path, PathBuf};

use crate::ast::Program;
use crate::error::GrammarError;
use crate::expander::Expander;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Half-open codepoint range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// 1-based line and column of a codepoint offset.
pub fn line_col(chars: &[char], idx: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for &ch in chars.iter().take(idx.min(chars.len())) {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Run lexer, macro expander and parser over a complete source text.
/// `module_root` enables import-time macro collection (`吾嘗觀 … 之書`).
pub fn parse_source(source: &str, module_root: Option<&Path>) -> Result<Program, GrammarError> {
    let chars: Vec<char> = source.chars().collect();
    let tokens = Lexer::new(source).tokenize()?;
    let tokens = Expander::new(&chars, module_root).expand(tokens)?;
    Parser::new(tokens, &chars).parse()
}

/// Resolve an import path (`吾嘗觀` segments) to a `.wy` file under `root`.
pub fn find_module_file(segments: &[String], root: &Path) -> Option<PathBuf> {
    if segments.is_empty() {
        return None;
    }
    let mut path = root.to_path_buf();
    for seg in segments {
        path.push(seg);
    }
    path.set_extension("wy");
    if path.exists() {
        return Some(path);
    }
    None
}

pub fn canonicalize_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
