//! Macro expansion: `或云 <literal> 蓋謂 <literal>` token rewriting.
//!
//! Rules live in declaration order. A token is checked against rules in
//! that order, and once a rule fires only later rules may fire on the
//! result, so later macros can build on earlier ones while recursive
//! definitions cannot loop. Rewrites change a token's kind only; lexeme
//! and span keep pointing at the original source.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::GrammarError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::source::{canonicalize_path, find_module_file, Span};

#[derive(Debug, Clone, PartialEq)]
enum Pattern {
    Ident(String),
    Str(String),
}

impl Pattern {
    fn content(&self) -> &str {
        match self {
            Pattern::Ident(s) | Pattern::Str(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    source: Pattern,
    replacement: Pattern,
}

pub struct Expander<'a> {
    chars: &'a [char],
    module_root: Option<PathBuf>,
    rules: Vec<Rule>,
    /// Canonical paths whose macros were already collected; doubles as the
    /// cycle guard for recursive imports.
    visited: HashSet<String>,
}

impl<'a> Expander<'a> {
    pub fn new(chars: &'a [char], module_root: Option<&Path>) -> Self {
        Expander {
            chars,
            module_root: module_root.map(|p| p.to_path_buf()),
            rules: Vec::new(),
            visited: HashSet::new(),
        }
    }

    pub fn expand(&mut self, tokens: Vec<Token>) -> Result<Vec<Token>, GrammarError> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i].kind {
                TokenKind::MacroDef => {
                    i = self.register_rule(&tokens, i)?;
                }
                TokenKind::Observe => {
                    // Copy the import head verbatim (a macro must not rename
                    // the book being opened) and collect the book's macros.
                    if let Some((segments, end)) = import_head(&tokens, i) {
                        self.collect_import(&segments, tokens[i].span)?;
                        out.extend_from_slice(&tokens[i..=end]);
                        i = end + 1;
                    } else {
                        out.push(tokens[i].clone());
                        i += 1;
                    }
                }
                _ => {
                    let mut tok = tokens[i].clone();
                    tok.kind = self.rewrite(tok.kind);
                    out.push(tok);
                    i += 1;
                }
            }
        }
        Ok(out)
    }

    fn error(&self, msg: &str, span: Span) -> GrammarError {
        GrammarError::at(msg, span, self.chars)
    }

    /// Consume `或云 <literal> 蓋謂 <literal>`, returning the next index.
    fn register_rule(&mut self, tokens: &[Token], at: usize) -> Result<usize, GrammarError> {
        let head_span = tokens[at].span;
        let source = match tokens.get(at + 1) {
            Some(tok) => pattern(&tok.kind)
                .ok_or_else(|| self.error("或云後須言或名", tok.span))?,
            None => return Err(self.error("或云後須言或名", head_span)),
        };
        match tokens.get(at + 2) {
            Some(tok) if tok.kind == TokenKind::MacroMeans => {}
            Some(tok) => return Err(self.error("或云須蓋謂", tok.span)),
            None => return Err(self.error("或云須蓋謂", head_span)),
        }
        let replacement = match tokens.get(at + 3) {
            Some(tok) => pattern(&tok.kind)
                .ok_or_else(|| self.error("蓋謂後須言或名", tok.span))?,
            None => return Err(self.error("蓋謂後須言或名", head_span)),
        };
        self.rules.push(Rule {
            source,
            replacement,
        });
        Ok(at + 4)
    }

    /// Apply rules to a single token kind. Identifier-source rules rewrite
    /// identifiers only; string-source rules rewrite identifiers and whole
    /// string literals. String bodies are never searched.
    fn rewrite(&self, kind: TokenKind) -> TokenKind {
        match kind {
            TokenKind::Ident(mut name) => {
                for rule in &self.rules {
                    if rule.source.content() == name {
                        name = rule.replacement.content().to_string();
                    }
                }
                TokenKind::Ident(name)
            }
            TokenKind::Str(mut body) => {
                for rule in &self.rules {
                    if let Pattern::Str(src) = &rule.source {
                        if *src == body {
                            body = rule.replacement.content().to_string();
                        }
                    }
                }
                TokenKind::Str(body)
            }
            other => other,
        }
    }

    /// Load a `吾嘗觀 … 之書` target and fold its macro rules into ours so
    /// they apply to the rest of the current stream. Resolution failures
    /// are left for the evaluator to report.
    fn collect_import(&mut self, segments: &[String], span: Span) -> Result<(), GrammarError> {
        let Some(root) = self.module_root.clone() else {
            return Ok(());
        };
        let Some(path) = find_module_file(segments, &root) else {
            return Ok(());
        };
        let key = canonicalize_path(&path).display().to_string();
        if !self.visited.insert(key) {
            return Ok(());
        }
        let Ok(source) = std::fs::read_to_string(&path) else {
            return Ok(());
        };

        let book = segments.join("中");
        let chars: Vec<char> = source.chars().collect();
        let tokens = Lexer::new(&source)
            .tokenize()
            .map_err(|e| self.error(&format!("書「{}」有禍: {}", book, e.msg), span))?;

        let mut sub = Expander {
            chars: &chars,
            module_root: path.parent().map(|p| p.to_path_buf()),
            rules: std::mem::take(&mut self.rules),
            visited: std::mem::take(&mut self.visited),
        };
        let result = sub.expand(tokens);
        self.rules = std::mem::take(&mut sub.rules);
        self.visited = std::mem::take(&mut sub.visited);
        result.map_err(|e| self.error(&format!("書「{}」有禍: {}", book, e.msg), span))?;
        Ok(())
    }
}

fn pattern(kind: &TokenKind) -> Option<Pattern> {
    match kind {
        TokenKind::Ident(s) => Some(Pattern::Ident(s.clone())),
        TokenKind::Str(s) => Some(Pattern::Str(s.clone())),
        _ => None,
    }
}

/// Recognise `吾嘗觀 seg (中 seg)* 之書` starting at `at`; returns the
/// segment names and the index of the `之書` token.
fn import_head(tokens: &[Token], at: usize) -> Option<(Vec<String>, usize)> {
    let mut segments = Vec::new();
    let mut i = at + 1;
    loop {
        match tokens.get(i).map(|t| &t.kind) {
            Some(TokenKind::Str(s)) => segments.push(s.clone()),
            Some(TokenKind::Ident(s)) => segments.push(s.clone()),
            _ => return None,
        }
        i += 1;
        match tokens.get(i).map(|t| &t.kind) {
            Some(TokenKind::PathSep) => i += 1,
            Some(TokenKind::Book) => return Some((segments, i)),
            _ => return None,
        }
    }
}
