use crate::ast::*;
use crate::error::GrammarError;
use crate::lexer::{Token, TokenKind};
use crate::source::Span;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    chars: Vec<char>,
    /// Set when an assignment consumed `是也`: the innermost open block
    /// closes without its own terminator.
    close_block: bool,
}

mod blocks;
mod core;
mod decl;
mod expr;
mod functions;
mod module;
