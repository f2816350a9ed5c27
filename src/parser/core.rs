use super::*;

impl Parser {
    pub fn new(tokens: Vec<Token>, chars: &[char]) -> Self {
        Parser {
            tokens,
            pos: 0,
            chars: chars.to_vec(),
            close_block: false,
        }
    }

    pub(super) fn error(&self, msg: impl Into<String>) -> GrammarError {
        GrammarError::at(msg, self.current_span(), &self.chars)
    }

    pub(super) fn error_at(&self, msg: impl Into<String>, span: Span) -> GrammarError {
        GrammarError::at(msg, span, &self.chars)
    }

    /// The current token's span, or an empty span at end of input.
    pub(super) fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(tok) => tok.span,
            None => {
                let end = self.chars.len();
                let start = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                Span::new(start.min(end), end)
            }
        }
    }

    pub(super) fn kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    pub(super) fn is(&self, kind: &TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.is(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenKind, msg: &str) -> Result<Span, GrammarError> {
        if self.is(kind) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.error(msg))
        }
    }

    pub(super) fn expect_ident(&mut self, msg: &str) -> Result<String, GrammarError> {
        match self.kind() {
            Some(TokenKind::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error(msg)),
        }
    }

    pub(super) fn expect_str(&mut self, msg: &str) -> Result<String, GrammarError> {
        match self.kind() {
            Some(TokenKind::Str(body)) => {
                let body = body.clone();
                self.pos += 1;
                Ok(body)
            }
            _ => Err(self.error(msg)),
        }
    }

    pub(super) fn expect_type(&mut self, msg: &str) -> Result<TypeTag, GrammarError> {
        match self.kind() {
            Some(TokenKind::Type(ty)) => {
                let ty = *ty;
                self.pos += 1;
                Ok(ty)
            }
            _ => Err(self.error(msg)),
        }
    }

    /// A declared count (`吾有 N …`, parameter groups): a positive integer.
    pub(super) fn expect_count(&mut self, msg: &str) -> Result<usize, GrammarError> {
        match self.kind() {
            Some(TokenKind::Int(n)) => {
                if *n < 1 {
                    return Err(self.error("數須大於零"));
                }
                let n = *n as usize;
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.error(msg)),
        }
    }

    pub(super) fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    pub fn parse(&mut self) -> Result<Program, GrammarError> {
        let mut stmts = Vec::new();
        while !self.is_eof() {
            stmts.push(self.parse_statement()?);
            if self.close_block {
                // `是也` at top level has nothing to close.
                self.close_block = false;
                self.eat(&TokenKind::BlockEnd);
            }
        }
        Ok(stmts)
    }

    pub(super) fn parse_statement(&mut self) -> Result<Stmt, GrammarError> {
        let start = self.current_span().start;
        let kind = self.parse_statement_kind()?;
        Ok(Stmt {
            kind,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn parse_statement_kind(&mut self) -> Result<StmtKind, GrammarError> {
        match self.kind() {
            Some(TokenKind::Decl) => self.parse_declaration(),
            Some(TokenKind::DeclShort) => self.parse_init_define(),
            Some(TokenKind::NameIt) => {
                let names = self.parse_name_list()?;
                Ok(StmtKind::Naming { names })
            }
            Some(TokenKind::Print) => {
                self.bump();
                Ok(StmtKind::Print)
            }
            Some(TokenKind::Discard) => {
                self.bump();
                Ok(StmtKind::Discard)
            }
            Some(TokenKind::Fu) => self.parse_expr_statement(),
            Some(TokenKind::Not) => self.parse_not_statement(),
            Some(
                TokenKind::Add | TokenKind::Sub | TokenKind::Mul | TokenKind::Div,
            ) => self.parse_math(),
            Some(TokenKind::Fill) => self.parse_fill(),
            Some(TokenKind::Concat) => self.parse_concat(),
            Some(TokenKind::Apply) => self.parse_call(),
            Some(TokenKind::Take) => self.parse_staged_call(),
            Some(TokenKind::ApplyStaged) => Err(self.error("以施需先取")),
            Some(TokenKind::Past) => self.parse_assign(),
            Some(TokenKind::If | TokenKind::IfTrue | TokenKind::IfFalse) => self.parse_if(),
            Some(TokenKind::Loop) => self.parse_while(),
            Some(TokenKind::ForCount) => self.parse_for_count(),
            Some(TokenKind::ForEach) => self.parse_for_each(),
            Some(TokenKind::Break) => {
                self.bump();
                Ok(StmtKind::Break)
            }
            Some(TokenKind::Continue) => {
                self.bump();
                Ok(StmtKind::Continue)
            }
            Some(TokenKind::Return) => {
                self.bump();
                let value = self.parse_value("乃得後須值")?;
                Ok(StmtKind::Return(ReturnKind::Value(value)))
            }
            Some(TokenKind::ReturnIt) => {
                self.bump();
                Ok(StmtKind::Return(ReturnKind::It))
            }
            Some(TokenKind::ReturnUnit) => {
                self.bump();
                Ok(StmtKind::Return(ReturnKind::Unit))
            }
            Some(TokenKind::Alas) => self.parse_throw(),
            Some(TokenKind::TryStart) => self.parse_try(),
            Some(TokenKind::Observe) => self.parse_import(),
            Some(TokenKind::Comment) => {
                self.bump();
                let text = self.expect_str("注後須言")?;
                Ok(StmtKind::Comment { text })
            }
            Some(_) => Err(self.error("不識之語")),
            None => Err(self.error("文盡而意未已")),
        }
    }
}
