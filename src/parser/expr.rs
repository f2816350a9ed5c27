use super::*;

impl Parser {
    pub(super) fn parse_value(&mut self, msg: &str) -> Result<Value, GrammarError> {
        let value = match self.kind() {
            Some(TokenKind::Int(n)) => Value::Int(*n),
            Some(TokenKind::Float(f)) => Value::Float(*f),
            Some(TokenKind::Str(s)) => Value::Str(s.clone()),
            Some(TokenKind::Bool(b)) => Value::Bool(*b),
            Some(TokenKind::Ident(s)) => Value::Ident(s.clone()),
            Some(TokenKind::It) => Value::It,
            _ => return Err(self.error(msg)),
        };
        self.bump();
        Ok(value)
    }

    /// `之 …` after a value: positional/keyed subscript or `之其餘`.
    pub(super) fn parse_opt_index(&mut self) -> Result<Option<Index>, GrammarError> {
        if !self.eat(&TokenKind::Of) {
            return Ok(None);
        }
        if self.eat(&TokenKind::Rest) {
            return Ok(Some(Index::Rest));
        }
        Ok(Some(Index::At(self.parse_value("之後須值")?)))
    }

    fn chain_op(&self) -> Option<BinOp> {
        match self.kind() {
            Some(TokenKind::Eq) => Some(BinOp::Eq),
            Some(TokenKind::Neq) => Some(BinOp::Neq),
            Some(TokenKind::Lt) => Some(BinOp::Lt),
            Some(TokenKind::Gt) => Some(BinOp::Gt),
            Some(TokenKind::Lte) => Some(BinOp::Lte),
            Some(TokenKind::Gte) => Some(BinOp::Gte),
            Some(TokenKind::Or) => Some(BinOp::Or),
            Some(TokenKind::And) => Some(BinOp::And),
            _ => None,
        }
    }

    /// An atom: optional `變`, a value, an optional postfix read.
    pub(super) fn parse_atom(&mut self) -> Result<Expr, GrammarError> {
        if self.eat(&TokenKind::Not) {
            return Ok(Expr::Not(Box::new(self.parse_atom()?)));
        }
        let value = self.parse_value("當有值")?;
        if self.eat(&TokenKind::Length) {
            return Ok(Expr::Length(value));
        }
        if let Some(index) = self.parse_opt_index()? {
            return Ok(Expr::Subscript {
                target: value,
                index,
            });
        }
        Ok(Expr::Value(value))
    }

    /// Left-associative chain of atoms; the operators share one precedence
    /// level and apply left to right.
    pub(super) fn parse_expr_chain(&mut self) -> Result<Expr, GrammarError> {
        let mut lhs = self.parse_atom()?;
        while let Some(op) = self.chain_op() {
            self.bump();
            let rhs = self.parse_atom()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    pub(super) fn parse_expr_statement(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 夫
        Ok(StmtKind::Expr(self.parse_expr_chain()?))
    }

    pub(super) fn parse_not_statement(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 變
        Ok(StmtKind::Expr(Expr::Not(Box::new(self.parse_atom()?))))
    }

    /// `(加|減|乘|除) value (於|以) value (所餘幾何)?`
    pub(super) fn parse_math(&mut self) -> Result<StmtKind, GrammarError> {
        let op = match self.kind() {
            Some(TokenKind::Add) => MathOp::Add,
            Some(TokenKind::Sub) => MathOp::Sub,
            Some(TokenKind::Mul) => MathOp::Mul,
            _ => MathOp::Div,
        };
        self.bump();
        let lhs = self.parse_value("算後須值")?;
        let prep = if self.eat(&TokenKind::Yu) {
            Prep::Yu
        } else if self.eat(&TokenKind::Yi) {
            Prep::Yi
        } else {
            return Err(self.error("須以或於"));
        };
        let rhs = self.parse_value("須值")?;
        let modulo = if self.is(&TokenKind::Modulo) {
            if op != MathOp::Div {
                return Err(self.error("所餘幾何須隨除"));
            }
            self.bump();
            true
        } else {
            false
        };
        Ok(StmtKind::Math {
            op,
            lhs,
            prep,
            rhs,
            modulo,
        })
    }

    pub(super) fn parse_fill(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 充
        let target = self.parse_value("充後須名")?;
        let values = self.parse_yi_values("充須以值")?;
        Ok(StmtKind::Fill { target, values })
    }

    pub(super) fn parse_concat(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 銜
        let target = self.parse_value("銜後須名")?;
        let values = self.parse_yi_values("銜須以值")?;
        Ok(StmtKind::Concat { target, values })
    }

    /// One or more `以 value` groups.
    fn parse_yi_values(&mut self, msg: &str) -> Result<Vec<Value>, GrammarError> {
        let mut values = Vec::new();
        while self.eat(&TokenKind::Yi) {
            values.push(self.parse_value("以後須值")?);
        }
        if values.is_empty() {
            return Err(self.error(msg));
        }
        Ok(values)
    }
}
