use super::*;

impl Parser {
    /// Statements until one of `stops` (left unconsumed). Used for bodies
    /// whose terminator belongs to the enclosing construct (function, try,
    /// catch). A stray `是也` closure here has nothing to close and is
    /// tolerated, swallowing one dangling `云云`.
    pub(super) fn parse_body_until(
        &mut self,
        stops: &[TokenKind],
        eof_msg: &str,
    ) -> Result<Vec<Stmt>, GrammarError> {
        let mut stmts = Vec::new();
        loop {
            if self.is_eof() {
                return Err(self.error(eof_msg));
            }
            if stops.iter().any(|stop| self.is(stop)) {
                return Ok(stmts);
            }
            stmts.push(self.parse_statement()?);
            if self.close_block {
                self.close_block = false;
                self.eat(&TokenKind::BlockEnd);
            }
        }
    }

    /// A loop body: terminated by `云云`/`也` (consumed), by a `是也`
    /// closure, or — without consuming the token — by a return form.
    pub(super) fn parse_loop_body(&mut self) -> Result<Vec<Stmt>, GrammarError> {
        let mut stmts = Vec::new();
        loop {
            match self.kind() {
                None => return Err(self.error("循環無云云")),
                Some(TokenKind::BlockEnd | TokenKind::Ye) => {
                    self.bump();
                    return Ok(stmts);
                }
                Some(
                    TokenKind::Return | TokenKind::ReturnIt | TokenKind::ReturnUnit,
                ) => return Ok(stmts),
                _ => {
                    stmts.push(self.parse_statement()?);
                    if self.close_block {
                        self.close_block = false;
                        self.eat(&TokenKind::BlockEnd);
                        return Ok(stmts);
                    }
                }
            }
        }
    }

    /// `若 expr 者 | 若其然者 | 若其不然者`, clause bodies, `或若` clauses,
    /// optional `若非`, terminated by `云云`/`也` or a `是也` closure.
    pub(super) fn parse_if(&mut self) -> Result<StmtKind, GrammarError> {
        let first = match self.kind() {
            Some(TokenKind::IfTrue) => {
                self.bump();
                IfCond::ItTrue
            }
            Some(TokenKind::IfFalse) => {
                self.bump();
                IfCond::ItFalse
            }
            _ => {
                self.bump(); // 若
                let expr = self.parse_expr_chain()?;
                self.expect(&TokenKind::Zhe, "若後須者")?;
                IfCond::Expr(expr)
            }
        };

        let mut clauses: Vec<(IfCond, Vec<Stmt>)> = Vec::new();
        let mut cur_cond = Some(first);
        let mut cur_body: Vec<Stmt> = Vec::new();
        let mut else_body: Option<Vec<Stmt>> = None;

        loop {
            match self.kind() {
                None => return Err(self.error("若無云云")),
                Some(TokenKind::BlockEnd | TokenKind::Ye) => {
                    self.bump();
                    break;
                }
                Some(TokenKind::ElseIf) => {
                    let Some(cond) = cur_cond.take() else {
                        return Err(self.error("或若不得隨若非後"));
                    };
                    self.bump();
                    clauses.push((cond, std::mem::take(&mut cur_body)));
                    let expr = self.parse_expr_chain()?;
                    self.expect(&TokenKind::Zhe, "或若後須者")?;
                    cur_cond = Some(IfCond::Expr(expr));
                }
                Some(TokenKind::Else) => {
                    let Some(cond) = cur_cond.take() else {
                        return Err(self.error("若非重複"));
                    };
                    self.bump();
                    clauses.push((cond, std::mem::take(&mut cur_body)));
                }
                _ => {
                    cur_body.push(self.parse_statement()?);
                    if self.close_block {
                        self.close_block = false;
                        // `是也` ends the clause; the if itself goes on only
                        // when 若非/或若 follows directly.
                        match self.kind() {
                            Some(TokenKind::Else | TokenKind::ElseIf) => {}
                            Some(TokenKind::BlockEnd) => {
                                self.bump();
                                break;
                            }
                            _ => break,
                        }
                    }
                }
            }
        }

        match cur_cond {
            Some(cond) => clauses.push((cond, cur_body)),
            None => else_body = Some(cur_body),
        }
        Ok(StmtKind::If { clauses, else_body })
    }

    pub(super) fn parse_while(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 恆為是
        Ok(StmtKind::WhileTrue {
            body: self.parse_loop_body()?,
        })
    }

    /// `為是 value 遍。 body 云云`
    pub(super) fn parse_for_count(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 為是
        let count = self.parse_value("為是後須數")?;
        self.expect(&TokenKind::Times, "為是須遍")?;
        Ok(StmtKind::ForCount {
            count,
            body: self.parse_loop_body()?,
        })
    }

    /// `凡 list 中之 elem。 body 云云`
    pub(super) fn parse_for_each(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 凡
        let list = self.parse_value("凡後須列")?;
        self.expect(&TokenKind::In, "凡須中之")?;
        let var = self.expect_ident("中之後須名")?;
        Ok(StmtKind::ForEach {
            list,
            var,
            body: self.parse_loop_body()?,
        })
    }

    /// `嗚呼 tag 之禍 (曰 detail)?`
    pub(super) fn parse_throw(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 嗚呼
        let tag = self.parse_value("嗚呼後須值")?;
        self.expect(&TokenKind::Woe, "須之禍")?;
        let detail = if self.eat(&TokenKind::Say) {
            Some(self.parse_value("曰後須值")?)
        } else {
            None
        };
        Ok(StmtKind::Throw { tag, detail })
    }

    /// `姑妄行此。 body 如事不諧。 catches 乃作罷。`
    pub(super) fn parse_try(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 姑妄行此
        let body = self.parse_body_until(&[TokenKind::CatchStart], "姑妄行此須如事不諧")?;
        self.bump(); // 如事不諧

        let catch_stops = [
            TokenKind::CatchIf,
            TokenKind::CatchAll,
            TokenKind::TryEnd,
        ];
        let mut catches: Vec<Catch> = Vec::new();
        loop {
            match self.kind() {
                Some(TokenKind::CatchIf) => {
                    if catches.iter().any(|c| c.tag.is_none()) {
                        return Err(self.error("不知何禍歟須居末"));
                    }
                    self.bump();
                    let tag = self.parse_value("豈後須值")?;
                    self.expect(&TokenKind::WoeIs, "須之禍歟")?;
                    let bind = self.parse_catch_bind()?;
                    let cbody = self.parse_body_until(&catch_stops, "如事不諧須乃作罷")?;
                    catches.push(Catch {
                        tag: Some(tag),
                        bind,
                        body: cbody,
                    });
                }
                Some(TokenKind::CatchAll) => {
                    if catches.iter().any(|c| c.tag.is_none()) {
                        return Err(self.error("不知何禍歟須居末"));
                    }
                    self.bump();
                    let bind = self.parse_catch_bind()?;
                    let cbody = self.parse_body_until(&catch_stops, "如事不諧須乃作罷")?;
                    catches.push(Catch {
                        tag: None,
                        bind,
                        body: cbody,
                    });
                }
                Some(TokenKind::TryEnd) => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error("如事不諧須乃作罷")),
            }
        }
        Ok(StmtKind::Try { body, catches })
    }

    fn parse_catch_bind(&mut self) -> Result<Option<String>, GrammarError> {
        if !self.is(&TokenKind::NameIt) {
            return Ok(None);
        }
        let name_span = self.current_span();
        let mut names = self.parse_name_list()?;
        if names.len() != 1 {
            return Err(self.error_at("名數不符", name_span));
        }
        Ok(Some(names.pop().unwrap()))
    }
}
