use super::*;

impl Parser {
    /// After `吾有一術`:
    /// `名之曰「f」。欲行是術。(必先得 …)? (乃行是術曰|是術曰)。 body 是謂「f」之術也。`
    pub(super) fn parse_function_def(&mut self) -> Result<StmtKind, GrammarError> {
        if !self.is(&TokenKind::NameIt) {
            return Err(self.error("術須名之曰"));
        }
        let name_span = self.current_span();
        let mut names = self.parse_name_list()?;
        if names.len() != 1 {
            return Err(self.error_at("名數不符", name_span));
        }
        let name = names.pop().unwrap();

        self.expect(&TokenKind::WantArt, "術須欲行是術")?;

        let mut param_groups = Vec::new();
        let mut rest_param = None;
        if self.eat(&TokenKind::NeedFirst) {
            loop {
                match self.kind() {
                    Some(TokenKind::Int(_)) => {
                        param_groups.push(self.parse_param_group()?);
                    }
                    Some(TokenKind::Rest) => {
                        self.bump();
                        let ty = self.expect_type("參須類")?;
                        self.expect(&TokenKind::Say, "其餘參數須一名")?;
                        let rest_name = self.expect_ident("曰後須名")?;
                        if self.is(&TokenKind::Say) {
                            return Err(self.error("其餘參數須一名"));
                        }
                        if matches!(
                            self.kind(),
                            Some(TokenKind::Int(_)) | Some(TokenKind::Rest)
                        ) {
                            return Err(self.error("其餘參數須居末"));
                        }
                        rest_param = Some(RestParam {
                            ty,
                            name: rest_name,
                        });
                        break;
                    }
                    _ => break,
                }
            }
        }

        if !self.eat(&TokenKind::ArtBodyFull) && !self.eat(&TokenKind::ArtBody) {
            return Err(self.error("術須乃行是術曰"));
        }

        let body = self.parse_body_until(&[TokenKind::IsCalled], "術無是謂")?;
        self.bump(); // 是謂
        let tail_span = self.current_span();
        let tail = self.expect_ident("是謂後須名")?;
        if tail != name {
            return Err(self.error_at("術名不符", tail_span));
        }
        self.expect(&TokenKind::ArtEnd, "須之術也")?;

        Ok(StmtKind::FunctionDef(FunctionDef {
            name,
            param_groups,
            rest_param,
            body,
        }))
    }

    /// `N TYPE (曰「name」)×N`
    fn parse_param_group(&mut self) -> Result<ParamGroup, GrammarError> {
        let count = self.expect_count("參須數")?;
        let ty = self.expect_type("參須類")?;
        let mut names = Vec::new();
        while self.is(&TokenKind::Say) {
            if names.len() == count {
                return Err(self.error("參名過多"));
            }
            self.bump();
            names.push(self.expect_ident("曰後須名")?);
        }
        if names.len() != count {
            return Err(self.error("參名不足"));
        }
        Ok(ParamGroup { count, ty, names })
    }

    /// `施 callee (於 arg)*`
    pub(super) fn parse_call(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 施
        let callee = self.parse_value("施後須術")?;
        let mut args = Vec::new();
        while self.eat(&TokenKind::Yu) {
            args.push(self.parse_value("於後須值")?);
        }
        Ok(StmtKind::Call { callee, args })
    }

    /// `取 (N | 其餘) 以施 callee`
    pub(super) fn parse_staged_call(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 取
        let count = match self.kind() {
            Some(TokenKind::Int(_)) => TakeCount::N(self.expect_count("取後須數")?),
            Some(TokenKind::Rest) => {
                self.bump();
                TakeCount::Rest
            }
            _ => return Err(self.error("取後須數")),
        };
        self.expect(&TokenKind::ApplyStaged, "取後須以施")?;
        let callee = self.parse_value("施後須術")?;
        Ok(StmtKind::CallStaged { count, callee })
    }
}
