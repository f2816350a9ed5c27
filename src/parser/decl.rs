use super::*;

impl Parser {
    /// `吾有 N …` — the token after the count discriminates:
    /// `術` → function, `物` → object, any other type → declaration.
    pub(super) fn parse_declaration(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 吾有 | 今有
        let count_span = self.current_span();
        let count = self.expect_count("吾有後須數")?;
        match self.kind() {
            Some(TokenKind::Art) => {
                if count != 1 {
                    return Err(self.error_at("術數須一", count_span));
                }
                self.bump();
                self.parse_function_def()
            }
            Some(TokenKind::Type(TypeTag::Object)) => {
                self.bump();
                self.parse_object_or_declare(count)
            }
            Some(TokenKind::Type(ty)) => {
                let ty = *ty;
                self.bump();
                self.parse_declare_tail(count, ty)
            }
            _ => Err(self.error("吾有後須類")),
        }
    }

    fn parse_declare_tail(&mut self, count: usize, ty: TypeTag) -> Result<StmtKind, GrammarError> {
        let mut inits = Vec::new();
        while self.is(&TokenKind::Say) {
            if inits.len() == count {
                return Err(self.error("初值過多"));
            }
            self.bump();
            inits.push(self.parse_value("曰後須值")?);
        }
        let decl = DeclareStmt { count, ty, inits };
        if self.is(&TokenKind::NameIt) {
            let name_span = self.current_span();
            let names = self.parse_name_list()?;
            if names.len() != count {
                return Err(self.error_at("名數不符", name_span));
            }
            Ok(StmtKind::Define { decl, names })
        } else {
            Ok(StmtKind::Declare(decl))
        }
    }

    /// `有 TYPE value` — the initialised short form.
    pub(super) fn parse_init_define(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 有
        let ty = self.expect_type("有後須類")?;
        let value = self.parse_value("有後須值")?;
        let decl = DeclareStmt {
            count: 1,
            ty,
            inits: vec![value],
        };
        if self.is(&TokenKind::NameIt) {
            let name_span = self.current_span();
            let names = self.parse_name_list()?;
            if names.len() != 1 {
                return Err(self.error_at("名數不符", name_span));
            }
            Ok(StmtKind::Define { decl, names })
        } else {
            Ok(StmtKind::Declare(decl))
        }
    }

    /// `名之曰「a」(曰「b」)*`
    pub(super) fn parse_name_list(&mut self) -> Result<Vec<String>, GrammarError> {
        self.bump(); // 名之曰
        let mut names = vec![self.expect_ident("名之曰後須名")?];
        while self.is(&TokenKind::Say) {
            self.bump();
            names.push(self.expect_ident("曰後須名")?);
        }
        Ok(names)
    }

    /// After `吾有 N 物`: an object literal when `其物如是` follows the
    /// names, otherwise a plain declaration of object type.
    fn parse_object_or_declare(&mut self, count: usize) -> Result<StmtKind, GrammarError> {
        let mut names = Vec::new();
        let mut name_span = self.current_span();
        if self.is(&TokenKind::NameIt) {
            name_span = self.current_span();
            names = self.parse_name_list()?;
            if names.len() != count {
                return Err(self.error_at("名數不符", name_span));
            }
        }
        if !self.is(&TokenKind::ObjBody) {
            let decl = DeclareStmt {
                count,
                ty: TypeTag::Object,
                inits: Vec::new(),
            };
            return Ok(if names.is_empty() {
                StmtKind::Declare(decl)
            } else {
                StmtKind::Define { decl, names }
            });
        }
        if names.is_empty() {
            return Err(self.error_at("物須名之曰", name_span));
        }
        self.bump(); // 其物如是

        let mut props = Vec::new();
        while self.eat(&TokenKind::ObjProp) {
            let key = self.expect_str("物之後須言")?;
            self.expect(&TokenKind::Zhe, "物之須者")?;
            let ty = self.expect_type("者後須類")?;
            self.expect(&TokenKind::Say, "類後須曰")?;
            let value = self.parse_value("曰後須值")?;
            props.push(ObjectProp { key, ty, value });
        }

        self.expect(&TokenKind::IsCalled, "物須是謂")?;
        let tail_span = self.current_span();
        let tail = self.expect_ident("是謂後須名")?;
        if tail != names[0] {
            return Err(self.error_at("物名不符", tail_span));
        }
        self.expect(&TokenKind::ObjEnd, "須之物也")?;
        Ok(StmtKind::ObjectDef {
            count,
            names,
            props,
        })
    }

    /// `昔之 target (之 index)? 者。今 …`
    pub(super) fn parse_assign(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 昔之
        let target = self.expect_ident("昔之後須名")?;
        let index = self.parse_opt_index()?;
        self.expect(&TokenKind::Zhe, "昔之須者")?;
        self.expect(&TokenKind::Now, "者後須今")?;

        let rhs = if self.eat(&TokenKind::Delete) {
            if self.eat(&TokenKind::AssignEndClose) {
                self.close_block = true;
            } else {
                self.eat(&TokenKind::AssignEnd);
            }
            AssignRhs::Delete
        } else {
            let value = self.parse_value("今後須值")?;
            let vindex = self.parse_opt_index()?;
            if self.eat(&TokenKind::AssignEndClose) {
                self.close_block = true;
            } else if !self.eat(&TokenKind::AssignEnd) {
                self.eat(&TokenKind::Ye);
            }
            AssignRhs::Value {
                value,
                index: vindex,
            }
        };
        Ok(StmtKind::Assign { target, index, rhs })
    }
}
