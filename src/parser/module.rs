use super::*;

impl Parser {
    /// `吾嘗觀 seg (中 seg)* 之書 (方悟「a」「b」… 之義)?`
    pub(super) fn parse_import(&mut self) -> Result<StmtKind, GrammarError> {
        self.bump(); // 吾嘗觀
        let mut path = Vec::new();
        loop {
            match self.kind() {
                Some(TokenKind::Str(s)) => {
                    path.push(PathSeg::Str(s.clone()));
                    self.bump();
                }
                Some(TokenKind::Ident(s)) => {
                    path.push(PathSeg::Ident(s.clone()));
                    self.bump();
                }
                _ => return Err(self.error("吾嘗觀後須書名")),
            }
            if !self.eat(&TokenKind::PathSep) {
                break;
            }
        }
        self.expect(&TokenKind::Book, "須之書")?;

        let names = if self.eat(&TokenKind::Learn) {
            let mut list = Vec::new();
            while let Some(TokenKind::Ident(name)) = self.kind() {
                list.push(name.clone());
                self.bump();
            }
            if list.is_empty() {
                return Err(self.error("方悟後須名"));
            }
            self.expect(&TokenKind::Meaning, "須之義")?;
            Some(list)
        } else {
            None
        };

        Ok(StmtKind::Import { path, names })
    }
}
