use crate::error::GrammarError;
use crate::hanzi;
use crate::source::Span;

/// The Wenyan type vocabulary: `數 列 言 爻 物 元`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Num,    // 數
    List,   // 列
    Str,    // 言
    Bool,   // 爻
    Object, // 物
    Unit,   // 元
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals and atoms
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Bool(bool),      // 陰 | 陽
    Type(TypeTag),
    // Declarations
    Decl,            // 吾有 | 今有
    DeclShort,       // 有
    Art,             // 術
    NameIt,          // 名之曰
    Say,             // 曰
    // Simple statements
    Print,           // 書之
    Discard,         // 噫
    Fu,              // 夫
    // Calls
    Apply,           // 施
    ApplyStaged,     // 以施
    Take,            // 取
    // Assignment
    Past,            // 昔之
    Now,             // 今
    AssignEnd,       // 是矣
    AssignEndClose,  // 是也
    Delete,          // 不復存矣
    // The implicit register and subscripts
    It,              // 其
    Rest,            // 其餘
    Of,              // 之
    Length,          // 之長
    // Returns
    Return,          // 乃得
    ReturnIt,        // 乃得矣
    ReturnUnit,      // 乃歸空無
    // Function definitions
    IsCalled,        // 是謂
    ArtEnd,          // 之術也
    NeedFirst,       // 必先得
    ArtBody,         // 是術曰
    ArtBodyFull,     // 乃行是術曰
    WantArt,         // 欲行是術
    // Block terminators
    BlockEnd,        // 云云
    Ye,              // 也
    // Loops
    ForEach,         // 凡
    In,              // 中之
    Loop,            // 恆為是
    ForCount,        // 為是
    Times,           // 遍
    Break,           // 乃止
    Continue,        // 乃止是遍
    // Conditionals
    If,              // 若
    Else,            // 若非
    Zhe,             // 者
    IfTrue,          // 若其然者
    IfFalse,         // 若其不然者
    ElseIf,          // 或若
    // Objects
    ObjBody,         // 其物如是
    ObjEnd,          // 之物也
    ObjProp,         // 物之
    // Comparison
    Eq,              // 等於
    Neq,             // 不等於
    Lte,             // 不大於
    Gte,             // 不小於
    Gt,              // 大於
    Lt,              // 小於
    // Arithmetic and logic
    Add,             // 加
    Sub,             // 減
    Mul,             // 乘
    Div,             // 除
    Modulo,          // 所餘幾何
    Or,              // 中有陽乎
    And,             // 中無陰乎
    Not,             // 變
    Yi,              // 以
    Yu,              // 於
    // Arrays
    Fill,            // 充
    Concat,          // 銜
    // Imports
    Observe,         // 吾嘗觀
    PathSep,         // 中
    Book,            // 之書
    Learn,           // 方悟
    Meaning,         // 之義
    // Throw and try
    Alas,            // 嗚呼
    Woe,             // 之禍
    TryStart,        // 姑妄行此
    CatchStart,      // 如事不諧
    CatchIf,         // 豈
    WoeIs,           // 之禍歟
    CatchAll,        // 不知何禍歟
    TryEnd,          // 乃作罷
    // Macros and comments
    MacroDef,        // 或云
    MacroMeans,      // 蓋謂
    Comment,         // 注曰 | 疏曰 | 批曰
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

/// The keyword vocabulary, longest first so a linear scan realises
/// longest-match (`若其不然者` before `若非` before `若`).
const KEYWORDS: &[&str] = &[
    // 5 characters
    "乃行是術曰", "若其不然者", "不知何禍歟",
    // 4 characters
    "欲行是術", "若其然者", "其物如是", "姑妄行此", "如事不諧", "所餘幾何",
    "乃止是遍", "中有陽乎", "中無陰乎", "不復存矣", "乃歸空無",
    // 3 characters
    "名之曰", "是術曰", "之術也", "必先得", "恆為是", "吾嘗觀", "之禍歟",
    "乃作罷", "之物也", "不等於", "不大於", "不小於", "乃得矣",
    // 2 characters
    "吾有", "今有", "書之", "以施", "昔之", "是矣", "是也", "乃得", "是謂",
    "云云", "中之", "為是", "乃止", "若非", "或若", "物之", "等於", "大於",
    "小於", "之長", "其餘", "之書", "方悟", "之義", "嗚呼", "之禍", "或云",
    "蓋謂", "注曰", "疏曰", "批曰",
    // 1 character
    "有", "數", "列", "言", "術", "爻", "物", "元", "施", "曰", "噫", "取",
    "今", "其", "也", "凡", "遍", "若", "者", "夫", "加", "減", "乘", "除",
    "變", "以", "於", "之", "充", "銜", "陰", "陽", "中", "豈",
];

fn keyword_kind(word: &str) -> TokenKind {
    match word {
        "吾有" | "今有" => TokenKind::Decl,
        "有" => TokenKind::DeclShort,
        "數" => TokenKind::Type(TypeTag::Num),
        "列" => TokenKind::Type(TypeTag::List),
        "言" => TokenKind::Type(TypeTag::Str),
        "爻" => TokenKind::Type(TypeTag::Bool),
        "物" => TokenKind::Type(TypeTag::Object),
        "元" => TokenKind::Type(TypeTag::Unit),
        "術" => TokenKind::Art,
        "名之曰" => TokenKind::NameIt,
        "曰" => TokenKind::Say,
        "書之" => TokenKind::Print,
        "噫" => TokenKind::Discard,
        "夫" => TokenKind::Fu,
        "施" => TokenKind::Apply,
        "以施" => TokenKind::ApplyStaged,
        "取" => TokenKind::Take,
        "昔之" => TokenKind::Past,
        "今" => TokenKind::Now,
        "是矣" => TokenKind::AssignEnd,
        "是也" => TokenKind::AssignEndClose,
        "不復存矣" => TokenKind::Delete,
        "其" => TokenKind::It,
        "其餘" => TokenKind::Rest,
        "之" => TokenKind::Of,
        "之長" => TokenKind::Length,
        "乃得" => TokenKind::Return,
        "乃得矣" => TokenKind::ReturnIt,
        "乃歸空無" => TokenKind::ReturnUnit,
        "是謂" => TokenKind::IsCalled,
        "之術也" => TokenKind::ArtEnd,
        "必先得" => TokenKind::NeedFirst,
        "是術曰" => TokenKind::ArtBody,
        "乃行是術曰" => TokenKind::ArtBodyFull,
        "欲行是術" => TokenKind::WantArt,
        "云云" => TokenKind::BlockEnd,
        "也" => TokenKind::Ye,
        "凡" => TokenKind::ForEach,
        "中之" => TokenKind::In,
        "恆為是" => TokenKind::Loop,
        "為是" => TokenKind::ForCount,
        "遍" => TokenKind::Times,
        "乃止" => TokenKind::Break,
        "乃止是遍" => TokenKind::Continue,
        "若" => TokenKind::If,
        "若非" => TokenKind::Else,
        "者" => TokenKind::Zhe,
        "若其然者" => TokenKind::IfTrue,
        "若其不然者" => TokenKind::IfFalse,
        "或若" => TokenKind::ElseIf,
        "其物如是" => TokenKind::ObjBody,
        "之物也" => TokenKind::ObjEnd,
        "物之" => TokenKind::ObjProp,
        "等於" => TokenKind::Eq,
        "不等於" => TokenKind::Neq,
        "不大於" => TokenKind::Lte,
        "不小於" => TokenKind::Gte,
        "大於" => TokenKind::Gt,
        "小於" => TokenKind::Lt,
        "加" => TokenKind::Add,
        "減" => TokenKind::Sub,
        "乘" => TokenKind::Mul,
        "除" => TokenKind::Div,
        "所餘幾何" => TokenKind::Modulo,
        "中有陽乎" => TokenKind::Or,
        "中無陰乎" => TokenKind::And,
        "變" => TokenKind::Not,
        "以" => TokenKind::Yi,
        "於" => TokenKind::Yu,
        "充" => TokenKind::Fill,
        "銜" => TokenKind::Concat,
        "陰" => TokenKind::Bool(false),
        "陽" => TokenKind::Bool(true),
        "吾嘗觀" => TokenKind::Observe,
        "中" => TokenKind::PathSep,
        "之書" => TokenKind::Book,
        "方悟" => TokenKind::Learn,
        "之義" => TokenKind::Meaning,
        "嗚呼" => TokenKind::Alas,
        "之禍" => TokenKind::Woe,
        "姑妄行此" => TokenKind::TryStart,
        "如事不諧" => TokenKind::CatchStart,
        "豈" => TokenKind::CatchIf,
        "之禍歟" => TokenKind::WoeIs,
        "不知何禍歟" => TokenKind::CatchAll,
        "乃作罷" => TokenKind::TryEnd,
        "或云" => TokenKind::MacroDef,
        "蓋謂" => TokenKind::MacroMeans,
        "注曰" | "疏曰" | "批曰" => TokenKind::Comment,
        _ => unreachable!("keyword table and kind map out of sync: {}", word),
    }
}

/// Characters the lexer skips: ASCII whitespace, the ideographic space,
/// clause punctuation and the sentence terminator `矣`.
fn is_skip(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '　' | '。' | '、' | '，' | '矣')
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, msg: impl Into<String>, span: Span) -> GrammarError {
        GrammarError::at(msg, span, &self.chars)
    }

    fn starts_with(&self, pat: &str, at: usize) -> bool {
        let mut idx = at;
        for pc in pat.chars() {
            if self.chars.get(idx) != Some(&pc) {
                return false;
            }
            idx += 1;
        }
        true
    }

    fn slice(&self, span: Span) -> String {
        self.chars[span.start..span.end].iter().collect()
    }

    fn token(&self, kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            lexeme: self.slice(span),
            span,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, GrammarError> {
        let mut tokens = Vec::new();

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];

            if is_skip(ch) {
                self.pos += 1;
                continue;
            }

            // String literal: 「「…」」 or 『…』
            if self.starts_with("「「", self.pos) || ch == '『' {
                tokens.push(self.scan_string()?);
                continue;
            }

            // Identifier: 「…」
            if ch == '「' {
                tokens.push(self.scan_identifier()?);
                continue;
            }

            // Keyword, longest match first
            if let Some(word) = self.match_keyword() {
                let span = Span::new(self.pos, self.pos + word.chars().count());
                self.pos = span.end;
                tokens.push(self.token(keyword_kind(word), span));
                continue;
            }

            // Numeral run
            if hanzi::is_numeral(ch) {
                tokens.push(self.scan_number()?);
                continue;
            }

            let span = Span::new(self.pos, self.pos + 1);
            return Err(self.error("不識之符", span));
        }

        Ok(tokens)
    }

    fn match_keyword(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .copied()
            .find(|word| self.starts_with(word, self.pos))
    }

    fn scan_string(&mut self) -> Result<Token, GrammarError> {
        let start = self.pos;
        let double = self.starts_with("「「", start);
        let (open_len, close): (usize, &str) = if double { (2, "」」") } else { (1, "』") };
        let close_len = close.chars().count();

        let mut idx = start + open_len;
        while idx < self.chars.len() {
            if self.starts_with(close, idx) {
                let span = Span::new(start, idx + close_len);
                self.pos = span.end;
                let body: String = self.chars[start + open_len..idx].iter().collect();
                return Ok(self.token(TokenKind::Str(body), span));
            }
            idx += 1;
        }
        Err(self.error("言未尽", Span::new(start, self.chars.len())))
    }

    fn scan_identifier(&mut self) -> Result<Token, GrammarError> {
        let start = self.pos;
        let mut idx = start + 1;
        while idx < self.chars.len() {
            if self.chars[idx] == '」' {
                if idx == start + 1 {
                    return Err(self.error("空名", Span::new(start, idx + 1)));
                }
                let span = Span::new(start, idx + 1);
                self.pos = span.end;
                let name: String = self.chars[start + 1..idx].iter().collect();
                return Ok(self.token(TokenKind::Ident(name), span));
            }
            idx += 1;
        }
        Err(self.error("名未尽", Span::new(start, self.chars.len())))
    }

    fn scan_number(&mut self) -> Result<Token, GrammarError> {
        let start = self.pos;
        let mut idx = start;
        while idx < self.chars.len() && hanzi::is_numeral(self.chars[idx]) {
            idx += 1;
        }
        let span = Span::new(start, idx);
        let run: String = self.chars[start..idx].iter().collect();
        let kind = match hanzi::decode(&run) {
            Ok(hanzi::Decoded::Int(n)) => TokenKind::Int(n),
            Ok(hanzi::Decoded::Float(f)) => TokenKind::Float(f),
            Err(_) => return Err(self.error("非法數", span)),
        };
        self.pos = idx;
        Ok(self.token(kind, span))
    }
}
