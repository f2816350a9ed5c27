use crate::source::Span;

pub use crate::lexer::TypeTag;

pub type Program = Vec<Stmt>;

/// An atomic value position: literal, identifier, or the implicit
/// last-value register `其`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Ident(String),
    It,
}

/// A subscript selector after `之`.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    /// `之 value` — 1-based position, or an object key when the value is a
    /// string.
    At(Value),
    /// `之其餘` — all but the first element.
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,  // 等於
    Neq, // 不等於
    Lt,  // 小於
    Gt,  // 大於
    Lte, // 不大於
    Gte, // 不小於
    Or,  // 中有陽乎
    And, // 中無陰乎
}

/// Expression form shared by `夫` statements and `若` conditions: an atom
/// with an optional postfix read, chained left-to-right without precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Value(Value),
    Subscript { target: Value, index: Index },
    Length(Value), // value 之長
    Not(Box<Expr>), // 變 …
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add, // 加
    Sub, // 減
    Mul, // 乘
    Div, // 除
}

/// Which operand the preposition marks: `於` makes the following operand
/// the right-hand side, `以` the left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prep {
    Yu, // 於
    Yi, // 以
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareStmt {
    pub count: usize,
    pub ty: TypeTag,
    pub inits: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamGroup {
    pub count: usize,
    pub ty: TypeTag,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestParam {
    pub ty: TypeTag,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub param_groups: Vec<ParamGroup>,
    pub rest_param: Option<RestParam>,
    pub body: Vec<Stmt>,
}

/// An `若` head: a full condition chain, or the degenerate forms reading
/// the truthiness of `其`.
#[derive(Debug, Clone, PartialEq)]
pub enum IfCond {
    Expr(Expr),
    ItTrue,  // 若其然者
    ItFalse, // 若其不然者
}

/// How many staged values `取 … 以施` consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeCount {
    N(usize),
    Rest, // 取其餘
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnKind {
    Value(Value), // 乃得 value
    It,           // 乃得矣
    Unit,         // 乃歸空無
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignRhs {
    Value { value: Value, index: Option<Index> },
    Delete, // 今不復存矣
}

/// A `豈 … 之禍歟` clause, or the catch-all when `tag` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub tag: Option<Value>,
    pub bind: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProp {
    pub key: String,
    pub ty: TypeTag,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSeg {
    Str(String),
    Ident(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Anonymous `吾有 N TYPE (曰 value)*` — values go to the stage.
    Declare(DeclareStmt),
    /// A declaration naming its slots via `名之曰`.
    Define {
        decl: DeclareStmt,
        names: Vec<String>,
    },
    /// Bare `名之曰 …` naming previously staged values.
    Naming { names: Vec<String> },
    Print,   // 書之
    Discard, // 噫
    /// `夫 …` — reference, subscript read, length, or logic probe.
    Expr(Expr),
    Math {
        op: MathOp,
        lhs: Value,
        prep: Prep,
        rhs: Value,
        modulo: bool, // 所餘幾何
    },
    FunctionDef(FunctionDef),
    /// `施 callee (於 arg)*`
    Call { callee: Value, args: Vec<Value> },
    /// `取 N 以施 callee` over the stage.
    CallStaged { count: TakeCount, callee: Value },
    /// `充 target (以 value)+` — in-place push.
    Fill { target: Value, values: Vec<Value> },
    /// `銜 target (以 value)+` — concatenation, producing a new value.
    Concat { target: Value, values: Vec<Value> },
    If {
        clauses: Vec<(IfCond, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
    },
    WhileTrue { body: Vec<Stmt> },       // 恆為是
    ForCount { count: Value, body: Vec<Stmt> }, // 為是 … 遍
    ForEach {
        list: Value,
        var: String,
        body: Vec<Stmt>,
    }, // 凡 … 中之 …
    Break,    // 乃止
    Continue, // 乃止是遍
    Return(ReturnKind),
    /// `昔之 target (之 index)? 者。今 …`
    Assign {
        target: String,
        index: Option<Index>,
        rhs: AssignRhs,
    },
    ObjectDef {
        count: usize,
        names: Vec<String>,
        props: Vec<ObjectProp>,
    },
    /// `嗚呼 tag 之禍 (曰 detail)?`
    Throw { tag: Value, detail: Option<Value> },
    Try {
        body: Vec<Stmt>,
        catches: Vec<Catch>,
    },
    Import {
        path: Vec<PathSeg>,
        names: Option<Vec<String>>,
    },
    Comment { text: String },
}
