/// Spec tests for the Wenyan parser.
///
/// Statement shapes are checked against the typed AST; error cases assert
/// the stable 文法之禍 message and, where it matters, the offending span.
use wenyan::ast::*;
use wenyan::error::GrammarError;
use wenyan::source::parse_source;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse(src: &str) -> Program {
    parse_source(src, None).expect("parse failed")
}

fn parse_err(src: &str) -> GrammarError {
    parse_source(src, None).expect_err("expected a parse error")
}

fn kinds(src: &str) -> Vec<StmtKind> {
    parse(src).into_iter().map(|s| s.kind).collect()
}

fn span_text(src: &str, err: &GrammarError) -> String {
    src.chars()
        .skip(err.span.start)
        .take(err.span.end - err.span.start)
        .collect()
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[test]
fn define_with_init() {
    assert_eq!(
        kinds("吾有一數。曰三。名之曰「甲」。"),
        vec![StmtKind::Define {
            decl: DeclareStmt {
                count: 1,
                ty: TypeTag::Num,
                inits: vec![Value::Int(3)],
            },
            names: vec!["甲".to_string()],
        }]
    );
}

#[test]
fn anonymous_declare_keeps_missing_inits() {
    assert_eq!(
        kinds("吾有二數。曰一。"),
        vec![StmtKind::Declare(DeclareStmt {
            count: 2,
            ty: TypeTag::Num,
            inits: vec![Value::Int(1)],
        })]
    );
}

#[test]
fn init_define_short_form() {
    assert_eq!(
        kinds("有數一。名之曰「甲」。"),
        vec![StmtKind::Define {
            decl: DeclareStmt {
                count: 1,
                ty: TypeTag::Num,
                inits: vec![Value::Int(1)],
            },
            names: vec!["甲".to_string()],
        }]
    );
}

#[test]
fn too_many_inits() {
    assert_eq!(parse_err("吾有一數。曰一。曰二。").msg, "初值過多");
}

#[test]
fn name_count_mismatch() {
    assert_eq!(
        parse_err("吾有二數。曰一。曰二。名之曰「甲」。").msg,
        "名數不符"
    );
}

#[test]
fn zero_count_rejected() {
    assert_eq!(parse_err("吾有零數。").msg, "數須大於零");
}

#[test]
fn bare_naming_after_math() {
    assert_eq!(
        kinds("加一以二。名之曰「甲」。"),
        vec![
            StmtKind::Math {
                op: MathOp::Add,
                lhs: Value::Int(1),
                prep: Prep::Yi,
                rhs: Value::Int(2),
                modulo: false,
            },
            StmtKind::Naming {
                names: vec!["甲".to_string()],
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

#[test]
fn modulo_form() {
    assert_eq!(
        kinds("除十於三所餘幾何。"),
        vec![StmtKind::Math {
            op: MathOp::Div,
            lhs: Value::Int(10),
            prep: Prep::Yu,
            rhs: Value::Int(3),
            modulo: true,
        }]
    );
}

#[test]
fn modulo_requires_division() {
    assert_eq!(parse_err("加一以二所餘幾何。").msg, "所餘幾何須隨除");
}

#[test]
fn math_requires_preposition() {
    assert_eq!(parse_err("加一二。").msg, "須以或於");
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

const DOUBLE_FN: &str = "吾有一術。名之曰「加倍」。欲行是術。必先得一數曰「甲」。\
乃行是術曰。乘「甲」以二。乃得矣。是謂「加倍」之術也。";

#[test]
fn function_definition_shape() {
    let stmts = kinds(DOUBLE_FN);
    let StmtKind::FunctionDef(def) = &stmts[0] else {
        panic!("expected a function definition, got {:?}", stmts[0]);
    };
    assert_eq!(def.name, "加倍");
    assert_eq!(
        def.param_groups,
        vec![ParamGroup {
            count: 1,
            ty: TypeTag::Num,
            names: vec!["甲".to_string()],
        }]
    );
    assert!(def.rest_param.is_none());
    assert_eq!(def.body.len(), 2);
}

#[test]
fn rest_parameter_shape() {
    let src = "吾有一術。名之曰「收」。欲行是術。必先得一數。曰「首」。其餘數。曰「餘」。\
乃行是術曰。乃得「首」。是謂「收」之術也。";
    let stmts = kinds(src);
    let StmtKind::FunctionDef(def) = &stmts[0] else {
        panic!("expected a function definition");
    };
    assert_eq!(
        def.rest_param,
        Some(RestParam {
            ty: TypeTag::Num,
            name: "餘".to_string(),
        })
    );
}

#[test]
fn tail_name_mismatch() {
    let src = "吾有一術。名之曰「甲」。欲行是術。乃行是術曰。乃得一。是謂「乙」之術也。";
    let err = parse_err(src);
    assert_eq!(err.msg, "術名不符");
    assert_eq!(span_text(src, &err), "「乙」");
}

#[test]
fn rest_parameter_takes_one_name() {
    let src = "吾有一術。名之曰「錯」。欲行是術。必先得其餘數。曰「甲」。曰「乙」。\
乃行是術曰。乃得零。是謂「錯」之術也。";
    assert_eq!(parse_err(src).msg, "其餘參數須一名");
}

#[test]
fn rest_parameter_must_be_last() {
    let src = "吾有一術。名之曰「錯」。欲行是術。必先得其餘數。曰「餘」。一數。曰「甲」。\
乃行是術曰。乃得零。是謂「錯」之術也。";
    assert_eq!(parse_err(src).msg, "其餘參數須居末");
}

#[test]
fn call_collects_all_arguments() {
    assert_eq!(
        kinds("施「甲」於一。於二。"),
        vec![StmtKind::Call {
            callee: Value::Ident("甲".to_string()),
            args: vec![Value::Int(1), Value::Int(2)],
        }]
    );
}

#[test]
fn staged_call_forms() {
    assert_eq!(
        kinds("取二以施「加」。"),
        vec![StmtKind::CallStaged {
            count: TakeCount::N(2),
            callee: Value::Ident("加".to_string()),
        }]
    );
    assert_eq!(
        kinds("取其餘以施「加」。"),
        vec![StmtKind::CallStaged {
            count: TakeCount::Rest,
            callee: Value::Ident("加".to_string()),
        }]
    );
}

#[test]
fn staged_apply_without_take() {
    assert_eq!(parse_err("以施「甲」。").msg, "以施需先取");
}

// ---------------------------------------------------------------------------
// Conditionals and loops
// ---------------------------------------------------------------------------

#[test]
fn if_elseif_else_chain() {
    let stmts = kinds(
        "若「甲」等於一者。書之。或若「甲」等於二者。書之。若非。書之。云云。",
    );
    let StmtKind::If { clauses, else_body } = &stmts[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(clauses.len(), 2);
    assert!(else_body.is_some());
}

#[test]
fn degenerate_if_reads_it() {
    let stmts = kinds("若其然者。書之。云云。");
    let StmtKind::If { clauses, .. } = &stmts[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(clauses[0].0, IfCond::ItTrue);
}

#[test]
fn condition_chain_is_left_associative() {
    let stmts = kinds("若「甲」等於一中有陽乎「乙」者。書之。云云。");
    let StmtKind::If { clauses, .. } = &stmts[0] else {
        panic!("expected an if statement");
    };
    let IfCond::Expr(Expr::Binary { op, lhs, .. }) = &clauses[0].0 else {
        panic!("expected a binary condition");
    };
    assert_eq!(*op, BinOp::Or);
    assert!(matches!(**lhs, Expr::Binary { op: BinOp::Eq, .. }));
}

#[test]
fn unterminated_if() {
    assert_eq!(parse_err("若一者。書之。").msg, "若無云云");
}

#[test]
fn assignment_with_shi_ye_closes_the_if() {
    let stmts = kinds("若一者。昔之「甲」者。今二是也。云云。夫「甲」。");
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0], StmtKind::If { .. }));
}

#[test]
fn return_closes_an_open_loop_body() {
    let stmts = kinds("恆為是。乃止。乃得一。");
    assert_eq!(stmts.len(), 2);
    let StmtKind::WhileTrue { body } = &stmts[0] else {
        panic!("expected a loop");
    };
    assert_eq!(body.len(), 1);
    assert!(matches!(stmts[1], StmtKind::Return(ReturnKind::Value(Value::Int(1)))));
}

#[test]
fn for_each_binds_the_element() {
    let stmts = kinds("凡「列」中之「元」。書之。云云。");
    assert_eq!(
        stmts[0],
        StmtKind::ForEach {
            list: Value::Ident("列".to_string()),
            var: "元".to_string(),
            body: vec![Stmt {
                kind: StmtKind::Print,
                span: wenyan::source::Span::new(10, 12),
            }],
        }
    );
}

#[test]
fn unterminated_loop() {
    assert_eq!(parse_err("為是三遍。書之。").msg, "循環無云云");
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

#[test]
fn delete_form() {
    assert_eq!(
        kinds("昔之「甲」者。今不復存矣。"),
        vec![StmtKind::Assign {
            target: "甲".to_string(),
            index: None,
            rhs: AssignRhs::Delete,
        }]
    );
}

#[test]
fn subscripts_on_both_sides() {
    assert_eq!(
        kinds("昔之「甲」之二者。今「乙」之三是矣。"),
        vec![StmtKind::Assign {
            target: "甲".to_string(),
            index: Some(Index::At(Value::Int(2))),
            rhs: AssignRhs::Value {
                value: Value::Ident("乙".to_string()),
                index: Some(Index::At(Value::Int(3))),
            },
        }]
    );
}

// ---------------------------------------------------------------------------
// Try, throw, objects, imports, comments
// ---------------------------------------------------------------------------

#[test]
fn try_without_catches() {
    let stmts = kinds("姑妄行此。書之。如事不諧乃作罷。");
    let StmtKind::Try { body, catches } = &stmts[0] else {
        panic!("expected a try statement");
    };
    assert_eq!(body.len(), 1);
    assert!(catches.is_empty());
}

#[test]
fn catch_all_must_be_last() {
    let src = "姑妄行此。書之。如事不諧。不知何禍歟。書之。豈一之禍歟。書之。乃作罷。";
    assert_eq!(parse_err(src).msg, "不知何禍歟須居末");
}

#[test]
fn try_requires_its_end() {
    assert_eq!(parse_err("姑妄行此。書之。如事不諧。書之。").msg, "如事不諧須乃作罷");
}

#[test]
fn throw_with_detail() {
    assert_eq!(
        kinds("嗚呼。「「禍名」」之禍。曰「「詳情」」。"),
        vec![StmtKind::Throw {
            tag: Value::Str("禍名".to_string()),
            detail: Some(Value::Str("詳情".to_string())),
        }]
    );
}

#[test]
fn object_literal_shape() {
    let stmts = kinds(
        "吾有一物。名之曰「甲」。其物如是。物之「「年」」者。數曰二十三。是謂「甲」之物也。",
    );
    assert_eq!(
        stmts[0],
        StmtKind::ObjectDef {
            count: 1,
            names: vec!["甲".to_string()],
            props: vec![ObjectProp {
                key: "年".to_string(),
                ty: TypeTag::Num,
                value: Value::Int(23),
            }],
        }
    );
}

#[test]
fn object_tail_name_mismatch() {
    let src = "吾有一物。名之曰「甲」。其物如是。是謂「乙」之物也。";
    let err = parse_err(src);
    assert_eq!(err.msg, "物名不符");
    assert_eq!(span_text(src, &err), "「乙」");
}

#[test]
fn plain_object_declaration() {
    assert_eq!(
        kinds("吾有一物。名之曰「甲」。"),
        vec![StmtKind::Define {
            decl: DeclareStmt {
                count: 1,
                ty: TypeTag::Object,
                inits: vec![],
            },
            names: vec!["甲".to_string()],
        }]
    );
}

#[test]
fn import_with_learned_names() {
    assert_eq!(
        kinds("吾嘗觀「「算經」」中「「開方」」之書。方悟「甲」「乙」之義。"),
        vec![StmtKind::Import {
            path: vec![
                PathSeg::Str("算經".to_string()),
                PathSeg::Str("開方".to_string()),
            ],
            names: Some(vec!["甲".to_string(), "乙".to_string()]),
        }]
    );
}

#[test]
fn comment_requires_a_literal() {
    assert_eq!(
        kinds("注曰「「志之」」。"),
        vec![StmtKind::Comment {
            text: "志之".to_string(),
        }]
    );
    assert_eq!(parse_err("注曰二。").msg, "注後須言");
}

// ---------------------------------------------------------------------------
// Spans
// ---------------------------------------------------------------------------

#[test]
fn statement_spans_cover_their_tokens() {
    let src = "加一以二。書之。";
    let stmts = parse(src);
    assert_eq!(stmts[0].span.start, 0);
    assert_eq!(stmts[0].span.end, 4); // 加一以二
    assert_eq!(stmts[1].span.start, 5); // 書之 after the skipped 。
    assert_eq!(stmts[1].span.end, 7);
}
