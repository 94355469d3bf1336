use super::*;
use crate::tokenize::tokenize;

fn parser_for(source: &str) -> Parser {
    Parser::new(tokenize(source, "test.c").unwrap())
}

fn parse_expr_text(source: &str) -> Expr {
    let mut parser = parser_for(source);
    let expr = parser.expr().unwrap();
    parser.ensure_done().unwrap();
    expr
}

fn parse_program(source: &str) -> PResult<Program> {
    parser_for(source).parse()
}

/// Renders the expression tree as an s-expression so tests compare shapes,
/// not source locations.
fn shape(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Constant(value) => value.to_string(),
        ExprKind::Var(name) => name.clone(),
        ExprKind::Unary(op, operand) => format!("({op} {})", shape(operand)),
        ExprKind::Binary(op, left, right) => {
            format!("({op} {} {})", shape(left), shape(right))
        }
        ExprKind::Assignment(left, right) => format!("(= {} {})", shape(left), shape(right)),
        ExprKind::Conditional(condition, then_expr, else_expr) => format!(
            "(?: {} {} {})",
            shape(condition),
            shape(then_expr),
            shape(else_expr)
        ),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(shape(&parse_expr_text("a + b * c")), "(+ a (* b c))");
    assert_eq!(shape(&parse_expr_text("a * b + c")), "(+ (* a b) c)");
}

#[test]
fn relational_binds_tighter_than_equality() {
    assert_eq!(
        shape(&parse_expr_text("a < b == c < d")),
        "(== (< a b) (< c d))"
    );
}

#[test]
fn logical_or_binds_loosest_of_the_binaries() {
    assert_eq!(
        shape(&parse_expr_text("a || b && c == d")),
        "(|| a (&& b (== c d)))"
    );
}

#[test]
fn left_associative_binaries_lean_left() {
    assert_eq!(shape(&parse_expr_text("a - b - c")), "(- (- a b) c)");
    assert_eq!(shape(&parse_expr_text("a / b / c")), "(/ (/ a b) c)");
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(shape(&parse_expr_text("a = b = 1")), "(= a (= b 1))");
}

#[test]
fn conditional_is_right_associative() {
    assert_eq!(
        shape(&parse_expr_text("a ? b : c ? d : e")),
        "(?: a b (?: c d e))"
    );
}

#[test]
fn conditional_middle_resets_precedence() {
    assert_eq!(
        shape(&parse_expr_text("a ? b = 1 : c")),
        "(?: a (= b 1) c)"
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(shape(&parse_expr_text("(a + b) * c")), "(* (+ a b) c)");
}

#[test]
fn unary_operators_apply_to_factors() {
    assert_eq!(shape(&parse_expr_text("-a + ~b")), "(+ (- a) (~ b))");
    assert_eq!(shape(&parse_expr_text("!!a")), "(! (! a))");
}

#[test]
fn full_program_with_control_flow() {
    let program = parse_program(
        "int main(void) { \
            int x = 0; \
            for (int i = 0; i < 5; i = i + 1) x = x + i; \
            while (x > 3) { x = x - 1; } \
            do ; while (x); \
            if (x) return x; else return 0; \
        }",
    )
    .unwrap();

    assert_eq!(program.function.name, "main");
    let items = &program.function.body.items;
    assert_eq!(items.len(), 5);
    assert!(matches!(items[0], BlockItem::Declaration(_)));
    assert!(matches!(
        items[1],
        BlockItem::Statement(Stmt {
            kind: StmtKind::For {
                init: ForInit::Declaration(_),
                condition: Some(_),
                post: Some(_),
                ..
            },
            ..
        })
    ));
    assert!(matches!(
        items[2],
        BlockItem::Statement(Stmt {
            kind: StmtKind::While { .. },
            ..
        })
    ));
    assert!(matches!(
        items[3],
        BlockItem::Statement(Stmt {
            kind: StmtKind::DoWhile { .. },
            ..
        })
    ));
    assert!(matches!(
        items[4],
        BlockItem::Statement(Stmt {
            kind: StmtKind::If {
                else_branch: Some(_),
                ..
            },
            ..
        })
    ));
}

#[test]
fn for_header_slots_are_optional() {
    let program = parse_program("int main(void) { for (;;) break; return 0; }").unwrap();
    assert!(matches!(
        program.function.body.items[0],
        BlockItem::Statement(Stmt {
            kind: StmtKind::For {
                init: ForInit::Expr(None),
                condition: None,
                post: None,
                ..
            },
            ..
        })
    ));
}

#[test]
fn null_statement() {
    let program = parse_program("int main(void) { ; return 0; }").unwrap();
    assert!(matches!(
        program.function.body.items[0],
        BlockItem::Statement(Stmt {
            kind: StmtKind::Null,
            ..
        })
    ));
}

#[test]
fn missing_semicolon_is_reported_at_the_brace() {
    let err = parse_program("int main(void) { return 1 }").unwrap_err();
    assert!(matches!(
        err,
        ParserError::ExpectedToken(TokenKind::Semicolon, TokenKind::RBrace, _)
    ));
}

#[test]
fn truncated_input_reports_eof() {
    let err = parse_program("int main(void) { return 1").unwrap_err();
    assert_eq!(err, ParserError::UnexpectedEof);
}

#[test]
fn trailing_tokens_after_function() {
    let err = parse_program("int main(void) { return 0; } int").unwrap_err();
    assert!(matches!(err, ParserError::NotAtEnd(TokenKind::Int, _)));
}

#[test]
fn decrement_is_not_a_factor() {
    let err = parse_program("int main(void) { return --1; }").unwrap_err();
    assert!(matches!(
        err,
        ParserError::ExpectedFactor(TokenKind::Decrement, _)
    ));
}

#[test]
fn parameter_list_must_be_void() {
    let err = parse_program("int main() { return 0; }").unwrap_err();
    assert!(matches!(
        err,
        ParserError::ExpectedToken(TokenKind::Void, TokenKind::RParen, _)
    ));
}
