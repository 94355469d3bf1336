use quickcheck::{Arbitrary, Gen, QuickCheck};

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, "test.c")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn basic_program() {
    let kinds = kinds("int main(void) { return 2; }");
    let expected = vec![
        TokenKind::Int,
        TokenKind::Identifier(String::from("main")),
        TokenKind::LParen,
        TokenKind::Void,
        TokenKind::RParen,
        TokenKind::LBrace,
        TokenKind::Return,
        TokenKind::Constant(2),
        TokenKind::Semicolon,
        TokenKind::RBrace,
    ];
    assert_eq!(kinds, expected);
}

#[test]
fn operators_maximal_munch() {
    let kinds = kinds("<= < == = != ! && || -- - >= >");
    let expected = vec![
        TokenKind::LessThanEqual,
        TokenKind::LessThan,
        TokenKind::DoubleEqual,
        TokenKind::Equal,
        TokenKind::NotEqual,
        TokenKind::Not,
        TokenKind::DoubleAmpersand,
        TokenKind::DoublePipe,
        TokenKind::Decrement,
        TokenKind::Minus,
        TokenKind::GreaterThanEqual,
        TokenKind::GreaterThan,
    ];
    assert_eq!(kinds, expected);
}

#[test]
fn keywords_vs_identifiers() {
    let kinds = kinds("int intx returned for fortune");
    let expected = vec![
        TokenKind::Int,
        TokenKind::Identifier(String::from("intx")),
        TokenKind::Identifier(String::from("returned")),
        TokenKind::For,
        TokenKind::Identifier(String::from("fortune")),
    ];
    assert_eq!(kinds, expected);
}

#[test]
fn line_and_column_tracking() {
    let tokens = tokenize("int main(void)\n{\n  return 0;\n}", "test.c").unwrap();

    let brace = tokens
        .iter()
        .find(|t| t.kind == TokenKind::LBrace)
        .unwrap();
    assert_eq!((brace.loc.line, brace.loc.column), (2, 1));

    let ret = tokens.iter().find(|t| t.kind == TokenKind::Return).unwrap();
    assert_eq!((ret.loc.line, ret.loc.column), (3, 3));
    assert_eq!(ret.loc.file, "test.c");

    let int = &tokens[0];
    assert_eq!((int.loc.line, int.loc.column), (1, 1));
}

#[test]
fn unexpected_character() {
    let err = tokenize("int main(void) { return 0@1; }", "test.c").unwrap_err();
    match err {
        TokenizerError::UnexpectedCharacter(c, loc) => {
            assert_eq!(c, '@');
            assert_eq!(loc.line, 1);
        }
        other => panic!("wrong error: {other:?}"),
    }
}

#[test]
fn digits_followed_by_identifier_start() {
    let err = tokenize("int main(void) { return 1foo; }", "test.c").unwrap_err();
    assert!(matches!(err, TokenizerError::InvalidNumber(ref text, _) if text == "1foo"));
}

#[test]
fn carriage_returns_do_not_advance_lines() {
    let tokens = tokenize("int\r\nmain", "test.c").unwrap();
    assert_eq!(tokens[1].loc.line, 2);

    let tokens = tokenize("int\rmain", "test.c").unwrap();
    assert_eq!(tokens[1].loc.line, 1);
}

#[derive(Debug, Clone)]
struct Whitespace(&'static str);

impl Arbitrary for Whitespace {
    fn arbitrary(g: &mut Gen) -> Self {
        Whitespace(*g.choose(&[" ", "  ", "\t", "\r", "\n", " \n\t "]).unwrap())
    }
}

#[test]
fn whitespace_between_tokens_is_insignificant() {
    fn property(seps: Vec<Whitespace>) -> bool {
        let words = [
            "int", "main", "(", "void", ")", "{", "int", "a", "=", "1", "&&", "2", ";", "return",
            "a", "<=", "3", "?", "a", ":", "0", ";", "}",
        ];

        let reference: String = words.join(" ");
        let mut padded = String::new();
        for (i, word) in words.iter().enumerate() {
            padded.push_str(word);
            padded.push(' ');
            if let Some(Whitespace(ws)) = seps.get(i % seps.len().max(1)) {
                padded.push_str(ws);
            }
        }

        kinds(&reference) == kinds(&padded)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(property as fn(Vec<Whitespace>) -> bool);
}
