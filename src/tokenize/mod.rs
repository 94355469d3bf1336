pub mod error;

#[cfg(test)]
mod tokenize_tests;

use logos::Logos;

use crate::location::Location;
use crate::tokenize::error::TokenizerError;

#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    #[token("~")]
    Tilde,

    #[token("--")]
    Decrement,

    #[token("-")]
    Minus,

    #[token("+")]
    Plus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Not,

    #[token("&&")]
    DoubleAmpersand,

    #[token("||")]
    DoublePipe,

    #[token("=")]
    Equal,

    #[token("==")]
    DoubleEqual,

    #[token("!=")]
    NotEqual,

    #[token("<")]
    LessThan,

    #[token(">")]
    GreaterThan,

    #[token("<=")]
    LessThanEqual,

    #[token(">=")]
    GreaterThanEqual,

    #[token("int")]
    Int,

    #[token("void")]
    Void,

    #[token("return")]
    Return,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("do")]
    Do,

    #[token("while")]
    While,

    #[token("for")]
    For,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i32>().ok(), priority = 5)]
    Constant(i32),

    // A digit run glued to an identifier character is one bad token, not
    // two good ones. Matched here so maximal munch claims it before Constant.
    #[regex(r"[0-9]+[a-zA-Z_]\w*", priority = 6)]
    InvalidNumber,

    #[regex(r"[a-zA-Z_]\w*", |lex| lex.slice().to_owned(), priority = 2)]
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub source: String,
    pub loc: Location,
}

pub fn tokenize(source: &str, file: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = vec![];

    let bytes = source.as_bytes();
    let mut line = 1;
    let mut line_start = 0;
    let mut scanned = 0;

    while let Some(t) = lexer.next() {
        let span = lexer.span();

        // Catch up on newlines skipped since the previous token. Tokens
        // themselves never span lines.
        for (i, b) in bytes[scanned..span.start].iter().enumerate() {
            if *b == b'\n' {
                line += 1;
                line_start = scanned + i + 1;
            }
        }
        scanned = span.end;

        let loc = Location::new(file, line, span.start - line_start + 1);
        let kind = t.map_err(|()| {
            let found = source[span.start..].chars().next().unwrap_or('\0');
            TokenizerError::UnexpectedCharacter(found, loc.clone())
        })?;

        if matches!(kind, TokenKind::InvalidNumber) {
            return Err(TokenizerError::InvalidNumber(lexer.slice().to_owned(), loc));
        }

        tokens.push(Token {
            kind,
            source: lexer.slice().to_owned(),
            loc,
        });
    }

    Ok(tokens)
}
