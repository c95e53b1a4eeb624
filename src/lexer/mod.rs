//! # Hack Assembly Lexer
//!
//! Tokenizes Hack assembly source into a stream of tokens.
//!
//! ## Features
//!
//! - A-instruction marker `@`, label parentheses `()`
//! - C-instruction punctuation: `=`, `;`, `+`, `-`, `!`, `&`, `|`
//! - Decimal integer literals (range-checked against 15 bits downstream,
//!   in the parser/encoder — the lexer only validates that the digits
//!   form a legal `i64`)
//! - `//` line comments and blank lines, both stripped here
//! - Identifiers: symbols and labels, including the `.`/`$`/`_`/`:`
//!   characters the VM translator emits in generated labels
//!   (e.g. `Foo.bar$ret0`)

pub mod cursor;
pub mod token;


use crate::error::{AsmError, ErrorKind};
use cursor::Cursor;
use token::{Token, TokenKind};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<AsmError>,
}

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while !cursor.is_at_end() {
        match lex_token(&mut cursor) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: cursor.make_span(l, c),
    });

    LexResult { tokens, errors }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$' | ':')
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

fn lex_token(cursor: &mut Cursor) -> Result<Option<Token>, AsmError> {
    while matches!(cursor.peek(), Some(' ' | '\t')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return Ok(None);
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    match ch {
        '\n' | '\r' => lex_newline(cursor, sl, sc),
        '/' if cursor.peek_at(1) == Some('/') => {
            while !matches!(cursor.peek(), None | Some('\n') | Some('\r')) {
                cursor.advance();
            }
            Ok(None)
        }
        '@' => single(cursor, sl, sc, TokenKind::At, "@"),
        '(' => single(cursor, sl, sc, TokenKind::LParen, "("),
        ')' => single(cursor, sl, sc, TokenKind::RParen, ")"),
        '=' => single(cursor, sl, sc, TokenKind::Equals, "="),
        ';' => single(cursor, sl, sc, TokenKind::Semicolon, ";"),
        '+' => single(cursor, sl, sc, TokenKind::Plus, "+"),
        '-' => single(cursor, sl, sc, TokenKind::Minus, "-"),
        '!' => single(cursor, sl, sc, TokenKind::Bang, "!"),
        '&' => single(cursor, sl, sc, TokenKind::Amp, "&"),
        '|' => single(cursor, sl, sc, TokenKind::Pipe, "|"),
        c if c.is_ascii_digit() => lex_number(cursor, sl, sc),
        c if is_ident_start(c) => lex_ident(cursor, sl, sc),
        _ => {
            cursor.advance();
            Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                format!("unexpected character '{ch}'"),
                cursor.make_span(sl, sc),
            ))
        }
    }
}

fn single(
    cursor: &mut Cursor,
    sl: usize,
    sc: usize,
    kind: TokenKind,
    lexeme: &str,
) -> Result<Option<Token>, AsmError> {
    cursor.advance();
    Ok(Some(Token {
        kind,
        lexeme: lexeme.into(),
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_newline(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, AsmError> {
    if cursor.peek() == Some('\r') {
        cursor.advance();
        if cursor.peek() == Some('\n') {
            cursor.advance();
        }
    } else {
        cursor.advance();
    }

    Ok(Some(Token {
        kind: TokenKind::Newline,
        lexeme: "\n".into(),
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_number(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, AsmError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }

    let value: i64 = digits.parse().map_err(|_| {
        AsmError::new(
            ErrorKind::IntegerOutOfRange,
            format!("'{digits}' is not a valid integer literal"),
            cursor.make_span(sl, sc),
        )
    })?;

    Ok(Some(Token {
        kind: TokenKind::Number(value),
        lexeme: digits,
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_ident(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, AsmError> {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if is_ident_continue(c)) {
        word.push(cursor.advance().unwrap());
    }

    Ok(Some(Token {
        kind: TokenKind::Ident(word.clone()),
        lexeme: word,
        span: cursor.make_span(sl, sc),
    }))
}
