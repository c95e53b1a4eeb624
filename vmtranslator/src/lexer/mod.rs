//! # VM Instruction Lexer
//!
//! VM source is whitespace-separated words, one instruction per line.
//! `//` line comments and blank lines are stripped here, mirroring the
//! reference implementation's `read_file` preprocessing.

pub mod cursor;
pub mod token;


use crate::error::VmError;
use cursor::Cursor;
use token::{Token, TokenKind};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<VmError>,
}

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let errors = Vec::new();

    while !cursor.is_at_end() {
        if let Some(token) = lex_token(&mut cursor) {
            tokens.push(token);
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: cursor.make_span(l, c),
    });

    LexResult { tokens, errors }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$')
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '-')
}

fn lex_token(cursor: &mut Cursor) -> Option<Token> {
    while matches!(cursor.peek(), Some(' ' | '\t' | '\r')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return None;
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    match ch {
        '\n' => {
            cursor.advance();
            Some(Token {
                kind: TokenKind::Newline,
                span: cursor.make_span(sl, sc),
            })
        }
        '/' if cursor.peek_at(1) == Some('/') => {
            while !matches!(cursor.peek(), None | Some('\n')) {
                cursor.advance();
            }
            None
        }
        c if c.is_ascii_digit() => lex_number(cursor, sl, sc),
        c if is_ident_start(c) => lex_ident(cursor, sl, sc),
        _ => {
            cursor.advance();
            None
        }
    }
}

fn lex_number(cursor: &mut Cursor, sl: usize, sc: usize) -> Option<Token> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }
    let value: i64 = digits.parse().ok()?;
    Some(Token {
        kind: TokenKind::Number(value),
        span: cursor.make_span(sl, sc),
    })
}

fn lex_ident(cursor: &mut Cursor, sl: usize, sc: usize) -> Option<Token> {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if is_ident_continue(c)) {
        word.push(cursor.advance().unwrap());
    }
    Some(Token {
        kind: TokenKind::Ident(word),
        span: cursor.make_span(sl, sc),
    })
}
