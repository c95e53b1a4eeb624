//! # Jack Tokenizer
//!
//! Single left-to-right scan turning Jack source text into a token stream
//! (spec §4.3). Shared by the syntax analyzer and the compiler.
//!
//! Comments (`/* ... */`, possibly spanning lines, and `// ...` to end of
//! line) are skipped in place rather than stripped in a separate
//! preprocessing pass, so token spans stay anchored to the original source.

pub mod cursor;
pub mod token;

#[cfg(test)]
mod tests;

use crate::error::{ErrorKind, JackError, Span};
use cursor::Cursor;
use token::{Keyword, Token, TokenKind, SYMBOLS};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<JackError>,
}

const MAX_INTEGER_CONSTANT: u32 = 32767;

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    loop {
        match skip_trivia(&mut cursor) {
            Ok(()) => {}
            Err(err) => {
                errors.push(err);
                break;
            }
        }
        if cursor.is_at_end() {
            break;
        }

        match lex_token(&mut cursor) {
            Ok(token) => tokens.push(token),
            Err(err) => errors.push(err),
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token { kind: TokenKind::Eof, span: cursor.make_span(l, c) });

    LexResult { tokens, errors }
}

/// Skips whitespace, line comments, and block comments. Stops at the first
/// real token or end of input.
fn skip_trivia(cursor: &mut Cursor) -> Result<(), JackError> {
    loop {
        match cursor.peek() {
            Some(c) if c.is_whitespace() => {
                cursor.advance();
            }
            Some('/') if cursor.peek_at(1) == Some('/') => {
                while !matches!(cursor.peek(), None | Some('\n')) {
                    cursor.advance();
                }
            }
            Some('/') if cursor.peek_at(1) == Some('*') => {
                let (sl, sc) = cursor.current_pos();
                cursor.advance();
                cursor.advance();
                loop {
                    match cursor.peek() {
                        None => {
                            return Err(JackError::unterminated_block_comment(cursor.make_span(sl, sc)));
                        }
                        Some('*') if cursor.peek_at(1) == Some('/') => {
                            cursor.advance();
                            cursor.advance();
                            break;
                        }
                        Some(_) => {
                            cursor.advance();
                        }
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex_token(cursor: &mut Cursor) -> Result<Token, JackError> {
    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().expect("skip_trivia leaves a char when not at end");

    if SYMBOLS.contains(&ch) {
        cursor.advance();
        return Ok(Token { kind: TokenKind::Symbol(ch), span: cursor.make_span(sl, sc) });
    }

    if ch.is_ascii_digit() {
        return lex_integer(cursor, sl, sc);
    }

    if ch == '"' {
        return lex_string(cursor, sl, sc);
    }

    if is_ident_start(ch) {
        return lex_word(cursor, sl, sc);
    }

    cursor.advance();
    Err(JackError::new(
        ErrorKind::UnexpectedToken,
        format!("unexpected character '{ch}'"),
        cursor.make_span(sl, sc),
    ))
}

fn lex_integer(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Token, JackError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }

    let span = cursor.make_span(sl, sc);
    let value: u32 = digits.parse().unwrap_or(u32::MAX);
    if value > MAX_INTEGER_CONSTANT {
        return Err(JackError::integer_out_of_range(&digits, span));
    }

    Ok(Token { kind: TokenKind::IntegerConstant(value as u16), span })
}

fn lex_string(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Token, JackError> {
    cursor.advance(); // opening quote
    let mut value = String::new();
    loop {
        match cursor.peek() {
            None | Some('\n') => return Err(JackError::unterminated_string(cursor.make_span(sl, sc))),
            Some('"') => {
                cursor.advance();
                break;
            }
            Some(c) => {
                value.push(c);
                cursor.advance();
            }
        }
    }
    Ok(Token { kind: TokenKind::StringConstant(value), span: cursor.make_span(sl, sc) })
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Token, JackError> {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if is_ident_continue(c)) {
        word.push(cursor.advance().unwrap());
    }

    let span = cursor.make_span(sl, sc);
    let kind = match Keyword::from_str(&word) {
        Some(kw) => TokenKind::Keyword(kw),
        None => TokenKind::Identifier(word),
    };
    Ok(Token { kind, span })
}
