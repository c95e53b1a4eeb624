//! # Hack Assembly Parser
//!
//! Parses tokenized Hack assembly into an Abstract Syntax Tree (AST).
//!
//! ## Architecture
//!
//! The parser processes tokens line by line (split on `Newline`/`Eof`,
//! following the teacher's line-oriented approach), handling:
//! - `(LABEL)` definitions
//! - `@symbol` / `@123` A-instructions
//! - `dest=comp;jump` C-instructions, with `dest` and `jump` optional
//!
//! Unlike LC-3's many distinct opcodes, Hack has exactly one C-instruction
//! shape, so there is no need for the teacher's per-opcode parsing macros —
//! the comp/dest/jump mnemonics are validated later, in the encoder, against
//! the fixed lookup tables from spec §4.1.

pub mod ast;


use crate::error::{AsmError, ErrorKind};
use crate::lexer::token::{Token, TokenKind};
use ast::{LineContent, SourceLine};

pub struct ParseResult {
    pub lines: Vec<SourceLine>,
    pub errors: Vec<AsmError>,
}

#[must_use]
pub fn parse_lines(tokens: &[Token]) -> ParseResult {
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    let mut line_start = 0;
    let mut line_number = 1;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Newline => {
                process_line(&tokens[line_start..i], line_number, &mut lines, &mut errors);
                line_start = i + 1;
                line_number += 1;
            }
            TokenKind::Eof => {
                process_line(&tokens[line_start..i], line_number, &mut lines, &mut errors);
                break;
            }
            _ => {}
        }
    }

    ParseResult { lines, errors }
}

fn process_line(
    tokens: &[Token],
    line_number: usize,
    lines: &mut Vec<SourceLine>,
    errors: &mut Vec<AsmError>,
) {
    let span = tokens.first().map(|t| t.span).unwrap_or_default();

    if tokens.is_empty() {
        lines.push(SourceLine {
            content: LineContent::Empty,
            line_number,
            span,
        });
        return;
    }

    let content = match parse_line_content(tokens) {
        Ok(content) => content,
        Err(err) => {
            errors.push(err);
            LineContent::Empty
        }
    };

    lines.push(SourceLine {
        content,
        line_number,
        span,
    });
}

fn parse_line_content(tokens: &[Token]) -> Result<LineContent, AsmError> {
    match &tokens[0].kind {
        TokenKind::LParen => parse_label(tokens),
        TokenKind::At => parse_a_instruction(tokens),
        _ => parse_c_instruction(tokens),
    }
}

fn parse_label(tokens: &[Token]) -> Result<LineContent, AsmError> {
    let name = match tokens.get(1).map(|t| &t.kind) {
        Some(TokenKind::Ident(name)) => name.clone(),
        _ => {
            return Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                "expected a label name after '('",
                tokens[0].span,
            ))
        }
    };

    match tokens.get(2).map(|t| &t.kind) {
        Some(TokenKind::RParen) => {}
        _ => {
            return Err(AsmError::new(
                ErrorKind::UnexpectedToken,
                "expected ')' to close label definition",
                tokens[0].span,
            ))
        }
    }

    if tokens.len() > 3 {
        return Err(AsmError::new(
            ErrorKind::UnexpectedToken,
            "unexpected tokens after label definition",
            tokens[3].span,
        ));
    }

    Ok(LineContent::Label(name))
}

fn parse_a_instruction(tokens: &[Token]) -> Result<LineContent, AsmError> {
    let target = tokens.get(1).ok_or_else(|| {
        AsmError::new(
            ErrorKind::UnexpectedToken,
            "expected a symbol or number after '@'",
            tokens[0].span,
        )
    })?;

    if tokens.len() > 2 {
        return Err(AsmError::new(
            ErrorKind::UnexpectedToken,
            "unexpected tokens after A-instruction",
            tokens[2].span,
        ));
    }

    match &target.kind {
        TokenKind::Number(n) => {
            if *n < 0 || *n > 0x7FFF {
                return Err(AsmError::integer_out_of_range(*n, target.span));
            }
            Ok(LineContent::AInstructionNumber(*n as u16))
        }
        TokenKind::Ident(name) => Ok(LineContent::AInstructionSymbol(name.clone())),
        _ => Err(AsmError::new(
            ErrorKind::UnexpectedToken,
            "expected a symbol or number after '@'",
            target.span,
        )),
    }
}

/// Parses `dest=comp;jump`, where `dest=` and `;jump` are each optional.
///
/// `dest` (when present) is always a single identifier token (`A`, `M`,
/// `D`, or a letter combination like `AMD` — the lexer already merges
/// runs of letters into one `Ident`). `comp` is reconstructed by
/// concatenating the lexemes of every token up to the `;` (or end of
/// line) with no separator, which recovers the compact mnemonic form
/// (`D+A`, `-1`, `!D`, ...) the encoder's comp table expects.
fn parse_c_instruction(tokens: &[Token]) -> Result<LineContent, AsmError> {
    let mut idx = 0;
    let mut dest = None;

    if tokens.len() >= 2 && matches!(tokens[1].kind, TokenKind::Equals) {
        match &tokens[0].kind {
            TokenKind::Ident(name) => dest = Some(name.clone()),
            _ => {
                return Err(AsmError::new(
                    ErrorKind::UnexpectedToken,
                    "expected a dest mnemonic before '='",
                    tokens[0].span,
                ))
            }
        }
        idx = 2;
    }

    let jump_split = tokens[idx..]
        .iter()
        .position(|t| matches!(t.kind, TokenKind::Semicolon));

    let (comp_tokens, jump) = match jump_split {
        Some(rel_pos) => {
            let semi_pos = idx + rel_pos;
            let jump_token = tokens.get(semi_pos + 1).ok_or_else(|| {
                AsmError::new(
                    ErrorKind::UnexpectedToken,
                    "expected a jump mnemonic after ';'",
                    tokens[semi_pos].span,
                )
            })?;
            let jump_name = match &jump_token.kind {
                TokenKind::Ident(name) => name.clone(),
                _ => {
                    return Err(AsmError::new(
                        ErrorKind::UnexpectedToken,
                        "expected a jump mnemonic after ';'",
                        jump_token.span,
                    ))
                }
            };
            if semi_pos + 2 != tokens.len() {
                return Err(AsmError::new(
                    ErrorKind::UnexpectedToken,
                    "unexpected tokens after jump mnemonic",
                    tokens[semi_pos + 2].span,
                ));
            }
            (&tokens[idx..semi_pos], Some(jump_name))
        }
        None => (&tokens[idx..], None),
    };

    if comp_tokens.is_empty() {
        return Err(AsmError::new(
            ErrorKind::UnexpectedToken,
            "expected a comp expression",
            tokens[idx.min(tokens.len() - 1)].span,
        ));
    }

    let comp: String = comp_tokens.iter().map(|t| t.lexeme.as_str()).collect();

    Ok(LineContent::CInstruction { dest, comp, jump })
}
