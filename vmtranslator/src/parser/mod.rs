//! # VM Instruction Parser
//!
//! Turns a token stream into a sequence of [`ast::VmLine`]s. Each source
//! line is exactly one instruction — no expressions, no nesting — so this
//! is a flat dispatch on the leading identifier rather than a recursive
//! descent grammar.

pub mod ast;

#[cfg(test)]
mod tests;

use crate::error::VmError;
use crate::lexer::token::{Token, TokenKind};
use ast::{Command, Segment, VmLine};

pub struct ParseResult {
    pub lines: Vec<VmLine>,
    pub errors: Vec<VmError>,
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
                parse_line(&tokens[line_start..i], line_number, &mut lines, &mut errors);
                line_start = i + 1;
                line_number += 1;
            }
            TokenKind::Eof => {
                parse_line(&tokens[line_start..i], line_number, &mut lines, &mut errors);
                break;
            }
            _ => {}
        }
    }

    ParseResult { lines, errors }
}

fn parse_line(
    tokens: &[Token],
    line_number: usize,
    lines: &mut Vec<VmLine>,
    errors: &mut Vec<VmError>,
) {
    if tokens.is_empty() {
        return;
    }

    let span = tokens[0].span;
    let verb = match &tokens[0].kind {
        TokenKind::Ident(word) => word.as_str(),
        _ => {
            errors.push(VmError::unexpected_token("expected an instruction", span));
            return;
        }
    };

    let command = match verb {
        "push" => parse_memory(tokens, span, errors, Command::Push {
            segment: Segment::Constant,
            index: 0,
        }, true),
        "pop" => parse_memory(tokens, span, errors, Command::Pop {
            segment: Segment::Constant,
            index: 0,
        }, false),
        "add" => Some(Command::Add),
        "sub" => Some(Command::Sub),
        "neg" => Some(Command::Neg),
        "eq" => Some(Command::Eq),
        "gt" => Some(Command::Gt),
        "lt" => Some(Command::Lt),
        "and" => Some(Command::And),
        "or" => Some(Command::Or),
        "not" => Some(Command::Not),
        "label" => parse_name(tokens, span, errors).map(Command::Label),
        "goto" => parse_name(tokens, span, errors).map(Command::Goto),
        "if-goto" => parse_name(tokens, span, errors).map(Command::IfGoto),
        "function" => parse_function(tokens, span, errors),
        "call" => parse_call(tokens, span, errors),
        "return" => Some(Command::Return),
        other => {
            errors.push(VmError::unexpected_token(
                format!("'{other}' is not a recognised VM instruction"),
                span,
            ));
            None
        }
    };

    if let Some(command) = command {
        lines.push(VmLine {
            command,
            line_number,
            span,
        });
    }
}

fn parse_memory(
    tokens: &[Token],
    span: crate::error::Span,
    errors: &mut Vec<VmError>,
    template: Command,
    is_push: bool,
) -> Option<Command> {
    if tokens.len() != 3 {
        errors.push(VmError::unexpected_token(
            format!("'{}' expects a segment and an index", verb_of(&template)),
            span,
        ));
        return None;
    }

    let segment_name = match &tokens[1].kind {
        TokenKind::Ident(name) => name.as_str(),
        _ => {
            errors.push(VmError::unexpected_token("expected a segment name", tokens[1].span));
            return None;
        }
    };
    let segment = match Segment::parse(segment_name) {
        Some(segment) => segment,
        None => {
            errors.push(VmError::unknown_segment(segment_name, tokens[1].span));
            return None;
        }
    };
    if !is_push && segment == Segment::Constant {
        errors.push(VmError::unexpected_token(
            "cannot pop into the read-only constant segment",
            tokens[1].span,
        ));
        return None;
    }

    let index = match &tokens[2].kind {
        TokenKind::Number(n) if *n >= 0 => *n as u16,
        _ => {
            errors.push(VmError::unexpected_token("expected a non-negative index", tokens[2].span));
            return None;
        }
    };

    Some(if is_push {
        Command::Push { segment, index }
    } else {
        Command::Pop { segment, index }
    })
}

fn verb_of(template: &Command) -> &'static str {
    match template {
        Command::Push { .. } => "push",
        Command::Pop { .. } => "pop",
        _ => "",
    }
}

fn parse_name(tokens: &[Token], span: crate::error::Span, errors: &mut Vec<VmError>) -> Option<String> {
    if tokens.len() != 2 {
        errors.push(VmError::unexpected_token("expected exactly one label name", span));
        return None;
    }
    match &tokens[1].kind {
        TokenKind::Ident(name) => Some(name.clone()),
        _ => {
            errors.push(VmError::unexpected_token("expected a label name", tokens[1].span));
            None
        }
    }
}

fn parse_function(tokens: &[Token], span: crate::error::Span, errors: &mut Vec<VmError>) -> Option<Command> {
    if tokens.len() != 3 {
        errors.push(VmError::unexpected_token(
            "'function' expects a name and a local count",
            span,
        ));
        return None;
    }
    let name = match &tokens[1].kind {
        TokenKind::Ident(name) => name.clone(),
        _ => {
            errors.push(VmError::unexpected_token("expected a function name", tokens[1].span));
            return None;
        }
    };
    let n_locals = match &tokens[2].kind {
        TokenKind::Number(n) if *n >= 0 => *n as u16,
        _ => {
            errors.push(VmError::unexpected_token("expected a non-negative local count", tokens[2].span));
            return None;
        }
    };
    Some(Command::Function { name, n_locals })
}

fn parse_call(tokens: &[Token], span: crate::error::Span, errors: &mut Vec<VmError>) -> Option<Command> {
    if tokens.len() != 3 {
        errors.push(VmError::unexpected_token(
            "'call' expects a function name and an argument count",
            span,
        ));
        return None;
    }
    let name = match &tokens[1].kind {
        TokenKind::Ident(name) => name.clone(),
        _ => {
            errors.push(VmError::unexpected_token("expected a function name", tokens[1].span));
            return None;
        }
    };
    let n_args = match &tokens[2].kind {
        TokenKind::Number(n) if *n >= 0 => *n as u16,
        _ => {
            errors.push(VmError::unexpected_token("expected a non-negative argument count", tokens[2].span));
            return None;
        }
    };
    Some(Command::Call { name, n_args })
}
