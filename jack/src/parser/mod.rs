//! # Jack Parser
//!
//! Recursive descent over the Jack grammar (spec §4.4, §6), shared by the
//! syntax analyzer and the compiler — both walk the same [`ast::Class`]
//! afterwards, one serializing it to XML (`xml`), the other to VM
//! instructions (`codegen`).
//!
//! Lookahead is one token everywhere except `term`, where the parser must
//! tell apart a bare `identifier`, `identifier [`, `identifier .`, and
//! `identifier (` by inspecting the token *after* the identifier without
//! consuming it (spec §4.4, §9 "recursive descent with lookahead").

pub mod ast;

#[cfg(test)]
mod tests;

use crate::error::{JackError, Span};
use crate::lexer::token::{Keyword, Token, TokenKind};
use ast::*;

/// A cursor over the token stream supporting arbitrary lookahead —
/// required by `term`'s two-token disambiguation (spec §9).
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let i = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[i]
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), JackError> {
        match self.peek().kind {
            TokenKind::Symbol(c) if c == symbol => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{symbol}'"))),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), JackError> {
        match self.peek().kind {
            TokenKind::Keyword(k) if k == keyword => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{}'", keyword.as_str()))),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, JackError> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn is_symbol(&self, symbol: char) -> bool {
        matches!(self.peek().kind, TokenKind::Symbol(c) if c == symbol)
    }

    fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek().kind, TokenKind::Keyword(k) if k == keyword)
    }

    fn unexpected(&self, expected: &str) -> JackError {
        JackError::unexpected_token(expected, &self.peek().kind.describe(), self.span())
    }
}

pub struct ParseResult {
    pub class: Option<Class>,
    pub error: Option<JackError>,
}

/// Parses one Jack class, per spec §6's "each file should contain one
/// jack class" precondition (documented again at §4.2's static-label
/// one-class-per-file note). A hard syntax error is fatal (spec §4.4
/// "Error policy") so parsing stops at the first one.
#[must_use]
pub fn parse(tokens: &[Token]) -> ParseResult {
    let mut cursor = Cursor::new(tokens);
    match parse_class(&mut cursor) {
        Ok(class) => ParseResult { class: Some(class), error: None },
        Err(err) => ParseResult { class: None, error: Some(err) },
    }
}

fn parse_class(cursor: &mut Cursor) -> Result<Class, JackError> {
    cursor.expect_keyword(Keyword::Class)?;
    let name = cursor.expect_identifier()?;
    cursor.expect_symbol('{')?;

    let mut var_decs = Vec::new();
    while cursor.is_keyword(Keyword::Static) || cursor.is_keyword(Keyword::Field) {
        var_decs.push(parse_class_var_dec(cursor)?);
    }

    let mut subroutines = Vec::new();
    while cursor.is_keyword(Keyword::Constructor)
        || cursor.is_keyword(Keyword::Function)
        || cursor.is_keyword(Keyword::Method)
    {
        subroutines.push(parse_subroutine_dec(cursor)?);
    }

    cursor.expect_symbol('}')?;
    Ok(Class { name, var_decs, subroutines })
}

fn parse_class_var_dec(cursor: &mut Cursor) -> Result<ClassVarDec, JackError> {
    let kind = if cursor.is_keyword(Keyword::Static) {
        cursor.advance();
        ClassVarKind::Static
    } else {
        cursor.expect_keyword(Keyword::Field)?;
        ClassVarKind::Field
    };

    let var_type = parse_type(cursor)?;
    let mut names = vec![cursor.expect_identifier()?];
    while cursor.is_symbol(',') {
        cursor.advance();
        names.push(cursor.expect_identifier()?);
    }
    cursor.expect_symbol(';')?;

    Ok(ClassVarDec { kind, var_type, names })
}

fn parse_type(cursor: &mut Cursor) -> Result<Type, JackError> {
    match cursor.peek().kind.clone() {
        TokenKind::Keyword(Keyword::Int) => {
            cursor.advance();
            Ok(Type::Int)
        }
        TokenKind::Keyword(Keyword::Char) => {
            cursor.advance();
            Ok(Type::Char)
        }
        TokenKind::Keyword(Keyword::Boolean) => {
            cursor.advance();
            Ok(Type::Boolean)
        }
        TokenKind::Identifier(name) => {
            cursor.advance();
            Ok(Type::Class(name))
        }
        _ => Err(cursor.unexpected("a type")),
    }
}

fn parse_subroutine_dec(cursor: &mut Cursor) -> Result<SubroutineDec, JackError> {
    let kind = match cursor.peek().kind {
        TokenKind::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
        TokenKind::Keyword(Keyword::Function) => SubroutineKind::Function,
        TokenKind::Keyword(Keyword::Method) => SubroutineKind::Method,
        _ => return Err(cursor.unexpected("'constructor', 'function', or 'method'")),
    };
    cursor.advance();

    let return_type = if cursor.is_keyword(Keyword::Void) {
        cursor.advance();
        None
    } else {
        Some(parse_type(cursor)?)
    };

    let name = cursor.expect_identifier()?;
    cursor.expect_symbol('(')?;
    let params = parse_parameter_list(cursor)?;
    cursor.expect_symbol(')')?;
    let body = parse_subroutine_body(cursor)?;

    Ok(SubroutineDec { kind, return_type, name, params, body })
}

fn parse_parameter_list(cursor: &mut Cursor) -> Result<Vec<Param>, JackError> {
    let mut params = Vec::new();
    if cursor.is_symbol(')') {
        return Ok(params);
    }

    loop {
        let param_type = parse_type(cursor)?;
        let name = cursor.expect_identifier()?;
        params.push(Param { param_type, name });
        if cursor.is_symbol(',') {
            cursor.advance();
        } else {
            break;
        }
    }
    Ok(params)
}

fn parse_subroutine_body(cursor: &mut Cursor) -> Result<SubroutineBody, JackError> {
    cursor.expect_symbol('{')?;

    let mut var_decs = Vec::new();
    while cursor.is_keyword(Keyword::Var) {
        var_decs.push(parse_var_dec(cursor)?);
    }

    let statements = parse_statements(cursor)?;
    cursor.expect_symbol('}')?;

    Ok(SubroutineBody { var_decs, statements })
}

fn parse_var_dec(cursor: &mut Cursor) -> Result<VarDec, JackError> {
    cursor.expect_keyword(Keyword::Var)?;
    let var_type = parse_type(cursor)?;
    let mut names = vec![cursor.expect_identifier()?];
    while cursor.is_symbol(',') {
        cursor.advance();
        names.push(cursor.expect_identifier()?);
    }
    cursor.expect_symbol(';')?;
    Ok(VarDec { var_type, names })
}

fn parse_statements(cursor: &mut Cursor) -> Result<Vec<Statement>, JackError> {
    let mut statements = Vec::new();
    loop {
        let statement = match cursor.peek().kind {
            TokenKind::Keyword(Keyword::Let) => parse_let(cursor)?,
            TokenKind::Keyword(Keyword::If) => parse_if(cursor)?,
            TokenKind::Keyword(Keyword::While) => parse_while(cursor)?,
            TokenKind::Keyword(Keyword::Do) => parse_do(cursor)?,
            TokenKind::Keyword(Keyword::Return) => parse_return(cursor)?,
            _ => break,
        };
        statements.push(statement);
    }
    Ok(statements)
}

fn parse_let(cursor: &mut Cursor) -> Result<Statement, JackError> {
    cursor.expect_keyword(Keyword::Let)?;
    let name = cursor.expect_identifier()?;

    let index = if cursor.is_symbol('[') {
        cursor.advance();
        let expr = parse_expression(cursor)?;
        cursor.expect_symbol(']')?;
        Some(expr)
    } else {
        None
    };

    cursor.expect_symbol('=')?;
    let value = parse_expression(cursor)?;
    cursor.expect_symbol(';')?;

    Ok(Statement::Let { name, index, value })
}

fn parse_if(cursor: &mut Cursor) -> Result<Statement, JackError> {
    cursor.expect_keyword(Keyword::If)?;
    cursor.expect_symbol('(')?;
    let condition = parse_expression(cursor)?;
    cursor.expect_symbol(')')?;
    cursor.expect_symbol('{')?;
    let then_branch = parse_statements(cursor)?;
    cursor.expect_symbol('}')?;

    let else_branch = if cursor.is_keyword(Keyword::Else) {
        cursor.advance();
        cursor.expect_symbol('{')?;
        let statements = parse_statements(cursor)?;
        cursor.expect_symbol('}')?;
        Some(statements)
    } else {
        None
    };

    Ok(Statement::If { condition, then_branch, else_branch })
}

fn parse_while(cursor: &mut Cursor) -> Result<Statement, JackError> {
    cursor.expect_keyword(Keyword::While)?;
    cursor.expect_symbol('(')?;
    let condition = parse_expression(cursor)?;
    cursor.expect_symbol(')')?;
    cursor.expect_symbol('{')?;
    let body = parse_statements(cursor)?;
    cursor.expect_symbol('}')?;

    Ok(Statement::While { condition, body })
}

fn parse_do(cursor: &mut Cursor) -> Result<Statement, JackError> {
    cursor.expect_keyword(Keyword::Do)?;
    let call = parse_subroutine_call(cursor)?;
    cursor.expect_symbol(';')?;
    Ok(Statement::Do(call))
}

fn parse_return(cursor: &mut Cursor) -> Result<Statement, JackError> {
    cursor.expect_keyword(Keyword::Return)?;
    let value = if cursor.is_symbol(';') {
        None
    } else {
        Some(parse_expression(cursor)?)
    };
    cursor.expect_symbol(';')?;
    Ok(Statement::Return(value))
}

fn parse_expression(cursor: &mut Cursor) -> Result<Expression, JackError> {
    let first = Box::new(parse_term(cursor)?);
    let mut rest = Vec::new();

    while let TokenKind::Symbol(c) = cursor.peek().kind {
        let Some(op) = BinOp::from_symbol(c) else { break };
        cursor.advance();
        rest.push((op, parse_term(cursor)?));
    }

    Ok(Expression { first, rest })
}

fn parse_expression_list(cursor: &mut Cursor) -> Result<Vec<Expression>, JackError> {
    let mut exprs = Vec::new();
    if cursor.is_symbol(')') {
        return Ok(exprs);
    }
    loop {
        exprs.push(parse_expression(cursor)?);
        if cursor.is_symbol(',') {
            cursor.advance();
        } else {
            break;
        }
    }
    Ok(exprs)
}

fn parse_term(cursor: &mut Cursor) -> Result<Term, JackError> {
    match cursor.peek().kind.clone() {
        TokenKind::IntegerConstant(n) => {
            cursor.advance();
            Ok(Term::IntegerConstant(n))
        }
        TokenKind::StringConstant(s) => {
            cursor.advance();
            Ok(Term::StringConstant(s))
        }
        TokenKind::Keyword(Keyword::True) => {
            cursor.advance();
            Ok(Term::KeywordConstant(KeywordConstant::True))
        }
        TokenKind::Keyword(Keyword::False) => {
            cursor.advance();
            Ok(Term::KeywordConstant(KeywordConstant::False))
        }
        TokenKind::Keyword(Keyword::Null) => {
            cursor.advance();
            Ok(Term::KeywordConstant(KeywordConstant::Null))
        }
        TokenKind::Keyword(Keyword::This) => {
            cursor.advance();
            Ok(Term::KeywordConstant(KeywordConstant::This))
        }
        TokenKind::Symbol('(') => {
            cursor.advance();
            let expr = parse_expression(cursor)?;
            cursor.expect_symbol(')')?;
            Ok(Term::Paren(Box::new(expr)))
        }
        TokenKind::Symbol('-') => {
            cursor.advance();
            Ok(Term::Unary(UnaryOp::Neg, Box::new(parse_term(cursor)?)))
        }
        TokenKind::Symbol('~') => {
            cursor.advance();
            Ok(Term::Unary(UnaryOp::Not, Box::new(parse_term(cursor)?)))
        }
        TokenKind::Identifier(name) => {
            // Two-token lookahead disambiguates varName / varName[...] /
            // subroutineCall (spec §4.4, §9) without consuming `name`.
            match cursor.peek_at(1).kind {
                TokenKind::Symbol('[') => {
                    cursor.advance();
                    cursor.advance();
                    let index = parse_expression(cursor)?;
                    cursor.expect_symbol(']')?;
                    Ok(Term::ArrayAccess { name, index: Box::new(index) })
                }
                TokenKind::Symbol('(') | TokenKind::Symbol('.') => {
                    Ok(Term::Call(parse_subroutine_call(cursor)?))
                }
                _ => {
                    cursor.advance();
                    Ok(Term::Var(name))
                }
            }
        }
        _ => Err(cursor.unexpected("a term")),
    }
}

fn parse_subroutine_call(cursor: &mut Cursor) -> Result<SubroutineCall, JackError> {
    let first = cursor.expect_identifier()?;

    let (receiver, name) = if cursor.is_symbol('.') {
        cursor.advance();
        let method = cursor.expect_identifier()?;
        (Some(first), method)
    } else {
        (None, first)
    };

    cursor.expect_symbol('(')?;
    let args = parse_expression_list(cursor)?;
    cursor.expect_symbol(')')?;

    Ok(SubroutineCall { receiver, name, args })
}
