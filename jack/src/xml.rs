//! # XML Serializer
//!
//! Renders a parsed [`crate::parser::ast::Class`] as the indented XML the
//! syntax analyzer emits (spec §3 "Parse tree"). Kept separate from the
//! parser itself per the design notes: the tree is the one source of
//! truth, XML is one of two things you can do with it (the other being
//! `codegen`).
//!
//! Leaf tags follow the reference analyzer's `<tag> value </tag>` shape
//! (one space padding either side), two-space indent per nesting level,
//! with `<`, `>`, `&` escaped inside symbol values.

use crate::parser::ast::*;

pub fn render(class: &Class) -> String {
    let mut out = String::new();
    write_class(&mut out, class, 0);
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn open(out: &mut String, level: usize, tag: &str) {
    indent(out, level);
    out.push('<');
    out.push_str(tag);
    out.push_str(">\n");
}

fn close(out: &mut String, level: usize, tag: &str) {
    indent(out, level);
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn leaf(out: &mut String, level: usize, tag: &str, value: &str) {
    indent(out, level);
    out.push('<');
    out.push_str(tag);
    out.push_str("> ");
    out.push_str(&escape(value));
    out.push_str(" </");
    out.push_str(tag);
    out.push_str(">\n");
}

fn escape(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn keyword(out: &mut String, level: usize, word: &str) {
    leaf(out, level, "keyword", word);
}

fn symbol(out: &mut String, level: usize, c: char) {
    leaf(out, level, "symbol", &c.to_string());
}

fn identifier(out: &mut String, level: usize, name: &str) {
    leaf(out, level, "identifier", name);
}

fn write_type(out: &mut String, level: usize, t: &Type) {
    match t {
        Type::Int | Type::Char | Type::Boolean => keyword(out, level, t.name()),
        Type::Class(name) => identifier(out, level, name),
    }
}

fn write_class(out: &mut String, class: &Class, level: usize) {
    open(out, level, "class");
    let l = level + 1;
    keyword(out, l, "class");
    identifier(out, l, &class.name);
    symbol(out, l, '{');
    for var_dec in &class.var_decs {
        write_class_var_dec(out, var_dec, l);
    }
    for sub in &class.subroutines {
        write_subroutine_dec(out, sub, l);
    }
    symbol(out, l, '}');
    close(out, level, "class");
}

fn write_class_var_dec(out: &mut String, dec: &ClassVarDec, level: usize) {
    open(out, level, "classVarDec");
    let l = level + 1;
    keyword(out, l, if dec.kind == ClassVarKind::Static { "static" } else { "field" });
    write_type(out, l, &dec.var_type);
    write_name_list(out, &dec.names, l);
    symbol(out, l, ';');
    close(out, level, "classVarDec");
}

fn write_name_list(out: &mut String, names: &[String], level: usize) {
    let mut first = true;
    for name in names {
        if !first {
            symbol(out, level, ',');
        }
        identifier(out, level, name);
        first = false;
    }
}

fn write_subroutine_dec(out: &mut String, sub: &SubroutineDec, level: usize) {
    open(out, level, "subroutineDec");
    let l = level + 1;
    keyword(out, l, subroutine_kind_str(sub.kind));
    match &sub.return_type {
        Some(t) => write_type(out, l, t),
        None => keyword(out, l, "void"),
    }
    identifier(out, l, &sub.name);
    symbol(out, l, '(');
    write_parameter_list(out, &sub.params, l);
    symbol(out, l, ')');
    write_subroutine_body(out, &sub.body, l);
    close(out, level, "subroutineDec");
}

fn subroutine_kind_str(kind: SubroutineKind) -> &'static str {
    match kind {
        SubroutineKind::Constructor => "constructor",
        SubroutineKind::Function => "function",
        SubroutineKind::Method => "method",
    }
}

fn write_parameter_list(out: &mut String, params: &[Param], level: usize) {
    open(out, level, "parameterList");
    let l = level + 1;
    let mut first = true;
    for param in params {
        if !first {
            symbol(out, l, ',');
        }
        write_type(out, l, &param.param_type);
        identifier(out, l, &param.name);
        first = false;
    }
    close(out, level, "parameterList");
}

fn write_subroutine_body(out: &mut String, body: &SubroutineBody, level: usize) {
    open(out, level, "subroutineBody");
    let l = level + 1;
    symbol(out, l, '{');
    for var_dec in &body.var_decs {
        write_var_dec(out, var_dec, l);
    }
    write_statements(out, &body.statements, l);
    symbol(out, l, '}');
    close(out, level, "subroutineBody");
}

fn write_var_dec(out: &mut String, dec: &VarDec, level: usize) {
    open(out, level, "varDec");
    let l = level + 1;
    keyword(out, l, "var");
    write_type(out, l, &dec.var_type);
    write_name_list(out, &dec.names, l);
    symbol(out, l, ';');
    close(out, level, "varDec");
}

fn write_statements(out: &mut String, statements: &[Statement], level: usize) {
    open(out, level, "statements");
    let l = level + 1;
    for statement in statements {
        write_statement(out, statement, l);
    }
    close(out, level, "statements");
}

fn write_statement(out: &mut String, statement: &Statement, level: usize) {
    match statement {
        Statement::Let { name, index, value } => write_let(out, name, index.as_ref(), value, level),
        Statement::If { condition, then_branch, else_branch } => {
            write_if(out, condition, then_branch, else_branch.as_deref(), level)
        }
        Statement::While { condition, body } => write_while(out, condition, body, level),
        Statement::Do(call) => write_do(out, call, level),
        Statement::Return(value) => write_return(out, value.as_ref(), level),
    }
}

fn write_let(out: &mut String, name: &str, index: Option<&Expression>, value: &Expression, level: usize) {
    open(out, level, "letStatement");
    let l = level + 1;
    keyword(out, l, "let");
    identifier(out, l, name);
    if let Some(index) = index {
        symbol(out, l, '[');
        write_expression(out, index, l);
        symbol(out, l, ']');
    }
    symbol(out, l, '=');
    write_expression(out, value, l);
    symbol(out, l, ';');
    close(out, level, "letStatement");
}

fn write_if(
    out: &mut String,
    condition: &Expression,
    then_branch: &[Statement],
    else_branch: Option<&[Statement]>,
    level: usize,
) {
    open(out, level, "ifStatement");
    let l = level + 1;
    keyword(out, l, "if");
    symbol(out, l, '(');
    write_expression(out, condition, l);
    symbol(out, l, ')');
    symbol(out, l, '{');
    write_statements(out, then_branch, l);
    symbol(out, l, '}');
    if let Some(else_branch) = else_branch {
        keyword(out, l, "else");
        symbol(out, l, '{');
        write_statements(out, else_branch, l);
        symbol(out, l, '}');
    }
    close(out, level, "ifStatement");
}

fn write_while(out: &mut String, condition: &Expression, body: &[Statement], level: usize) {
    open(out, level, "whileStatement");
    let l = level + 1;
    keyword(out, l, "while");
    symbol(out, l, '(');
    write_expression(out, condition, l);
    symbol(out, l, ')');
    symbol(out, l, '{');
    write_statements(out, body, l);
    symbol(out, l, '}');
    close(out, level, "whileStatement");
}

fn write_do(out: &mut String, call: &SubroutineCall, level: usize) {
    open(out, level, "doStatement");
    let l = level + 1;
    keyword(out, l, "do");
    write_subroutine_call(out, call, l);
    symbol(out, l, ';');
    close(out, level, "doStatement");
}

/// `return;` (no expression) omits the `<expression>` child entirely
/// rather than emitting an empty one (spec §8 boundary behavior).
fn write_return(out: &mut String, value: Option<&Expression>, level: usize) {
    open(out, level, "returnStatement");
    let l = level + 1;
    keyword(out, l, "return");
    if let Some(value) = value {
        write_expression(out, value, l);
    }
    symbol(out, l, ';');
    close(out, level, "returnStatement");
}

fn write_expression(out: &mut String, expr: &Expression, level: usize) {
    open(out, level, "expression");
    let l = level + 1;
    write_term(out, &expr.first, l);
    for (op, term) in &expr.rest {
        symbol(out, l, op.symbol());
        write_term(out, term, l);
    }
    close(out, level, "expression");
}

fn write_expression_list(out: &mut String, exprs: &[Expression], level: usize) {
    open(out, level, "expressionList");
    let l = level + 1;
    let mut first = true;
    for expr in exprs {
        if !first {
            symbol(out, l, ',');
        }
        write_expression(out, expr, l);
        first = false;
    }
    close(out, level, "expressionList");
}

fn write_term(out: &mut String, term: &Term, level: usize) {
    open(out, level, "term");
    let l = level + 1;
    match term {
        Term::IntegerConstant(n) => leaf(out, l, "integerConstant", &n.to_string()),
        Term::StringConstant(s) => leaf(out, l, "stringConstant", s),
        Term::KeywordConstant(k) => keyword(out, l, keyword_constant_str(*k)),
        Term::Var(name) => identifier(out, l, name),
        Term::ArrayAccess { name, index } => {
            identifier(out, l, name);
            symbol(out, l, '[');
            write_expression(out, index, l);
            symbol(out, l, ']');
        }
        Term::Call(call) => write_subroutine_call(out, call, l),
        Term::Paren(inner) => {
            symbol(out, l, '(');
            write_expression(out, inner, l);
            symbol(out, l, ')');
        }
        Term::Unary(op, inner) => {
            symbol(out, l, op.symbol());
            write_term(out, inner, l);
        }
    }
    close(out, level, "term");
}

fn keyword_constant_str(k: KeywordConstant) -> &'static str {
    match k {
        KeywordConstant::True => "true",
        KeywordConstant::False => "false",
        KeywordConstant::Null => "null",
        KeywordConstant::This => "this",
    }
}

fn write_subroutine_call(out: &mut String, call: &SubroutineCall, level: usize) {
    if let Some(receiver) = &call.receiver {
        identifier(out, level, receiver);
        symbol(out, level, '.');
    }
    identifier(out, level, &call.name);
    symbol(out, level, '(');
    write_expression_list(out, &call.args, level);
    symbol(out, level, ')');
}
