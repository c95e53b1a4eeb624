//! # Jack → VM Code Generator
//!
//! Walks the same [`crate::parser::ast::Class`] the XML serializer walks,
//! this time against a [`crate::symbol_table`] instead of just printing
//! tags (spec §4.5). Reuses the parser's grammar skeleton but emits VM
//! instructions at each production instead of building a tree.
//!
//! Scope stacking (spec §4.6, §9): persistent state — the class symbol
//! table, the per-subroutine symbol table, and the `if`/`while` label
//! counters — all live as fields on [`ClassCompiler`] mutated through
//! `&mut self`, so nested `if`/`while`/expression compiles see counter
//! bumps from their children without any manual snapshot/restore. There
//! is no separate transient `ExprCtx`: nothing compiled here needs
//! child-only state beyond ordinary Rust locals (e.g. an `if`'s captured
//! label index), which already fall out of scope on their own — seeded
//! by the "re-architect as two explicit structures" design note but
//! simplified down to one, documented in DESIGN.md.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::error::{JackError, Span};
use crate::parser::ast::*;
use crate::symbol_table::{resolve, ClassScope, Segment, SubroutineScope};

/// Class names outside the compilation unit that Jack programs may call
/// into without ever compiling their source — the standard OS library
/// (spec §4.5 term table references `Math.multiply`/`Math.divide`
/// directly; the rest show up through ordinary `do`/call terms).
const OS_CLASSES: &[&str] = &["Math", "String", "Array", "Output", "Screen", "Keyboard", "Memory", "Sys"];

pub struct ClassCompiler<'a> {
    class_name: String,
    class_scope: ClassScope,
    known_classes: &'a HashSet<String>,
    scope: SubroutineScope,
    if_counter: u32,
    while_counter: u32,
    lines: Vec<String>,
}

/// Compiles one Jack class into VM instructions (spec §4.5). `known_classes`
/// is the full sibling class name list for the compilation unit (spec §8
/// invariant 5's "list of sibling class names", carried into codegen per
/// the supplement grounded on `compiler.py`'s `existing_classes`
/// threading) — used only to validate an unresolved call receiver really
/// names a class rather than a typo'd variable.
#[must_use]
pub fn compile_class(class: &Class, known_classes: &HashSet<String>) -> Result<String, JackError> {
    let mut compiler = ClassCompiler {
        class_name: class.name.clone(),
        class_scope: ClassScope::default(),
        known_classes,
        scope: SubroutineScope::default(),
        if_counter: 0,
        while_counter: 0,
        lines: Vec::new(),
    };

    for var_dec in &class.var_decs {
        let segment = match var_dec.kind {
            ClassVarKind::Static => Segment::Static,
            ClassVarKind::Field => Segment::Field,
        };
        for name in &var_dec.names {
            compiler.class_scope.define(name, var_dec.var_type.clone(), segment);
        }
    }

    for sub in &class.subroutines {
        compiler.compile_subroutine(sub)?;
    }

    Ok(compiler.lines.join("\n") + "\n")
}

impl<'a> ClassCompiler<'a> {
    fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn emit_push(&mut self, segment: &str, index: u16) {
        self.emit(format!("push {segment} {index}"));
    }

    fn emit_pop(&mut self, segment: &str, index: u16) {
        self.emit(format!("pop {segment} {index}"));
    }

    /// Subroutine prologue (spec §4.5 "Subroutine prologue"): reset
    /// subroutine scope and the label counters, register `this` /
    /// parameters / locals, emit `function C.f N`, then the
    /// constructor/method allocation preamble.
    fn compile_subroutine(&mut self, sub: &SubroutineDec) -> Result<(), JackError> {
        self.scope = SubroutineScope::default();
        self.if_counter = 0;
        self.while_counter = 0;

        if sub.kind == SubroutineKind::Method {
            self.scope.define("this", Type::Class(self.class_name.clone()), Segment::Argument);
        }
        for param in &sub.params {
            self.scope.define(&param.name, param.param_type.clone(), Segment::Argument);
        }
        for var_dec in &sub.body.var_decs {
            for name in &var_dec.names {
                self.scope.define(name, var_dec.var_type.clone(), Segment::Local);
            }
        }

        let n_locals = self.scope.local_count();
        self.emit(format!("function {}.{} {n_locals}", self.class_name, sub.name));

        match sub.kind {
            SubroutineKind::Constructor => {
                self.emit_push("constant", self.class_scope.field_count());
                self.emit("call Memory.alloc 1");
                self.emit_pop("pointer", 0);
            }
            SubroutineKind::Method => {
                self.emit_push("argument", 0);
                self.emit_pop("pointer", 0);
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements(&sub.body.statements)
    }

    fn compile_statements(&mut self, statements: &[Statement]) -> Result<(), JackError> {
        for statement in statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), JackError> {
        match statement {
            Statement::Let { name, index, value } => self.compile_let(name, index.as_ref(), value),
            Statement::If { condition, then_branch, else_branch } => {
                self.compile_if(condition, then_branch, else_branch.as_deref())
            }
            Statement::While { condition, body } => self.compile_while(condition, body),
            Statement::Do(call) => self.compile_do(call),
            Statement::Return(value) => self.compile_return(value.as_ref()),
        }
    }

    /// `let v = e;` pops straight into `v`'s segment/index. `let v[i] = e;`
    /// computes the destination address first, evaluates `e`, then uses
    /// `temp 0` as scratch so the RHS can reference `that`/array contents
    /// without the address computation clobbering `THAT` underneath it
    /// (spec §4.5 "let statement", §9 Open Question (b)).
    fn compile_let(&mut self, name: &str, index: Option<&Expression>, value: &Expression) -> Result<(), JackError> {
        let entry = self.lookup(name)?;

        match index {
            None => {
                self.compile_expression(value)?;
                self.emit_pop(entry.segment.vm_segment(), entry.index);
            }
            Some(index_expr) => {
                self.emit_push(entry.segment.vm_segment(), entry.index);
                self.compile_expression(index_expr)?;
                self.emit("add");
                self.compile_expression(value)?;
                self.emit_pop("temp", 0);
                self.emit_pop("pointer", 1);
                self.emit_push("temp", 0);
                self.emit_pop("that", 0);
            }
        }
        Ok(())
    }

    /// Label suffix `k` comes from `if_counter` and is shared by the three
    /// labels of this statement; `IF_END`/the second `goto` are only
    /// emitted when an `else` branch follows (spec §4.5 "if statement").
    fn compile_if(
        &mut self,
        condition: &Expression,
        then_branch: &[Statement],
        else_branch: Option<&[Statement]>,
    ) -> Result<(), JackError> {
        let k = self.if_counter;
        self.if_counter += 1;

        self.compile_expression(condition)?;
        self.emit(format!("if-goto IF_TRUE{k}"));
        self.emit(format!("goto IF_FALSE{k}"));
        self.emit(format!("label IF_TRUE{k}"));
        self.compile_statements(then_branch)?;

        match else_branch {
            Some(else_branch) => {
                self.emit(format!("goto IF_END{k}"));
                self.emit(format!("label IF_FALSE{k}"));
                self.compile_statements(else_branch)?;
                self.emit(format!("label IF_END{k}"));
            }
            None => {
                self.emit(format!("label IF_FALSE{k}"));
            }
        }
        Ok(())
    }

    fn compile_while(&mut self, condition: &Expression, body: &[Statement]) -> Result<(), JackError> {
        let k = self.while_counter;
        self.while_counter += 1;

        self.emit(format!("label WHILE_EXP{k}"));
        self.compile_expression(condition)?;
        self.emit("not");
        self.emit(format!("if-goto WHILE_END{k}"));
        self.compile_statements(body)?;
        self.emit(format!("goto WHILE_EXP{k}"));
        self.emit(format!("label WHILE_END{k}"));
        Ok(())
    }

    fn compile_do(&mut self, call: &SubroutineCall) -> Result<(), JackError> {
        self.compile_call(call)?;
        self.emit_pop("temp", 0);
        Ok(())
    }

    /// `return;` in a `void` subroutine still needs a value on the stack
    /// for the caller to discard, so it pushes `constant 0` first (spec
    /// §4.5 "return statement", §8 boundary behavior).
    fn compile_return(&mut self, value: Option<&Expression>) -> Result<(), JackError> {
        match value {
            Some(expr) => self.compile_expression(expr)?,
            None => self.emit_push("constant", 0),
        }
        self.emit("return");
        Ok(())
    }

    /// Flat left-to-right evaluation, no operator precedence (spec §4.5
    /// "Expressions"): each operator's two operands are both emitted
    /// before the operator itself.
    fn compile_expression(&mut self, expr: &Expression) -> Result<(), JackError> {
        self.compile_term(&expr.first)?;
        for (op, term) in &expr.rest {
            self.compile_term(term)?;
            self.emit(op_instruction(*op));
        }
        Ok(())
    }

    fn compile_term(&mut self, term: &Term) -> Result<(), JackError> {
        match term {
            Term::IntegerConstant(n) => self.emit_push("constant", *n),
            Term::StringConstant(s) => self.compile_string_constant(s),
            Term::KeywordConstant(KeywordConstant::True) => {
                self.emit_push("constant", 0);
                self.emit("not");
            }
            Term::KeywordConstant(KeywordConstant::False) | Term::KeywordConstant(KeywordConstant::Null) => {
                self.emit_push("constant", 0);
            }
            Term::KeywordConstant(KeywordConstant::This) => self.emit_push("pointer", 0),
            Term::Var(name) => {
                let entry = self.lookup(name)?;
                self.emit_push(entry.segment.vm_segment(), entry.index);
            }
            Term::ArrayAccess { name, index } => {
                let entry = self.lookup(name)?;
                self.emit_push(entry.segment.vm_segment(), entry.index);
                self.compile_expression(index)?;
                self.emit("add");
                self.emit_pop("pointer", 1);
                self.emit_push("that", 0);
            }
            Term::Call(call) => self.compile_call(call)?,
            Term::Paren(inner) => self.compile_expression(inner)?,
            Term::Unary(op, inner) => {
                self.compile_term(inner)?;
                self.emit(match op {
                    UnaryOp::Neg => "neg",
                    UnaryOp::Not => "not",
                });
            }
        }
        Ok(())
    }

    fn compile_string_constant(&mut self, s: &str) {
        self.emit_push("constant", s.chars().count() as u16);
        self.emit("call String.new 1");
        for c in s.chars() {
            self.emit_push("constant", c as u16);
            self.emit("call String.appendChar 2");
        }
    }

    /// `name(args)` is an implicit `this` method call; `X.name(args)`
    /// resolves `X` as a variable (method on its type) first and falls
    /// back to treating it as a class name (spec §4.5 "Subroutine calls").
    fn compile_call(&mut self, call: &SubroutineCall) -> Result<(), JackError> {
        match &call.receiver {
            None => {
                self.emit_push("pointer", 0);
                for arg in &call.args {
                    self.compile_expression(arg)?;
                }
                self.emit(format!("call {}.{} {}", self.class_name, call.name, call.args.len() + 1));
            }
            Some(receiver) => {
                if let Some(entry) = self.scope.lookup(receiver).or_else(|| self.class_scope.lookup(receiver)) {
                    let segment = entry.segment.vm_segment();
                    let index = entry.index;
                    let type_name = entry.var_type.name().to_string();
                    self.emit_push(segment, index);
                    for arg in &call.args {
                        self.compile_expression(arg)?;
                    }
                    self.emit(format!("call {}.{} {}", type_name, call.name, call.args.len() + 1));
                } else if self.known_classes.contains(receiver) || OS_CLASSES.contains(&receiver.as_str()) {
                    for arg in &call.args {
                        self.compile_expression(arg)?;
                    }
                    self.emit(format!("call {}.{} {}", receiver, call.name, call.args.len()));
                } else {
                    return Err(JackError::unknown_class(receiver, Span::default()));
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<crate::symbol_table::SymbolEntry, JackError> {
        resolve(&self.scope, &self.class_scope, name)
            .cloned()
            .ok_or_else(|| JackError::unknown_variable(name, Span::default()))
    }
}

fn op_instruction(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "add",
        BinOp::Sub => "sub",
        BinOp::Mul => "call Math.multiply 2",
        BinOp::Div => "call Math.divide 2",
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::Lt => "lt",
        BinOp::Gt => "gt",
        BinOp::Eq => "eq",
    }
}
