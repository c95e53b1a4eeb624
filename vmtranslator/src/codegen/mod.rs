//! # VM → Hack Assembly Code Generator
//!
//! Walks a sequence of parsed [`VmLine`]s and a per-file [`Scope`],
//! emitting one Hack assembly line per generated instruction (spec
//! §4.2). Each operation computes its own net stack-pointer delta
//! explicitly rather than relying on the blanket "bump SP after every
//! ALU op and push" rule the Python reference inherits — see
//! `translate_command`'s per-arm comments and DESIGN.md for why that
//! distinction matters.


use crate::error::VmError;
use crate::parser::ast::{Command, Segment, VmLine};

/// Per-file translation scope (spec §3 "VM translator scope"):
/// `current_function` tracks the enclosing `function X.y n` for label
/// scoping and changes on every `function` directive; the four counters
/// are scoped to that function and reset whenever it changes.
pub struct Scope {
    file_stem: String,
    current_function: String,
    call_counter: u32,
    eq_counter: u32,
    gt_counter: u32,
    lt_counter: u32,
}

impl Scope {
    pub fn new(file_stem: impl Into<String>) -> Self {
        let file_stem = file_stem.into();
        Self {
            current_function: file_stem.clone(),
            file_stem,
            call_counter: 0,
            eq_counter: 0,
            gt_counter: 0,
            lt_counter: 0,
        }
    }

    fn enter_function(&mut self, name: &str) {
        self.current_function = name.to_string();
        self.call_counter = 0;
        self.eq_counter = 0;
        self.gt_counter = 0;
        self.lt_counter = 0;
    }
}

pub struct CodegenResult {
    pub lines: Vec<String>,
    pub errors: Vec<VmError>,
}

/// Translates one VM file's instructions in order, threading `scope`
/// through so labels stay unique within (and scoped to) each function.
#[must_use]
pub fn translate_file(lines: &[VmLine], scope: &mut Scope) -> CodegenResult {
    let mut out = Vec::new();
    let errors = Vec::new();

    for line in lines {
        out.push(format!("// {}", describe(&line.command)));
        out.extend(translate_command(&line.command, scope));
    }

    CodegenResult { lines: out, errors }
}

/// Emits the bootstrap sequence (`SP = 256` then `call Sys.init 0`),
/// required first when translating a directory of VM files into one
/// concatenated assembly program (spec §4.2 "Boot sequence").
pub fn boot_sequence() -> Vec<String> {
    let mut scope = Scope::new("Boot");
    let mut lines = vec!["@256".to_string(), "D=A".to_string(), "@SP".to_string(), "M=D".to_string()];
    lines.extend(translate_command(
        &Command::Call {
            name: "Sys.init".to_string(),
            n_args: 0,
        },
        &mut scope,
    ));
    lines
}

fn describe(command: &Command) -> String {
    match command {
        Command::Push { segment, index } => format!("push {} {index}", segment_name(*segment)),
        Command::Pop { segment, index } => format!("pop {} {index}", segment_name(*segment)),
        Command::Add => "add".to_string(),
        Command::Sub => "sub".to_string(),
        Command::Neg => "neg".to_string(),
        Command::Eq => "eq".to_string(),
        Command::Gt => "gt".to_string(),
        Command::Lt => "lt".to_string(),
        Command::And => "and".to_string(),
        Command::Or => "or".to_string(),
        Command::Not => "not".to_string(),
        Command::Label(name) => format!("label {name}"),
        Command::Goto(name) => format!("goto {name}"),
        Command::IfGoto(name) => format!("if-goto {name}"),
        Command::Function { name, n_locals } => format!("function {name} {n_locals}"),
        Command::Return => "return".to_string(),
        Command::Call { name, n_args } => format!("call {name} {n_args}"),
    }
}

fn segment_name(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "local",
        Segment::Argument => "argument",
        Segment::This => "this",
        Segment::That => "that",
        Segment::Pointer => "pointer",
        Segment::Temp => "temp",
        Segment::Static => "static",
        Segment::Constant => "constant",
    }
}

fn translate_command(command: &Command, scope: &mut Scope) -> Vec<String> {
    match command {
        Command::Push { segment, index } => push(*segment, *index, scope),
        Command::Pop { segment, index } => pop(*segment, *index, scope),
        Command::Add => binary_op("D+M"),
        Command::Sub => binary_op("M-D"),
        Command::Neg => unary_op("-M"),
        Command::And => binary_op("D&M"),
        Command::Or => binary_op("D|M"),
        Command::Not => unary_op("!M"),
        Command::Eq => {
            let function = scope.current_function.clone();
            comparison("JEQ", &mut scope.eq_counter, &function)
        }
        Command::Gt => {
            let function = scope.current_function.clone();
            comparison("JGT", &mut scope.gt_counter, &function)
        }
        Command::Lt => {
            let function = scope.current_function.clone();
            comparison("JLT", &mut scope.lt_counter, &function)
        }
        Command::Label(name) => vec![format!("({}${name})", scope.current_function)],
        Command::Goto(name) => vec![format!("@{}${name}", scope.current_function), "0;JMP".to_string()],
        Command::IfGoto(name) => {
            let mut lines = dec_stack_and_point();
            lines.push("D=M".to_string());
            lines.push(format!("@{}${name}", scope.current_function));
            lines.push("D;JNE".to_string());
            lines
        }
        Command::Function { name, n_locals } => function(name, *n_locals, scope),
        Command::Return => return_sequence(),
        Command::Call { name, n_args } => call(name, *n_args, scope),
    }
}

fn at(value: impl std::fmt::Display) -> String {
    format!("@{value}")
}

fn push_d() -> Vec<String> {
    vec!["@SP".to_string(), "A=M".to_string(), "M=D".to_string()]
}

fn dec_stack() -> Vec<String> {
    vec!["@SP".to_string(), "M=M-1".to_string()]
}

fn inc_stack() -> Vec<String> {
    vec!["@SP".to_string(), "M=M+1".to_string()]
}

fn dec_stack_and_point() -> Vec<String> {
    let mut lines = dec_stack();
    lines.push("A=M".to_string());
    lines
}

/// Every binary ALU/comparison op pops two operands (two
/// `dec_stack_and_point` calls) and writes its result into the now-freed
/// slot — a net stack height of `-1`. The single trailing `inc_stack`
/// brings `SP` back to point one past that result.
fn binary_op(comp: &str) -> Vec<String> {
    let mut lines = dec_stack_and_point();
    lines.push("D=M".to_string());
    lines.extend(dec_stack_and_point());
    lines.push(format!("M={comp}"));
    lines.extend(inc_stack());
    lines
}

/// A unary op pops one operand in place (one `dec_stack_and_point`) and
/// overwrites it with the result — net stack height `0`. The trailing
/// `inc_stack` restores `SP` to its pre-op value.
fn unary_op(comp: &str) -> Vec<String> {
    let mut lines = dec_stack_and_point();
    lines.push(format!("M={comp}"));
    lines.extend(inc_stack());
    lines
}

/// `eq`/`gt`/`lt` share the same shape: compute `a - b` into `D`, assume
/// true (`-1`), jump over the "set false" branch when the `jump`
/// condition holds, otherwise overwrite with `0`. Net stack delta is the
/// same as any other binary op: `-1`, restored by the trailing
/// `inc_stack`.
fn comparison(jump: &str, counter: &mut u32, function: &str) -> Vec<String> {
    let label = format!("__{function}_{}.{counter}", jump.to_ascii_lowercase().trim_start_matches('j'));
    *counter += 1;

    let mut lines = dec_stack_and_point();
    lines.push("D=M".to_string());
    lines.extend(dec_stack_and_point());
    lines.push("D=M-D".to_string());
    lines.push("M=-1".to_string());
    lines.push(at(&label));
    lines.push(format!("D;{jump}"));
    lines.push("@SP".to_string());
    lines.push("A=M".to_string());
    lines.push("M=0".to_string());
    lines.push(format!("({label})"));
    lines.extend(inc_stack());
    lines
}

fn push(segment: Segment, index: u16, scope: &Scope) -> Vec<String> {
    let mut lines = load_segment_value_into_d(segment, index, scope);
    lines.extend(push_d());
    lines.extend(inc_stack());
    lines
}

fn load_segment_value_into_d(segment: Segment, index: u16, scope: &Scope) -> Vec<String> {
    match segment {
        Segment::Constant => vec![at(index), "D=A".to_string()],
        Segment::Local => pointed_segment_value("LCL", index),
        Segment::Argument => pointed_segment_value("ARG", index),
        Segment::This => pointed_segment_value("THIS", index),
        Segment::That => pointed_segment_value("THAT", index),
        Segment::Pointer => direct_segment_value(3, index),
        Segment::Temp => direct_segment_value(5, index),
        Segment::Static => vec![at(static_label(scope, index)), "D=M".to_string()],
    }
}

fn pointed_segment_value(base: &str, index: u16) -> Vec<String> {
    vec![at(index), "D=A".to_string(), at(base), "A=D+M".to_string(), "D=M".to_string()]
}

fn direct_segment_value(base: u16, index: u16) -> Vec<String> {
    vec![at(index), "D=A".to_string(), at(base), "A=D+A".to_string(), "D=M".to_string()]
}

fn static_label(scope: &Scope, index: u16) -> String {
    format!("{}.{index}", scope.file_stem)
}

/// `pop`'s address computation is fully separated from the value pop:
/// the destination address is resolved into `D` and parked in `R13`
/// first, `SP` is decremented and dereferenced only after that, so there
/// is no implicit dependency on `SP` staying put in between.
fn pop(segment: Segment, index: u16, scope: &Scope) -> Vec<String> {
    let mut lines = resolve_segment_address_into_d(segment, index, scope);
    lines.push(at("R13"));
    lines.push("M=D".to_string());
    lines.extend(dec_stack_and_point());
    lines.push("D=M".to_string());
    lines.push(at("R13"));
    lines.push("A=M".to_string());
    lines.push("M=D".to_string());
    lines
}

fn resolve_segment_address_into_d(segment: Segment, index: u16, scope: &Scope) -> Vec<String> {
    match segment {
        Segment::Constant => unreachable!("rejected by the parser"),
        Segment::Local => vec![at(index), "D=A".to_string(), at("LCL"), "D=D+M".to_string()],
        Segment::Argument => vec![at(index), "D=A".to_string(), at("ARG"), "D=D+M".to_string()],
        Segment::This => vec![at(index), "D=A".to_string(), at("THIS"), "D=D+M".to_string()],
        Segment::That => vec![at(index), "D=A".to_string(), at("THAT"), "D=D+M".to_string()],
        Segment::Pointer => vec![at(index), "D=A".to_string(), at(3), "D=D+A".to_string()],
        Segment::Temp => vec![at(index), "D=A".to_string(), at(5), "D=D+A".to_string()],
        Segment::Static => vec![at(static_label(scope, index)), "D=A".to_string()],
    }
}

fn function(name: &str, n_locals: u16, scope: &mut Scope) -> Vec<String> {
    scope.enter_function(name);
    let mut lines = vec![format!("({name})")];
    for _ in 0..n_locals {
        lines.push("D=0".to_string());
        lines.extend(push_d());
        lines.extend(inc_stack());
    }
    lines
}

/// Standard nand2tetris frame teardown: `R13` holds `endFrame` (a copy
/// of `LCL`), `R14` holds the return address read out of it before
/// anything else is overwritten.
fn return_sequence() -> Vec<String> {
    vec![
        at("LCL"), "D=M".to_string(), at("R13"), "M=D".to_string(),
        at(5), "A=D-A".to_string(), "D=M".to_string(), at("R14"), "M=D".to_string(),
        at("SP"), "A=M-1".to_string(), "D=M".to_string(),
        at("ARG"), "A=M".to_string(), "M=D".to_string(),
        at("ARG"), "D=M+1".to_string(), at("SP"), "M=D".to_string(),
        at("R13"), "AM=M-1".to_string(), "D=M".to_string(), at("THAT"), "M=D".to_string(),
        at("R13"), "AM=M-1".to_string(), "D=M".to_string(), at("THIS"), "M=D".to_string(),
        at("R13"), "AM=M-1".to_string(), "D=M".to_string(), at("ARG"), "M=D".to_string(),
        at("R13"), "AM=M-1".to_string(), "D=M".to_string(), at("LCL"), "M=D".to_string(),
        at("R14"), "A=M".to_string(), "0;JMP".to_string(),
    ]
}

fn call(name: &str, n_args: u16, scope: &mut Scope) -> Vec<String> {
    let ret_label = format!("{}$ret{}", scope.current_function, scope.call_counter);
    scope.call_counter += 1;

    let mut lines = vec![at(&ret_label), "D=A".to_string()];
    lines.extend(push_d());
    lines.extend(inc_stack());

    for saved in ["LCL", "ARG", "THIS", "THAT"] {
        lines.push(at(saved));
        lines.push("D=M".to_string());
        lines.extend(push_d());
        lines.extend(inc_stack());
    }

    lines.push(at("SP"));
    lines.push("D=M".to_string());
    lines.push(at(n_args as u32 + 5));
    lines.push("D=D-A".to_string());
    lines.push(at("ARG"));
    lines.push("M=D".to_string());

    lines.push(at("SP"));
    lines.push("D=M".to_string());
    lines.push(at("LCL"));
    lines.push("M=D".to_string());

    lines.push(at(name));
    lines.push("0;JMP".to_string());
    lines.push(format!("({ret_label})"));

    lines
}
