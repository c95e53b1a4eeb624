use super::ast::{Command, Segment};
use super::*;
use crate::lexer::tokenize;

fn parse(source: &str) -> ParseResult {
    let lexed = tokenize(source);
    assert!(lexed.errors.is_empty(), "lexer errors: {:?}", lexed.errors);
    parse_lines(&lexed.tokens)
}

#[test]
fn parses_push_constant() {
    let result = parse("push constant 7\n");
    assert!(result.errors.is_empty());
    assert_eq!(
        result.lines[0].command,
        Command::Push {
            segment: Segment::Constant,
            index: 7,
        }
    );
}

#[test]
fn parses_pop_local() {
    let result = parse("pop local 2\n");
    assert!(result.errors.is_empty());
    assert_eq!(
        result.lines[0].command,
        Command::Pop {
            segment: Segment::Local,
            index: 2,
        }
    );
}

#[test]
fn rejects_pop_to_constant() {
    let result = parse("pop constant 0\n");
    assert!(!result.errors.is_empty());
}

#[test]
fn parses_arithmetic_verbs() {
    let result = parse("add\nsub\nneg\neq\ngt\nlt\nand\nor\nnot\n");
    assert!(result.errors.is_empty());
    assert_eq!(result.lines.len(), 9);
    assert_eq!(result.lines[0].command, Command::Add);
    assert_eq!(result.lines[8].command, Command::Not);
}

#[test]
fn parses_label_goto_if_goto() {
    let result = parse("label LOOP\ngoto LOOP\nif-goto LOOP\n");
    assert!(result.errors.is_empty());
    assert_eq!(result.lines[0].command, Command::Label("LOOP".into()));
    assert_eq!(result.lines[1].command, Command::Goto("LOOP".into()));
    assert_eq!(result.lines[2].command, Command::IfGoto("LOOP".into()));
}

#[test]
fn parses_function_call_return() {
    let result = parse("function Foo.bar 2\ncall Math.multiply 2\nreturn\n");
    assert!(result.errors.is_empty());
    assert_eq!(
        result.lines[0].command,
        Command::Function {
            name: "Foo.bar".into(),
            n_locals: 2,
        }
    );
    assert_eq!(
        result.lines[1].command,
        Command::Call {
            name: "Math.multiply".into(),
            n_args: 2,
        }
    );
    assert_eq!(result.lines[2].command, Command::Return);
}

#[test]
fn rejects_unknown_segment() {
    let result = parse("push nonsense 0\n");
    assert!(!result.errors.is_empty());
}

#[test]
fn rejects_unknown_verb() {
    let result = parse("frobnicate\n");
    assert!(!result.errors.is_empty());
}

#[test]
fn blank_and_comment_only_lines_produce_no_commands() {
    let result = parse("\n// nothing\n\n");
    assert!(result.errors.is_empty());
    assert!(result.lines.is_empty());
}
