use super::*;
use crate::lexer::tokenize;
use crate::parser::parse;

fn compile_source(source: &str, known_classes: &[&str]) -> Vec<String> {
    let lexed = tokenize(source);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let parsed = parse(&lexed.tokens);
    assert!(parsed.error.is_none(), "parse error: {:?}", parsed.error);
    let class = parsed.class.unwrap();
    let known: HashSet<String> = known_classes.iter().map(|s| s.to_string()).collect();
    let vm = compile_class(&class, &known).expect("compiles");
    vm.lines().map(str::to_string).collect()
}

/// S5 — constructor prologue + field assignment + `push pointer 0 ; return`.
#[test]
fn constructor_allocates_and_stores_fields() {
    let lines = compile_source(
        "class Point {
            field int x, y;
            constructor Point new(int ax, int ay) {
                let x = ax;
                let y = ay;
                return this;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push pointer 0",
            "return",
        ]
    );
}

#[test]
fn method_prologue_binds_this_and_implicit_argument_zero() {
    let lines = compile_source(
        "class Point {
            field int x;
            method int getX() {
                return x;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Point.getX 0",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "return",
        ]
    );
}

/// S6 — array store: `let a[i+1] = a[j] + 1;`.
#[test]
fn array_store_uses_temp_0_scratch_trick() {
    let lines = compile_source(
        "class Main {
            function void run() {
                var Array a;
                var int i, j;
                let a[i + 1] = a[j] + 1;
                return;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 3",
            "push local 0",
            "push local 1",
            "push constant 1",
            "add",
            "add",
            "push local 0",
            "push local 2",
            "add",
            "pop pointer 1",
            "push that 0",
            "push constant 1",
            "add",
            "pop temp 0",
            "pop pointer 1",
            "push temp 0",
            "pop that 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn if_without_else_omits_end_label() {
    let lines = compile_source(
        "class Main {
            function void run() {
                if (true) {
                    return;
                }
                return;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 0",
            "push constant 0",
            "not",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push constant 0",
            "return",
            "label IF_FALSE0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn if_with_else_emits_join_label() {
    let lines = compile_source(
        "class Main {
            function void run() {
                if (false) {
                    return;
                } else {
                    return;
                }
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 0",
            "push constant 0",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push constant 0",
            "return",
            "goto IF_END0",
            "label IF_FALSE0",
            "push constant 0",
            "return",
            "label IF_END0",
        ]
    );
}

#[test]
fn while_loop_shape() {
    let lines = compile_source(
        "class Main {
            function void run() {
                var boolean done;
                while (done) {
                    let done = false;
                }
                return;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 1",
            "label WHILE_EXP0",
            "push local 0",
            "not",
            "if-goto WHILE_END0",
            "push constant 0",
            "pop local 0",
            "goto WHILE_EXP0",
            "label WHILE_END0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn string_constant_builds_char_by_char() {
    let lines = compile_source(
        "class Main {
            function void run() {
                do Output.printString(\"hi\");
                return;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 0",
            "push constant 2",
            "call String.new 1",
            "push constant 104",
            "call String.appendChar 2",
            "push constant 105",
            "call String.appendChar 2",
            "call Output.printString 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn multiply_and_divide_compile_to_math_calls() {
    let lines = compile_source(
        "class Main {
            function int run() {
                return 2 * 3 / 4;
            }
        }",
        &[],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 0",
            "push constant 2",
            "push constant 3",
            "call Math.multiply 2",
            "push constant 4",
            "call Math.divide 2",
            "return",
        ]
    );
}

#[test]
fn method_call_on_known_variable_uses_its_declared_type() {
    let lines = compile_source(
        "class Main {
            function void run() {
                var Point p;
                do p.dispose();
                return;
            }
        }",
        &["Point"],
    );
    assert_eq!(
        lines,
        vec![
            "function Main.run 1",
            "push local 0",
            "call Point.dispose 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn call_on_unknown_receiver_is_a_compile_error() {
    let lexed = tokenize(
        "class Main {
            function void run() {
                do Bogus.thing();
                return;
            }
        }",
    );
    let parsed = parse(&lexed.tokens);
    let class = parsed.class.unwrap();
    let known = HashSet::new();
    let err = compile_class(&class, &known).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::UnexpectedToken);
}
