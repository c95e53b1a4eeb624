use super::*;
use crate::lexer::tokenize;

fn parse_source(source: &str) -> Class {
    let lexed = tokenize(source);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let result = parse(&lexed.tokens);
    assert!(result.error.is_none(), "parse error: {:?}", result.error);
    result.class.unwrap()
}

#[test]
fn parses_empty_class() {
    let class = parse_source("class Main {}");
    assert_eq!(class.name, "Main");
    assert!(class.var_decs.is_empty());
    assert!(class.subroutines.is_empty());
}

#[test]
fn parses_class_var_decs_with_multiple_names() {
    let class = parse_source("class Point { field int x, y; static boolean initialized; }");
    assert_eq!(class.var_decs.len(), 2);
    assert_eq!(class.var_decs[0].kind, ClassVarKind::Field);
    assert_eq!(class.var_decs[0].var_type, Type::Int);
    assert_eq!(class.var_decs[0].names, vec!["x", "y"]);
    assert_eq!(class.var_decs[1].kind, ClassVarKind::Static);
}

#[test]
fn parses_constructor_with_params_and_locals() {
    let class = parse_source(
        "class Point {
            field int x, y;
            constructor Point new(int ax, int ay) {
                var int tmp;
                let x = ax;
                let y = ay;
                return this;
            }
        }",
    );
    let sub = &class.subroutines[0];
    assert_eq!(sub.kind, SubroutineKind::Constructor);
    assert_eq!(sub.return_type, Some(Type::Class("Point".into())));
    assert_eq!(sub.params.len(), 2);
    assert_eq!(sub.body.var_decs.len(), 1);
    assert_eq!(sub.body.statements.len(), 3);
}

#[test]
fn parses_void_method_with_empty_parameter_list() {
    let class = parse_source("class Main { method void run() { return; } }");
    let sub = &class.subroutines[0];
    assert_eq!(sub.kind, SubroutineKind::Method);
    assert_eq!(sub.return_type, None);
    assert!(sub.params.is_empty());
    assert_eq!(sub.body.statements, vec![Statement::Return(None)]);
}

#[test]
fn disambiguates_term_lookahead_variants() {
    let class = parse_source(
        "class Main {
            function void run() {
                var int a;
                let a = b[1] + Foo.bar() + baz() + (1);
                return;
            }
        }",
    );
    let Statement::Let { value, .. } = &class.subroutines[0].body.statements[0] else {
        panic!("expected let statement");
    };
    assert!(matches!(*value.first, Term::ArrayAccess { .. }));
    assert_eq!(value.rest.len(), 3);
    assert!(matches!(value.rest[0].1, Term::Call(ref c) if c.receiver.as_deref() == Some("Foo")));
    assert!(matches!(value.rest[1].1, Term::Call(ref c) if c.receiver.is_none() && c.name == "baz"));
    assert!(matches!(value.rest[2].1, Term::Paren(_)));
}

#[test]
fn parses_if_without_else_and_with_else() {
    let class = parse_source(
        "class Main {
            function void run() {
                if (true) { let x = 1; }
                if (false) { let x = 2; } else { let x = 3; }
                return;
            }
        }",
    );
    let stmts = &class.subroutines[0].body.statements;
    assert!(matches!(&stmts[0], Statement::If { else_branch: None, .. }));
    assert!(matches!(&stmts[1], Statement::If { else_branch: Some(_), .. }));
}

#[test]
fn empty_parameter_and_expression_lists_parse_cleanly() {
    let class = parse_source(
        "class Main {
            function void run() {
                do Output.println();
                return;
            }
        }",
    );
    let Statement::Do(call) = &class.subroutines[0].body.statements[0] else {
        panic!("expected do statement");
    };
    assert!(call.args.is_empty());
}

#[test]
fn reports_missing_required_token_as_fatal_error() {
    let lexed = tokenize("class Main { int x; }");
    let result = parse(&lexed.tokens);
    assert!(result.class.is_none());
    assert!(result.error.is_some());
}

#[test]
fn array_store_statement_captures_both_index_expressions() {
    let class = parse_source(
        "class Main {
            function void run() {
                let a[i + 1] = a[j] + 1;
                return;
            }
        }",
    );
    let Statement::Let { name, index, value } = &class.subroutines[0].body.statements[0] else {
        panic!("expected let statement");
    };
    assert_eq!(name, "a");
    assert!(index.is_some());
    assert!(matches!(*value.first, Term::ArrayAccess { .. }));
}
