use std::collections::HashSet;

fn known(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn analyzer_round_trips_an_empty_class() {
    let xml = jack::analyze("class Main {}").expect("analyzes");
    assert_eq!(
        xml,
        "<class>\n  <keyword> class </keyword>\n  <identifier> Main </identifier>\n  <symbol> { </symbol>\n  <symbol> } </symbol>\n</class>\n"
    );
}

#[test]
fn analyzer_escapes_angle_brackets_and_ampersand_in_symbols() {
    let xml = jack::analyze(
        "class Main {
            function void run() {
                var boolean b;
                let b = (1 < 2) & (2 > 1);
                return;
            }
        }",
    )
    .expect("analyzes");
    assert!(xml.contains("&lt;"));
    assert!(xml.contains("&gt;"));
    assert!(xml.contains("&amp;"));
    assert!(!xml.contains("< 2"));
}

#[test]
fn analyzer_emits_empty_parameter_list_tag() {
    let xml = jack::analyze("class Main { function void run() { return; } }").expect("analyzes");
    assert!(xml.contains("<parameterList>\n"));
    assert!(xml.contains("</parameterList>\n"));
}

#[test]
fn analyzer_omits_expression_tag_for_bare_return() {
    let xml = jack::analyze("class Main { function void run() { return; } }").expect("analyzes");
    assert!(!xml.contains("<expression>"));
}

#[test]
fn analyzer_reports_fatal_error_on_missing_closing_brace() {
    let err = jack::analyze("class Main {").unwrap_err();
    assert_eq!(err.kind, jack::error::ErrorKind::UnexpectedToken);
}

// S4 — Sys.init calls Foo.mul(3, 4), Foo.mul multiplies its two
// arguments through Math.multiply and returns; the calling convention is
// exercised end to end by compiling both classes and handing the result
// to the VM translator.
#[test]
fn compiled_call_chain_uses_math_multiply_and_returns_one_value() {
    let foo = "class Foo {
        function int mul(int a, int b) {
            return a * b;
        }
    }";
    let sys = "class Sys {
        function void init() {
            do Foo.mul(3, 4);
            return;
        }
    }";
    let classes = known(&["Foo", "Sys"]);
    let foo_vm = jack::compile(foo, &classes).expect("compiles");
    let sys_vm = jack::compile(sys, &classes).expect("compiles");

    assert!(foo_vm.contains("call Math.multiply 2"));
    assert!(sys_vm.contains("call Foo.mul 2"));

    let foo_lexed = vm_translator::lexer::tokenize(&foo_vm);
    let foo_parsed = vm_translator::parser::parse_lines(&foo_lexed.tokens);
    assert!(foo_parsed.errors.is_empty());
}

#[test]
fn unknown_receiver_surfaces_as_compile_error() {
    let source = "class Main {
        function void run() {
            do NoSuchClass.thing();
            return;
        }
    }";
    let err = jack::compile(source, &HashSet::new()).unwrap_err();
    assert_eq!(err.kind, jack::error::ErrorKind::UnexpectedToken);
}

#[test]
fn directory_mode_file_stems_become_known_classes() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("Ball.jack"),
        "class Ball { function void move() { return; } }",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Main.jack"),
        "class Main { function void run() { do Ball.move(); return; } }",
    )
    .unwrap();

    let mut stems: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("jack"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    stems.sort();
    let classes: HashSet<String> = stems.into_iter().collect();

    let main_source = std::fs::read_to_string(dir.path().join("Main.jack")).unwrap();
    let vm = jack::compile(&main_source, &classes).expect("compiles");
    assert!(vm.contains("call Ball.move 0"));
}
