use hack_assembler::encoder::encode;
use hack_assembler::error::ErrorKind;
use hack_assembler::first_pass::{label_pass, variable_pass, symbol_table::SymbolTable};
use hack_assembler::lexer::tokenize;
use hack_assembler::parser::parse_lines;

struct Assembled {
    symbol_table: SymbolTable,
    machine_code: Vec<u16>,
}

fn assemble(source: &str) -> Assembled {
    let lexed = tokenize(source);
    assert!(lexed.errors.is_empty(), "lexer errors: {:?}", lexed.errors);
    let parsed = parse_lines(&lexed.tokens);
    assert!(parsed.errors.is_empty(), "parser errors: {:?}", parsed.errors);

    let mut label_result = label_pass(&parsed.lines);
    assert!(
        label_result.errors.is_empty(),
        "label pass errors: {:?}",
        label_result.errors
    );
    variable_pass(&parsed.lines, &mut label_result.symbol_table);

    let encoded = encode(&parsed.lines, &label_result.symbol_table);
    assert!(
        encoded.errors.is_empty(),
        "encoder errors: {:?}",
        encoded.errors
    );

    Assembled {
        symbol_table: label_result.symbol_table,
        machine_code: encoded.machine_code,
    }
}

fn collect_all_errors(source: &str) -> Vec<ErrorKind> {
    let mut kinds = Vec::new();
    let lexed = tokenize(source);
    kinds.extend(lexed.errors.iter().map(|e| e.kind));
    let parsed = parse_lines(&lexed.tokens);
    kinds.extend(parsed.errors.iter().map(|e| e.kind));
    let mut label_result = label_pass(&parsed.lines);
    kinds.extend(label_result.errors.iter().map(|e| e.kind));
    variable_pass(&parsed.lines, &mut label_result.symbol_table);
    let encoded = encode(&parsed.lines, &label_result.symbol_table);
    kinds.extend(encoded.errors.iter().map(|e| e.kind));
    kinds
}

const COUNTDOWN: &str = "\
@10
D=A
@i
M=D
(LOOP)
@i
D=M
@END
D;JEQ
@i
M=M-1
@LOOP
0;JMP
(END)
@END
0;JMP
";

#[test]
fn countdown_program_allocates_variable_and_binds_labels() {
    let asm = assemble(COUNTDOWN);
    assert_eq!(asm.symbol_table.get("i"), Some(16));
    assert_eq!(asm.symbol_table.get("LOOP"), Some(4));
    assert_eq!(asm.symbol_table.get("END"), Some(12));
    assert_eq!(asm.machine_code.len(), 14);
}

const MAX_PROGRAM: &str = "\
@R0
D=M
@R1
D=D-M
@OUTPUT_FIRST
D;JGT
@R1
D=M
@OUTPUT_D
0;JMP
(OUTPUT_FIRST)
@R0
D=M
(OUTPUT_D)
@R2
M=D
(END)
@END
0;JMP
";

#[test]
fn max_program_resolves_forward_and_backward_labels() {
    let asm = assemble(MAX_PROGRAM);
    assert!(asm.symbol_table.get("OUTPUT_FIRST").is_some());
    assert!(asm.symbol_table.get("OUTPUT_D").is_some());
    assert!(asm.symbol_table.get("END").is_some());
    assert_eq!(asm.machine_code.len(), 16);
}

#[test]
fn a_instruction_literal_encodes_with_high_bit_clear() {
    let asm = assemble("@2\n");
    assert_eq!(asm.machine_code[0], 0b0000_0000_0000_0010);
}

#[test]
fn c_instruction_sets_the_fixed_top_three_bits() {
    let asm = assemble("D=A\n");
    assert_eq!(asm.machine_code[0] >> 13, 0b111);
}

#[test]
fn predefined_symbols_are_available_without_declaration() {
    let asm = assemble("@SCREEN\n@KBD\n@SP\n");
    assert_eq!(asm.symbol_table.get("SCREEN"), Some(0x4000));
    assert_eq!(asm.symbol_table.get("KBD"), Some(0x6000));
    assert_eq!(asm.symbol_table.get("SP"), Some(0));
}

#[test]
fn repeated_assembly_of_the_same_source_is_deterministic() {
    let first = assemble(COUNTDOWN);
    let second = assemble(COUNTDOWN);
    assert_eq!(first.machine_code, second.machine_code);
    assert_eq!(first.symbol_table.get("i"), second.symbol_table.get("i"));
}

// ---- error-path tests ----

#[test]
fn error_duplicate_label() {
    let errors = collect_all_errors("(LOOP)\n@1\n(LOOP)\n@2\n");
    assert!(errors.contains(&ErrorKind::DuplicateLabel));
}

#[test]
fn error_a_instruction_out_of_range() {
    let errors = collect_all_errors("@32768\n");
    assert!(errors.contains(&ErrorKind::IntegerOutOfRange));
}

#[test]
fn error_unknown_comp_mnemonic() {
    let errors = collect_all_errors("D=Q\n");
    assert!(errors.contains(&ErrorKind::UnknownMnemonic));
}

#[test]
fn error_unknown_jump_mnemonic() {
    let errors = collect_all_errors("0;JXX\n");
    assert!(errors.contains(&ErrorKind::UnknownMnemonic));
}

#[test]
fn error_malformed_c_instruction() {
    let errors = collect_all_errors("0;JMP D\n");
    assert!(errors.contains(&ErrorKind::UnexpectedToken));
}

#[test]
fn error_unclosed_label() {
    let errors = collect_all_errors("(LOOP\n@1\n");
    assert!(errors.contains(&ErrorKind::UnexpectedToken));
}
