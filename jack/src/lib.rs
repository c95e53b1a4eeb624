//! # Jack Tokenizer, Syntax Analyzer, and Compiler
//!
//! Stages 3 and 4 of the toolchain (spec §2): the shared `lexer`/`parser`
//! pipeline feeds either `xml` (the syntax analyzer's structured output)
//! or `codegen` (the compiler's VM output).
//!
//! ## Pipeline
//!
//! 1. **Lexer** — character stream → token stream (`lexer`)
//! 2. **Parser** — token stream → typed [`parser::ast::Class`] (`parser`)
//! 3a. **XML** — tree → indented XML, for the analyzer (`xml`)
//! 3b. **Codegen** — tree + [`symbol_table`] → VM instructions, for the
//!     compiler (`codegen`)

pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbol_table;
pub mod xml;

use std::collections::HashSet;

use error::JackError;

/// Tokenizes and parses `source`, stopping at the first fatal error
/// (spec §4.4 "Error policy").
pub fn parse_source(source: &str) -> Result<parser::ast::Class, JackError> {
    let lexed = lexer::tokenize(source);
    if let Some(err) = lexed.errors.into_iter().next() {
        return Err(err);
    }

    let parsed = parser::parse(&lexed.tokens);
    match parsed.error {
        Some(err) => Err(err),
        None => Ok(parsed.class.expect("parser succeeds iff it reports no error")),
    }
}

/// Analyzes `source`, producing the indented XML parse tree (spec §4.4).
pub fn analyze(source: &str) -> Result<String, JackError> {
    let class = parse_source(source)?;
    Ok(xml::render(&class))
}

/// Compiles `source` into VM instructions (spec §4.5). `known_classes`
/// is the full sibling class name list for the compilation unit.
pub fn compile(source: &str, known_classes: &HashSet<String>) -> Result<String, JackError> {
    let class = parse_source(source)?;
    codegen::compile_class(&class, known_classes)
}
