//! # Hack Assembler
//!
//! A complete two-pass assembler for the Hack platform (nand2tetris).
//!
//! ## Pipeline
//!
//! 1. **Lexer** — tokenizes source text (`lexer`)
//! 2. **Parser** — builds an AST of `SourceLine`s (`parser`)
//! 3. **First pass** — label pass then variable pass over the shared
//!    symbol table (`first_pass`)
//! 4. **Encoder** — emits one 16-bit word per instruction (`encoder`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use hack_assembler::{lexer::tokenize, parser::parse_lines, first_pass, encoder::encode};
//!
//! let source = std::fs::read_to_string("program.asm").unwrap();
//! let lexed = tokenize(&source);
//! let parsed = parse_lines(&lexed.tokens);
//!
//! let mut label_result = first_pass::label_pass(&parsed.lines);
//! first_pass::variable_pass(&parsed.lines, &mut label_result.symbol_table);
//!
//! let encoded = encoder::encode(&parsed.lines, &label_result.symbol_table);
//! if encoded.errors.is_empty() {
//!     println!("Generated {} words of machine code", encoded.machine_code.len());
//! }
//! ```

pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod lexer;
pub mod parser;
