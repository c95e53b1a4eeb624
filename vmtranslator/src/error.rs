//! Error type for the VM translator.
//!
//! Same shape as the assembler's `AsmError` (spec §3 ambient error model):
//! a fixed `ErrorKind`, a message, and a `Span` for line/column reporting.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VmError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl VmError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn unexpected_token(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::UnexpectedToken, message, span)
    }

    pub fn unknown_segment(segment: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken,
            format!("'{segment}' is not a valid memory segment"),
            span,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognised verb, malformed operand list, or otherwise ill-formed line.
    UnexpectedToken,
    /// Integer operand doesn't fit the expected numeric range.
    IntegerOutOfRange,
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ERROR (line {}:{}): {}",
            self.span.line, self.span.col, self.message
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for VmError {}
