//! Error types shared by the tokenizer, parser/analyzer, and compiler.
//!
//! Follows the same span-carrying shape as the assembler's `AsmError` and
//! the VM translator's `VmError`: a fixed `ErrorKind`, a human-readable
//! message, and a `Span` for line/column reporting.

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
pub struct JackError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl JackError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn integer_out_of_range(value: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::IntegerOutOfRange,
            format!("integer constant '{value}' exceeds the maximum of 32767"),
            span,
        )
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::new(ErrorKind::UnterminatedString, "unterminated string constant", span)
    }

    pub fn unterminated_block_comment(span: Span) -> Self {
        Self::new(ErrorKind::UnterminatedBlockComment, "unterminated block comment", span)
    }

    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken,
            format!("expected {expected}, found '{found}'"),
            span,
        )
    }

    pub fn unknown_class(name: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken,
            format!("'{name}' is neither a known variable nor a known class"),
            span,
        )
    }

    pub fn unknown_variable(name: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken,
            format!("'{name}' is not declared in this scope"),
            span,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Constant greater than 32767.
    IntegerOutOfRange,
    /// `"` without a matching close before end of input.
    UnterminatedString,
    /// `/*` without a matching `*/`.
    UnterminatedBlockComment,
    /// Required token absent, or a term/statement the grammar can't start from here.
    UnexpectedToken,
}

impl std::fmt::Display for JackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR (line {}:{}): {}", self.span.line, self.span.col, self.message)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for JackError {}
