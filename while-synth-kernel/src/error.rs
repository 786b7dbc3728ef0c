//! Error types for lexing, parsing, and AST manipulation.

use std::fmt;

use crate::token::{Span, TokenKind};

/// Errors produced while tokenizing or parsing a While-language source.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    /// Render a caret-underlined diagnostic against the offending line.
    pub fn display_with_source(&self, source: &str) -> String {
        let (line_num, line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end - self.span.start).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        format!(
            "error: {}\n\n{:4} | {}\n     | {}",
            self.kind, line_num, line_content, underline
        )
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, usize, &'a str) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_num, line_start, &source[line_start..line_end])
    }
}

#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    UnexpectedChar(char),
    UnterminatedNumber,
    UnexpectedToken { expected: &'static str, found: TokenKind },
    ExpectedStatement,
    ExpectedExpression,
    ExpectedIdentifier,
    ExpectedRelationalCondition,
    TrailingInput,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            ParseErrorKind::UnterminatedNumber => write!(f, "malformed integer literal"),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {:?}", expected, found)
            }
            ParseErrorKind::ExpectedStatement => write!(f, "expected a statement"),
            ParseErrorKind::ExpectedExpression => write!(f, "expected an expression"),
            ParseErrorKind::ExpectedIdentifier => write!(f, "expected an identifier"),
            ParseErrorKind::ExpectedRelationalCondition => {
                write!(f, "if/while conditions must be relational (=, !=, <, >, <=, >=)")
            }
            ParseErrorKind::TrailingInput => write!(f, "unparsed input remains after the program"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Errors from AST-level operations (hole handling, encoding).
#[derive(Debug, Clone)]
pub enum KernelError {
    /// The encoder hit an AST node outside the grammar it was built for.
    /// This is a programmer error, not a user-facing one.
    UnknownNode(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::UnknownNode(label) => write!(f, "unexpected AST node: {}", label),
        }
    }
}

impl std::error::Error for KernelError {}

pub type ParseResult<T> = Result<T, ParseError>;
