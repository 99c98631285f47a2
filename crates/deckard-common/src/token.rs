use serde::Serialize;

use crate::span::Span;

/// A token produced by the deck lexer.
///
/// Tokens carry no text of their own; the text is recovered by slicing
/// the source buffer with the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the deck record format.
///
/// The vocabulary is deliberately small: the format has no operators or
/// nesting, only values, the repeat/default star, the record-closing
/// slash, and `--` comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// A run of decimal digits with optional sign, not followed by `.`
    /// or a Fortran exponent.
    Int,
    /// A decimal float, Fortran style: the exponent marker may be any
    /// of `e E d D` (`1.234d5`).
    Float,
    /// A `'...'` or `"..."` literal. The span includes the quotes.
    QuotedStr,
    /// A bare word `[A-Za-z][A-Za-z0-9]*`: a keyword name or an
    /// unquoted string value, depending on grammar context.
    Word,
    /// `*`: repeat marker when glued to a preceding integer, a
    /// defaulted item otherwise.
    Star,
    /// `/`: terminates a record. The rest of the line after it is
    /// lexed as a [`TokenKind::Comment`].
    Slash,
    /// `--` through end of line, or the tail of a line after `/`.
    Comment,
    /// End of input. Emitted exactly once.
    Eof,
    /// A byte that fits nothing above.
    Error,
}

impl TokenKind {
    /// Short human-readable name, used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::QuotedStr => "quoted string",
            TokenKind::Word => "word",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "unexpected character",
        }
    }
}
