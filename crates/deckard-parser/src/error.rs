//! Parse error types.

use std::fmt;

use deckard_common::span::{LineIndex, Span};
use deckard_common::value::ValueKind;

use crate::registry::{ItemClass, SectionKind};

/// A parse error with location information.
///
/// Deck parsing has no recovery surface: the first error aborts the
/// whole parse, so errors carry everything needed for one good
/// message and nothing for resynchronisation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte range in the flattened deck where the error was detected.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 1-based line and column of the error within `source` (the same
    /// buffer that was handed to `parse`).
    pub fn line_col(&self, source: &[u8]) -> (u32, u32) {
        LineIndex::new(source).line_col(self.span.start)
    }

    /// The error message with its position: `line 3, column 2: ...`.
    pub fn render(&self, source: &[u8]) -> String {
        let (line, col) = self.line_col(source);
        format!("line {line}, column {col}: {}", self.kind)
    }
}

/// The specific kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// A word in keyword position is not in the registry, or is
    /// declared for a different section than the one it appeared in.
    UnknownKeyword {
        name: String,
        declared: Option<SectionKind>,
    },
    /// A record value's type is outside the keyword's class.
    TypeMismatch {
        keyword: String,
        class: ItemClass,
        found: ValueKind,
    },
    /// A keyword did not provide its declared number of records.
    RecordCountMismatch {
        keyword: String,
        expected: u32,
        got: u32,
    },
    /// A repeat count that is not a positive integer (`0*`, `-3*`).
    InvalidRepeat { text: String },
    /// A numeric literal that does not fit its type (e.g. integer
    /// overflow).
    InvalidNumber { text: String },
    /// Anything else the grammar has no rule for at this position.
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },
}

fn describe_value(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Int => "an integer",
        ValueKind::Float => "a float",
        ValueKind::Str => "a string",
        ValueKind::Default => "a default",
        ValueKind::End => "a record terminator",
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnknownKeyword {
                name,
                declared: None,
            } => write!(f, "unknown keyword {name}"),
            ParseErrorKind::UnknownKeyword {
                name,
                declared: Some(section),
            } => write!(f, "keyword {name} belongs in section {section}"),
            ParseErrorKind::TypeMismatch {
                keyword,
                class,
                found,
            } => write!(
                f,
                "keyword {keyword} takes {class} items, found {}",
                describe_value(*found)
            ),
            ParseErrorKind::RecordCountMismatch {
                keyword,
                expected,
                got,
            } => write!(
                f,
                "keyword {keyword} expects {expected} record(s), found {got}"
            ),
            ParseErrorKind::InvalidRepeat { text } => {
                write!(f, "invalid repeat count `{text}`")
            }
            ParseErrorKind::InvalidNumber { text } => {
                write!(f, "invalid number `{text}`")
            }
            ParseErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "expected {expected}, found {found}")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn display_unknown_keyword() {
        let err = ParseError::new(
            ParseErrorKind::UnknownKeyword {
                name: "FOO".into(),
                declared: None,
            },
            Span::new(0, 3),
        );
        assert_snapshot!(err.to_string(), @"unknown keyword FOO");
    }

    #[test]
    fn display_out_of_section_keyword() {
        let err = ParseErrorKind::UnknownKeyword {
            name: "MAPAXES".into(),
            declared: Some(SectionKind::Grid),
        };
        assert_snapshot!(err.to_string(), @"keyword MAPAXES belongs in section GRID");
    }

    #[test]
    fn display_type_mismatch() {
        let err = ParseErrorKind::TypeMismatch {
            keyword: "DIMENS".into(),
            class: ItemClass::Int,
            found: ValueKind::Float,
        };
        assert_snapshot!(err.to_string(), @"keyword DIMENS takes int items, found a float");
    }

    #[test]
    fn display_record_count_mismatch() {
        let err = ParseErrorKind::RecordCountMismatch {
            keyword: "DIMENS".into(),
            expected: 1,
            got: 0,
        };
        assert_snapshot!(err.to_string(), @"keyword DIMENS expects 1 record(s), found 0");
    }
}
