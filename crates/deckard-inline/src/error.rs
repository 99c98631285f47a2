//! Error type for the preprocessor.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// An error raised while flattening a deck.
///
/// On any error the whole `concatenate` call fails; no partial output
/// buffer or alias table is ever exposed.
#[derive(Debug)]
pub enum InlineError {
    /// A file could not be opened or read. Carries the offending path.
    Io { path: PathBuf, source: io::Error },
    /// An `INCLUDE` or `PATHS` directive is syntactically invalid.
    /// `offset` is the byte offset within the file being read.
    MalformedDirective {
        directive: &'static str,
        reason: &'static str,
        offset: usize,
    },
    /// A `$name` path fragment with no matching PATHS entry.
    UnknownAlias { alias: String, path: String },
}

impl fmt::Display for InlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InlineError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            InlineError::MalformedDirective {
                directive,
                reason,
                offset,
            } => {
                write!(f, "malformed {directive} directive at byte {offset}: {reason}")
            }
            InlineError::UnknownAlias { alias, path } => {
                write!(f, "unknown alias ${alias} in '{path}'")
            }
        }
    }
}

impl std::error::Error for InlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InlineError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
