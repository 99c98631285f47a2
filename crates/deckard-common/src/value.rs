use std::fmt;

use serde::Serialize;

/// A single deck value.
///
/// This is a sum type on purpose: every item in a record is exactly one
/// of these, and the parser never needs a value that is "both". `EndRec`
/// is the record-terminator sentinel used by the flat item storage; it
/// never appears inside a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    /// The value was omitted (`*` or the bare part of `N*`); the
    /// simulator default applies.
    Default,
    /// Record terminator sentinel in the flat representation.
    EndRec,
}

impl Value {
    /// The variant tag, as exposed by cursor queries.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Default => ValueKind::Default,
            Value::EndRec => ValueKind::End,
        }
    }
}

/// Variant tag of a [`Value`], without the payload.
///
/// `End` doubles as the "no item addressable" answer when a cursor sits
/// on a record boundary or on a toggle keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    Int,
    Float,
    Str,
    Default,
    End,
}

/// A value together with its repeat count.
///
/// `3*5` parses as one `Item` with value 5 and repeat 3. Observable
/// repeats are always >= 1; a written `0*` is rejected by the grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub value: Value,
    pub repeat: u32,
}

impl Item {
    /// An item with an explicit repeat count.
    pub fn new(value: Value, repeat: u32) -> Self {
        debug_assert!(repeat >= 1, "observable repeats are >= 1");
        debug_assert!(
            !(matches!(value, Value::EndRec) && repeat != 1),
            "EndRec never carries a repeat"
        );
        Self { value, repeat }
    }

    /// An unrepeated item.
    pub fn single(value: Value) -> Self {
        Self::new(value, 1)
    }

    /// The record-terminator sentinel. Always repeat 1.
    pub fn end() -> Self {
        Self {
            value: Value::EndRec,
            repeat: 1,
        }
    }

    /// The variant tag of the carried value.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(x) => write!(f, "{x}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::Default => write!(f, "*"),
            Value::EndRec => write!(f, "/"),
        }
    }
}

impl fmt::Display for Item {
    /// Renders in deck syntax: `5`, `3*5`, `*`, `3*`, `/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.repeat) {
            (Value::EndRec, _) => write!(f, "/"),
            (Value::Default, 1) => write!(f, "*"),
            (Value::Default, n) => write!(f, "{n}*"),
            (value, 1) => write!(f, "{value}"),
            (value, n) => write!(f, "{n}*{value}"),
        }
    }
}
