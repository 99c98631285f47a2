// Deck parser -- grammar, AST and cursor for Eclipse-style input decks.
//
// The input is the flattened byte stream produced by the preprocessor
// (or any in-memory deck text). Parsing is driven by a keyword
// registry: each keyword is either a toggle or takes a fixed number of
// slash-terminated records whose items are restricted to the keyword's
// value class. The result is a [`Deck`] navigated through a [`Cursor`].

pub mod ast;
pub mod cursor;
pub mod error;
mod grammar;
pub mod registry;

pub use ast::{Deck, Keyword, Records, Section};
pub use cursor::{Axis, Cursor};
pub use deckard_common::value::{Item, Value, ValueKind};
pub use error::{ParseError, ParseErrorKind};
pub use registry::{DuplicateKeywordArity, ItemClass, Registry, SectionKind, Shape};

/// Parse a deck using the baseline keyword registry.
pub fn parse(input: &[u8]) -> Result<Deck, ParseError> {
    parse_with(input, &Registry::default())
}

/// Parse a deck against a caller-provided registry.
pub fn parse_with(input: &[u8], registry: &Registry) -> Result<Deck, ParseError> {
    grammar::Parser::new(input, registry).parse_deck()
}
