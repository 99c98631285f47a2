//! A movable position inside a parsed deck.
//!
//! The cursor is a pair of small indices into the deck's flat storage:
//! the keyword and the item slot inside that keyword. Copying a cursor
//! is a trivial value copy, and a failed advance leaves the cursor
//! exactly where it was -- out-of-range is the cursor's defined
//! terminal answer, not an error.

use std::fmt;

use deckard_common::value::{Item, Value, ValueKind};

use crate::ast::Deck;

/// The axis a cursor moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Keyword,
    Record,
    Item,
}

/// A position inside a [`Deck`]: a keyword plus an item slot within it.
///
/// For a toggle keyword the slot is the keyword's anchor (there are no
/// items), and record/item advances from it fail. On a keyword move the
/// slot resets to the keyword's first item position.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    deck: &'a Deck,
    kw: usize,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(deck: &'a Deck) -> Option<Self> {
        if deck.keywords().is_empty() {
            return None;
        }
        Some(Self { deck, kw: 0, pos: 0 })
    }

    fn items(&self) -> &'a [Item] {
        self.deck.keywords()[self.kw].items()
    }

    /// Move `steps` along `axis`. Negative steps move backwards.
    ///
    /// Returns `false` and leaves the cursor untouched when the target
    /// is out of range. A zero-step advance always succeeds.
    pub fn advance(&mut self, axis: Axis, steps: isize) -> bool {
        if steps == 0 {
            return true;
        }
        match axis {
            Axis::Keyword => self.advance_keyword(steps),
            Axis::Record => self.advance_record(steps),
            Axis::Item => self.advance_item(steps),
        }
    }

    /// `advance(axis, 1)`.
    pub fn next(&mut self, axis: Axis) -> bool {
        self.advance(axis, 1)
    }

    /// `advance(axis, -1)`.
    pub fn prev(&mut self, axis: Axis) -> bool {
        self.advance(axis, -1)
    }

    fn advance_keyword(&mut self, steps: isize) -> bool {
        let target = self.kw as isize + steps;
        if target < 0 || target as usize >= self.deck.keywords().len() {
            return false;
        }
        self.kw = target as usize;
        self.pos = 0;
        true
    }

    fn advance_record(&mut self, steps: isize) -> bool {
        let items = self.items();
        let count = end_count(items);
        if count == 0 {
            // Toggle: nothing to land on.
            return false;
        }

        let current = end_count(&items[..self.pos]);
        let target = current as isize + steps;
        // Records never cross keywords: the slot after the final
        // sentinel is the next keyword's territory, not a record.
        if target < 0 || target as usize >= count {
            return false;
        }

        self.pos = record_start(items, target as usize);
        true
    }

    fn advance_item(&mut self, steps: isize) -> bool {
        let items = self.items();
        if self.pos >= items.len() {
            // Toggle anchor.
            return false;
        }
        if matches!(items[self.pos].value, Value::EndRec) {
            // Sitting on an empty record's sentinel: no items here.
            return false;
        }

        let rec_start = items[..self.pos]
            .iter()
            .rposition(|item| matches!(item.value, Value::EndRec))
            .map(|i| i + 1)
            .unwrap_or(0);
        let rec_end = items[self.pos..]
            .iter()
            .position(|item| matches!(item.value, Value::EndRec))
            .map(|i| self.pos + i)
            .unwrap_or(items.len());

        let target = self.pos as isize + steps;
        // Items never cross a sentinel.
        if target < rec_start as isize || target >= rec_end as isize {
            return false;
        }

        self.pos = target as usize;
        true
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Name of the current keyword.
    pub fn name(&self) -> &'a str {
        self.deck.keywords()[self.kw].name()
    }

    /// Number of records in the current keyword (0 for toggles).
    pub fn records(&self) -> usize {
        self.deck.keywords()[self.kw].record_count()
    }

    /// The item under the cursor, if one is addressable.
    pub fn item(&self) -> Option<&'a Item> {
        let items = self.items();
        items
            .get(self.pos)
            .filter(|item| !matches!(item.value, Value::EndRec))
    }

    /// Repeat count of the item under the cursor; `None` when no item
    /// is addressable (toggle anchor or record boundary).
    pub fn repeats(&self) -> Option<u32> {
        self.item().map(|item| item.repeat)
    }

    /// Variant tag of the item under the cursor, [`ValueKind::End`]
    /// when no item is addressable.
    pub fn kind(&self) -> ValueKind {
        self.item().map_or(ValueKind::End, Item::kind)
    }
}

impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{} @ {}]", self.name(), self.kw, self.pos)
    }
}

fn end_count(items: &[Item]) -> usize {
    items
        .iter()
        .filter(|item| matches!(item.value, Value::EndRec))
        .count()
}

/// First slot of record `rec` (which may be that record's own sentinel
/// when the record is empty).
fn record_start(items: &[Item], rec: usize) -> usize {
    if rec == 0 {
        return 0;
    }
    let mut seen = 0;
    for (i, item) in items.iter().enumerate() {
        if matches!(item.value, Value::EndRec) {
            seen += 1;
            if seen == rec {
                return i + 1;
            }
        }
    }
    items.len()
}
