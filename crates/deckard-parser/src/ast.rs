//! The parsed deck: keywords stored flat, sections as spans over them.
//!
//! Each keyword keeps its items in one flat `Vec<Item>` where an
//! `EndRec` sentinel closes every record; a toggle keyword has no items
//! at all. Record views are reconstructed by splitting on sentinels, so
//! the storage stays a single allocation per keyword while callers see
//! nested records.

use std::fmt;
use std::ops::Range;

use deckard_common::value::{Item, Value};

use crate::cursor::Cursor;
use crate::registry::SectionKind;

/// One keyword occurrence with its parsed data.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    name: String,
    items: Vec<Item>,
}

impl Keyword {
    pub(crate) fn toggle(name: String) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    pub(crate) fn new(name: String, items: Vec<Item>) -> Self {
        Self { name, items }
    }

    /// The keyword's deck spelling.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this keyword carries no records.
    pub fn is_toggle(&self) -> bool {
        self.items.is_empty()
    }

    /// The flat item storage, record sentinels included.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of records (0 for toggles).
    pub fn record_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.value, Value::EndRec))
            .count()
    }

    /// The `idx`-th record as a sentinel-free slice.
    pub fn record(&self, idx: usize) -> Option<&[Item]> {
        self.records().nth(idx)
    }

    /// Iterate the keyword's records, each a sentinel-free slice.
    pub fn records(&self) -> Records<'_> {
        Records { items: &self.items }
    }
}

/// Iterator over a keyword's records.
pub struct Records<'a> {
    items: &'a [Item],
}

impl<'a> Iterator for Records<'a> {
    type Item = &'a [Item];

    fn next(&mut self) -> Option<&'a [Item]> {
        if self.items.is_empty() {
            return None;
        }
        match self
            .items
            .iter()
            .position(|item| matches!(item.value, Value::EndRec))
        {
            Some(end) => {
                let record = &self.items[..end];
                self.items = &self.items[end + 1..];
                Some(record)
            }
            None => {
                let record = self.items;
                self.items = &[];
                Some(record)
            }
        }
    }
}

/// A section: its kind and the keywords it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    kind: SectionKind,
    range: Range<usize>,
}

impl Section {
    pub(crate) fn new(kind: SectionKind, range: Range<usize>) -> Self {
        Self { kind, range }
    }
}

/// A fully parsed deck.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    sections: Vec<Section>,
    keywords: Vec<Keyword>,
}

impl Deck {
    pub(crate) fn new(sections: Vec<Section>, keywords: Vec<Keyword>) -> Self {
        Self { sections, keywords }
    }

    /// All keywords, in deck order, across all sections.
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// The sections in deck order, each with its keyword slice.
    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, &[Keyword])> + '_ {
        self.sections
            .iter()
            .map(|section| (section.kind, &self.keywords[section.range.clone()]))
    }

    /// The keywords of one section, if that section is present.
    pub fn section(&self, kind: SectionKind) -> Option<&[Keyword]> {
        self.sections
            .iter()
            .find(|section| section.kind == kind)
            .map(|section| &self.keywords[section.range.clone()])
    }

    /// First occurrence of a keyword by name.
    pub fn find(&self, name: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|kw| kw.name() == name)
    }

    /// Keyword names in deck order, repeats included.
    pub fn keyword_names(&self) -> Vec<&str> {
        self.keywords.iter().map(Keyword::name).collect()
    }

    /// Sorted, deduplicated keyword names.
    pub fn unique_keyword_names(&self) -> Vec<&str> {
        let mut names = self.keyword_names();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The deck's items as one flat sequence, keyword by keyword, with
    /// the `EndRec` sentinels in place.
    pub fn flat_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.keywords.iter().flat_map(|kw| kw.items().iter())
    }

    /// Offset of each keyword's first item slot within the flat item
    /// sequence (toggles occupy zero slots, so consecutive keywords
    /// may share an offset).
    pub fn keyword_positions(&self) -> Vec<usize> {
        let mut positions = Vec::with_capacity(self.keywords.len());
        let mut offset = 0;
        for kw in &self.keywords {
            positions.push(offset);
            offset += kw.items().len();
        }
        positions
    }

    /// A cursor at the deck's first keyword, or `None` for an empty
    /// deck (a cursor always addresses some keyword).
    pub fn cursor(&self) -> Option<Cursor<'_>> {
        Cursor::new(self)
    }
}

impl fmt::Display for Keyword {
    /// One line: the name, then each record in braces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t[ ", self.name)?;
        for record in self.records() {
            write!(f, "{{ ")?;
            for item in record {
                write!(f, "{item} ")?;
            }
            write!(f, "}} ")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, keywords) in self.sections() {
            writeln!(f, "{kind}:")?;
            for keyword in keywords {
                writeln!(f, "{keyword}")?;
            }
        }
        Ok(())
    }
}
