//! The keyword registry: which keywords exist, which section each one
//! belongs to, and what shape its data takes.

use std::fmt;

use rustc_hash::FxHashMap;

/// A top-level deck section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Runspec,
    Grid,
}

impl SectionKind {
    /// The section's deck spelling.
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Runspec => "RUNSPEC",
            SectionKind::Grid => "GRID",
        }
    }

    /// Parse a deck word as a section header.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RUNSPEC" => Some(SectionKind::Runspec),
            "GRID" => Some(SectionKind::Grid),
            _ => None,
        }
    }

    /// Position in the mandatory section order.
    pub(crate) fn order(self) -> usize {
        match self {
            SectionKind::Runspec => 0,
            SectionKind::Grid => 1,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value types a keyword's records may hold.
///
/// The class restricts which item parsers run at all, so a type error
/// surfaces at the first offending byte instead of after a long
/// backtrack. Defaults (`*`, `N*`) are admitted by every class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClass {
    Int,
    Float,
    Str,
    IntFloat,
    IntStr,
    Any,
}

impl ItemClass {
    pub(crate) fn admits_int(self) -> bool {
        matches!(
            self,
            ItemClass::Int | ItemClass::IntFloat | ItemClass::IntStr | ItemClass::Any
        )
    }

    pub(crate) fn admits_float(self) -> bool {
        matches!(self, ItemClass::Float | ItemClass::IntFloat | ItemClass::Any)
    }

    pub(crate) fn admits_str(self) -> bool {
        matches!(self, ItemClass::Str | ItemClass::IntStr | ItemClass::Any)
    }
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemClass::Int => "int",
            ItemClass::Float => "float",
            ItemClass::Str => "string",
            ItemClass::IntFloat => "int/float",
            ItemClass::IntStr => "int/string",
            ItemClass::Any => "any",
        };
        f.write_str(name)
    }
}

/// What follows a keyword's name in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The keyword's presence is its whole value; no records follow.
    Toggle,
    /// Exactly `count` slash-terminated records of the given class.
    Records { count: u32, class: ItemClass },
}

impl Shape {
    /// The common case: one record.
    pub fn single(class: ItemClass) -> Self {
        Shape::Records { count: 1, class }
    }
}

/// Error raised when a keyword is declared twice with different shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeywordArity {
    pub name: String,
}

impl fmt::Display for DuplicateKeywordArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keyword {} declared with incompatible shapes", self.name)
    }
}

impl std::error::Error for DuplicateKeywordArity {}

/// Maps keyword names to their declaring section and shape.
///
/// [`Registry::default`] holds the baseline catalogue; hosts extend it
/// with [`Registry::define`] before parsing. Redefining a keyword with
/// the identical declaration is a no-op; a conflicting redefinition is
/// rejected.
#[derive(Debug, Clone)]
pub struct Registry {
    keywords: FxHashMap<String, (SectionKind, Shape)>,
}

impl Registry {
    /// A registry with no keywords at all.
    pub fn empty() -> Self {
        Self {
            keywords: FxHashMap::default(),
        }
    }

    /// Declare a keyword.
    pub fn define(
        &mut self,
        name: &str,
        section: SectionKind,
        shape: Shape,
    ) -> Result<(), DuplicateKeywordArity> {
        match self.keywords.get(name) {
            Some(&existing) if existing != (section, shape) => Err(DuplicateKeywordArity {
                name: name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.keywords.insert(name.to_string(), (section, shape));
                Ok(())
            }
        }
    }

    /// Look up a keyword by its deck spelling.
    pub fn lookup(&self, name: &str) -> Option<(SectionKind, Shape)> {
        self.keywords.get(name).copied()
    }

    fn define_all(&mut self, names: &[&str], section: SectionKind, shape: Shape) {
        for name in names {
            self.keywords.insert(name.to_string(), (section, shape));
        }
    }
}

impl Default for Registry {
    /// The baseline keyword catalogue.
    fn default() -> Self {
        use ItemClass::*;
        use SectionKind::*;

        let mut reg = Registry::empty();

        reg.define_all(
            &[
                "OIL", "WATER", "GAS", "DISGAS", "VAPOIL", "METRIC", "FIELD", "LAB", "NOSIM",
                "UNIFIN", "UNIFOUT",
            ],
            Runspec,
            Shape::Toggle,
        );
        reg.define_all(
            &[
                "DIMENS", "EQLDIMS", "REGDIMS", "WELLDIMS", "VFPIDIMS", "VFPPDIMS", "FAULTDIM",
                "PIMTDIMS", "NSTACK", "OPTIONS",
            ],
            Runspec,
            Shape::single(Int),
        );
        reg.define_all(&["EQLOPTS", "SATOPTS"], Runspec, Shape::single(Str));
        reg.define_all(
            &["ENDSCALE", "GRIDOPTS", "START", "TABDIMS"],
            Runspec,
            Shape::single(IntStr),
        );
        reg.define_all(&["TRACERS"], Runspec, Shape::single(Any));
        reg.define_all(&["SWATINIT"], Runspec, Shape::single(Float));

        reg.define_all(&["NEWTRAN"], Grid, Shape::Toggle);
        reg.define_all(&["GRIDFILE"], Grid, Shape::single(Int));
        reg.define_all(&["MAPAXES"], Grid, Shape::single(Float));

        reg
    }
}
