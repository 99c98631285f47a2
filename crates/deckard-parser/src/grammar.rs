//! Recursive descent over the token stream: the deck loop, keyword
//! dispatch, and the record/item grammar.
//!
//! The parser is all-or-nothing: the first error aborts the parse and
//! is returned with its span. Comments are filtered out up front, so
//! the grammar only ever sees significant tokens; the lexer guarantees
//! a trailing `Eof` token, which keeps lookahead total.

use std::borrow::Cow;

use tracing::trace;

use deckard_common::token::{Token, TokenKind};
use deckard_common::value::{Item, Value, ValueKind};
use deckard_lexer::Lexer;

use crate::ast::{Deck, Keyword, Section};
use crate::error::{ParseError, ParseErrorKind};
use crate::registry::{ItemClass, Registry, SectionKind, Shape};

pub(crate) struct Parser<'a> {
    /// Significant tokens only; always ends with `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    source: &'a [u8],
    registry: &'a Registry,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a [u8], registry: &'a Registry) -> Self {
        let tokens = Lexer::tokenize(source)
            .into_iter()
            .filter(|token| token.kind != TokenKind::Comment)
            .collect();
        Self {
            tokens,
            pos: 0,
            source,
            registry,
        }
    }

    // ── Token access ───────────────────────────────────────────────────

    fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    /// The token after the current one (`Eof` at the end).
    fn peek(&self) -> Token {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.current().kind != TokenKind::Eof {
            self.pos += 1;
        }
    }

    /// Token text. Lives as long as the source, not the parser borrow.
    fn text(&self, token: Token) -> Cow<'a, str> {
        String::from_utf8_lossy(&self.source[token.span.start as usize..token.span.end as usize])
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.text(token)),
        };
        ParseError::new(
            ParseErrorKind::UnexpectedToken { found, expected },
            token.span,
        )
    }

    // ── Deck level ─────────────────────────────────────────────────────

    /// `deck = RUNSPEC-section? GRID-section? EOF`
    pub(crate) fn parse_deck(mut self) -> Result<Deck, ParseError> {
        let mut keywords = Vec::new();
        let mut sections = Vec::new();
        let mut next_order = 0;

        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Word => {
                    let name = self.text(token);
                    let Some(kind) = SectionKind::from_name(&name) else {
                        // A keyword with no enclosing section.
                        let declared = self.registry.lookup(&name).map(|(section, _)| section);
                        return Err(ParseError::new(
                            ParseErrorKind::UnknownKeyword {
                                name: name.into_owned(),
                                declared,
                            },
                            token.span,
                        ));
                    };
                    if kind.order() < next_order {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedToken {
                                found: format!("section {name}"),
                                expected: "sections in RUNSPEC, GRID order",
                            },
                            token.span,
                        ));
                    }
                    next_order = kind.order() + 1;
                    self.advance();

                    let start = keywords.len();
                    self.parse_section(kind, &mut keywords)?;
                    sections.push(Section::new(kind, start..keywords.len()));
                }
                _ => return Err(self.unexpected("a section header")),
            }
        }

        Ok(Deck::new(sections, keywords))
    }

    /// Keywords until the next section header or end of input.
    fn parse_section(
        &mut self,
        section: SectionKind,
        keywords: &mut Vec<Keyword>,
    ) -> Result<(), ParseError> {
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Word => {
                    let name = self.text(token);
                    if SectionKind::from_name(&name).is_some() {
                        // Next section; the deck loop takes over.
                        return Ok(());
                    }

                    let shape = match self.registry.lookup(&name) {
                        None => {
                            return Err(ParseError::new(
                                ParseErrorKind::UnknownKeyword {
                                    name: name.into_owned(),
                                    declared: None,
                                },
                                token.span,
                            ))
                        }
                        Some((declared, _)) if declared != section => {
                            return Err(ParseError::new(
                                ParseErrorKind::UnknownKeyword {
                                    name: name.into_owned(),
                                    declared: Some(declared),
                                },
                                token.span,
                            ))
                        }
                        Some((_, shape)) => shape,
                    };

                    trace!(keyword = %name, "keyword");
                    self.advance();

                    let name = name.into_owned();
                    match shape {
                        Shape::Toggle => keywords.push(Keyword::toggle(name)),
                        Shape::Records { count, class } => {
                            let mut items = Vec::new();
                            for got in 0..count {
                                self.parse_record(&name, class, count, got, &mut items)?;
                            }
                            keywords.push(Keyword::new(name, items));
                        }
                    }
                }
                _ => return Err(self.unexpected("a keyword name")),
            }
        }
    }

    // ── Record level ───────────────────────────────────────────────────

    /// One `/`-terminated record of items matching `class`.
    fn parse_record(
        &mut self,
        keyword: &str,
        class: ItemClass,
        expected: u32,
        got: u32,
        items: &mut Vec<Item>,
    ) -> Result<(), ParseError> {
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Slash => {
                    self.advance();
                    items.push(Item::end());
                    return Ok(());
                }

                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::RecordCountMismatch {
                            keyword: keyword.to_string(),
                            expected,
                            got,
                        },
                        token.span,
                    ))
                }

                TokenKind::Int => {
                    let star = self.peek();
                    if star.kind == TokenKind::Star && token.span.abuts(star.span) {
                        self.parse_repeated_item(keyword, class, token, star, items)?;
                    } else {
                        let value = self.item_value(keyword, class, token)?;
                        self.advance();
                        items.push(Item::single(value));
                    }
                }

                TokenKind::Float | TokenKind::QuotedStr => {
                    let value = self.item_value(keyword, class, token)?;
                    self.advance();
                    items.push(Item::single(value));
                }

                TokenKind::Word => {
                    if !class.admits_str() {
                        // A bare word where no string may appear almost
                        // always means a missing `/`: the next keyword
                        // has started while this record is still open.
                        let name = self.text(token);
                        if self.registry.lookup(&name).is_some()
                            || SectionKind::from_name(&name).is_some()
                        {
                            return Err(ParseError::new(
                                ParseErrorKind::RecordCountMismatch {
                                    keyword: keyword.to_string(),
                                    expected,
                                    got,
                                },
                                token.span,
                            ));
                        }
                    }
                    let value = self.item_value(keyword, class, token)?;
                    self.advance();
                    items.push(Item::single(value));
                }

                // A lone star: one defaulted item.
                TokenKind::Star => {
                    self.advance();
                    items.push(Item::single(Value::Default));
                }

                _ => return Err(self.unexpected("a record item or `/`")),
            }
        }
    }

    /// `N*value` or `N*` starting at an integer glued to a star.
    fn parse_repeated_item(
        &mut self,
        keyword: &str,
        class: ItemClass,
        int: Token,
        star: Token,
        items: &mut Vec<Item>,
    ) -> Result<(), ParseError> {
        let text = self.text(int);
        let repeat: u32 = text
            .parse()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidRepeat {
                        text: text.to_string(),
                    },
                    int.span,
                )
            })?;
        self.advance(); // the count
        self.advance(); // the star

        // `N*value` only when the value is glued to the star; anything
        // else (blank, `/`, end of line) makes it N defaulted items.
        let value_token = self.current();
        let is_value = matches!(
            value_token.kind,
            TokenKind::Int | TokenKind::Float | TokenKind::QuotedStr | TokenKind::Word
        );
        if is_value && star.span.abuts(value_token.span) {
            let value = self.item_value(keyword, class, value_token)?;
            self.advance();
            items.push(Item::new(value, repeat));
        } else {
            items.push(Item::new(Value::Default, repeat));
        }
        Ok(())
    }

    // ── Item level ─────────────────────────────────────────────────────

    /// Convert a value token under the keyword's class restriction.
    fn item_value(
        &self,
        keyword: &str,
        class: ItemClass,
        token: Token,
    ) -> Result<Value, ParseError> {
        let mismatch = |found| {
            ParseError::new(
                ParseErrorKind::TypeMismatch {
                    keyword: keyword.to_string(),
                    class,
                    found,
                },
                token.span,
            )
        };

        match token.kind {
            TokenKind::Int => {
                let text = self.text(token);
                if class.admits_int() {
                    let value = text.parse::<i64>().map_err(|_| {
                        ParseError::new(
                            ParseErrorKind::InvalidNumber {
                                text: text.to_string(),
                            },
                            token.span,
                        )
                    })?;
                    Ok(Value::Int(value))
                } else if class.admits_float() {
                    // A float-class record reads `100` as a float, the
                    // same way `100.` would parse.
                    Ok(Value::Float(self.parse_f77(token)?))
                } else {
                    Err(mismatch(ValueKind::Int))
                }
            }

            TokenKind::Float => {
                if class.admits_float() {
                    Ok(Value::Float(self.parse_f77(token)?))
                } else {
                    Err(mismatch(ValueKind::Float))
                }
            }

            TokenKind::QuotedStr => {
                if class.admits_str() {
                    let text = self.text(token);
                    // Strip the enclosing quotes.
                    Ok(Value::Str(text[1..text.len() - 1].to_string()))
                } else {
                    Err(mismatch(ValueKind::Str))
                }
            }

            TokenKind::Word => {
                if class.admits_str() {
                    Ok(Value::Str(self.text(token).into_owned()))
                } else {
                    Err(mismatch(ValueKind::Str))
                }
            }

            _ => Err(self.unexpected("a record item")),
        }
    }

    /// Parse a float literal, accepting `d`/`D` as exponent markers.
    fn parse_f77(&self, token: Token) -> Result<f64, ParseError> {
        let text = self.text(token);
        let normalized: Cow<str> = if text.contains(['d', 'D']) {
            Cow::Owned(text.replace(['d', 'D'], "e"))
        } else {
            Cow::Borrowed(text.as_ref())
        };
        normalized.parse::<f64>().map_err(|_| {
            ParseError::new(
                ParseErrorKind::InvalidNumber {
                    text: text.to_string(),
                },
                token.span,
            )
        })
    }
}
