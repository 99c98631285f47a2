// Deck lexer -- tokenizer for the Eclipse keyword/record format.

mod cursor;

use cursor::Cursor;
use deckard_common::token::{Token, TokenKind};

/// The deck lexer. Converts a raw byte buffer into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or
/// collect them into a `Vec`.
///
/// Number classification is context-free: a digit run is an `Int`
/// unless it is followed by `.` or a well-formed Fortran exponent
/// (`e E d D`), in which case the whole literal is a `Float`. The
/// parser never has to re-lex.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src [u8],
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Pending tokens to emit before resuming normal lexing.
    pending: Vec<Token>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source buffer.
    pub fn new(source: &'src [u8]) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            emitted_eof: false,
            pending: Vec::new(),
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &[u8]) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Produce the next token.
    fn produce_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();

        let Some(b) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match b {
            // ── Record terminator ───────────────────────────────────────
            b'/' => self.lex_slash(start),

            // ── Repeat / default marker ─────────────────────────────────
            b'*' => self.single_byte_token(TokenKind::Star, start),

            // ── Comments and signed numbers ─────────────────────────────
            b'-' if self.cursor.peek_next() == Some(b'-') => self.lex_comment(start),
            b'-' | b'+' if self.signed_number_follows() => self.lex_number(start),

            // ── Number literals ─────────────────────────────────────────
            b'0'..=b'9' => self.lex_number(start),
            b'.' if self.cursor.peek_next().is_some_and(|b| b.is_ascii_digit()) => {
                self.lex_number(start)
            }

            // ── String literals ─────────────────────────────────────────
            b'\'' | b'"' => self.lex_quoted(b, start),

            // ── Bare words (keywords and unquoted strings) ──────────────
            b if b.is_ascii_alphabetic() => self.lex_word(start),

            // ── Anything else ───────────────────────────────────────────
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Skip insignificant whitespace. Newlines carry no meaning in the
    /// record format, so all ASCII whitespace is skipped alike.
    fn skip_whitespace(&mut self) {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
    }

    /// Consume one byte and return a token of the given kind.
    fn single_byte_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.get(offset).copied()
    }

    /// Whether the byte after a leading sign starts a number: a digit,
    /// or a `.` that is itself followed by a digit (`-.5`).
    fn signed_number_follows(&self) -> bool {
        let p = self.cursor.pos() as usize;
        match self.byte_at(p + 1) {
            Some(b) if b.is_ascii_digit() => true,
            Some(b'.') => self.byte_at(p + 2).is_some_and(|b| b.is_ascii_digit()),
            _ => false,
        }
    }

    /// Whether the cursor stands on a well-formed Fortran exponent:
    /// one of `e E d D`, an optional sign, then at least one digit.
    ///
    /// `10DX` is *not* an exponent; the literal ends before the `D` and
    /// stays an integer.
    fn exponent_follows(&self) -> bool {
        let p = self.cursor.pos() as usize;
        if !matches!(self.byte_at(p), Some(b'e' | b'E' | b'd' | b'D')) {
            return false;
        }
        match self.byte_at(p + 1) {
            Some(b) if b.is_ascii_digit() => true,
            Some(b'+' | b'-') => self.byte_at(p + 2).is_some_and(|b| b.is_ascii_digit()),
            _ => false,
        }
    }

    // ── Record terminator ──────────────────────────────────────────────

    /// Lex `/`. Everything after the slash on the same line is a
    /// comment by the format's rules; it is queued as a `Comment` token
    /// so the grammar can treat it as trivia.
    fn lex_slash(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '/'
        let slash = Token::new(TokenKind::Slash, start, self.cursor.pos());

        let tail_start = self.cursor.pos();
        self.cursor.eat_while(|b| b != b'\n');
        if self.cursor.pos() > tail_start {
            self.pending
                .push(Token::new(TokenKind::Comment, tail_start, self.cursor.pos()));
        }
        slash
    }

    // ── Comments ──────────────────────────────────────────────────────

    /// Lex a `--` comment through end of line.
    fn lex_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // first '-'
        self.cursor.advance(); // second '-'
        self.cursor.eat_while(|b| b != b'\n');
        Token::new(TokenKind::Comment, start, self.cursor.pos())
    }

    // ── Number literals ───────────────────────────────────────────────

    /// Lex an integer or Fortran float.
    ///
    /// Integers are the overwhelmingly common case, so the literal is
    /// only promoted to a float when a `.` or a valid exponent is
    /// actually present -- there is no backtracking.
    fn lex_number(&mut self, start: u32) -> Token {
        if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
            self.cursor.advance();
        }

        self.cursor.eat_while(|b| b.is_ascii_digit());
        let mut is_float = false;

        // Fraction: `8.`, `8.5`, `.5` (the leading-dot form arrives
        // here with zero integer digits consumed).
        if self.cursor.peek() == Some(b'.') {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }

        // Exponent, Fortran flavoured: `1e5`, `0.5D-2`, `1d5`.
        if self.exponent_follows() {
            is_float = true;
            self.cursor.advance(); // e/E/d/D
            if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
                self.cursor.advance();
            }
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Token::new(kind, start, self.cursor.pos())
    }

    // ── String literals ───────────────────────────────────────────────

    /// Lex a quoted string. The token span includes the quotes; the
    /// grammar strips them. An unterminated quote yields `Error`.
    fn lex_quoted(&mut self, quote: u8, start: u32) -> Token {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                None => return Token::new(TokenKind::Error, start, self.cursor.pos()),
                Some(b) if b == quote => {
                    self.cursor.advance();
                    return Token::new(TokenKind::QuotedStr, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // ── Bare words ────────────────────────────────────────────────────

    /// Lex `[A-Za-z][A-Za-z0-9]*`. Stops at whitespace, `/`, quotes --
    /// anything that is not alphanumeric.
    fn lex_word(&mut self, start: u32) -> Token {
        self.cursor.advance(); // first letter
        self.cursor.eat_while(|b| b.is_ascii_alphanumeric());
        Token::new(TokenKind::Word, start, self.cursor.pos())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }

        if !self.pending.is_empty() {
            return Some(self.pending.remove(0));
        }

        let token = self.produce_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}
