//! INCLUDE and PATHS directive parsing.
//!
//! These run directly over the raw bytes of a mapped file, between the
//! position the scanner reported and the end of the directive. Every
//! `/` consumes the remainder of its line, exactly as the record
//! grammar treats slashes, so a directive never leaks its trailing
//! comment into the flattened output.

use crate::error::InlineError;

/// Parse `INCLUDE 'path' /` starting at the `I`.
///
/// Returns the raw (unresolved) path string and the offset just past
/// the directive's final line.
pub fn parse_include(bytes: &[u8], at: usize, end: usize) -> Result<(String, usize), InlineError> {
    let malformed = |reason, offset| InlineError::MalformedDirective {
        directive: "INCLUDE",
        reason,
        offset,
    };

    let mut pos = at + "INCLUDE".len();
    pos = skip_trivia(bytes, pos, end);

    let (path, next) = read_string(bytes, pos, end)
        .ok_or_else(|| malformed("expected a path string", pos))?;
    pos = skip_trivia(bytes, next, end);

    if pos >= end || bytes[pos] != b'/' {
        return Err(malformed("missing terminating `/`", pos));
    }
    pos = skip_line(bytes, pos + 1, end);

    Ok((path, pos))
}

/// Parse a `PATHS` block starting at the `P`:
/// one or more `'name' 'expansion' /` entries and a closing `/`.
///
/// Returns the alias pairs in order and the offset just past the
/// block's final line.
pub fn parse_paths(
    bytes: &[u8],
    at: usize,
    end: usize,
) -> Result<(Vec<(String, String)>, usize), InlineError> {
    let malformed = |reason, offset| InlineError::MalformedDirective {
        directive: "PATHS",
        reason,
        offset,
    };

    let mut pos = at + "PATHS".len();
    let mut pairs = Vec::new();

    loop {
        pos = skip_trivia(bytes, pos, end);
        if pos >= end {
            return Err(malformed("unterminated block", pos));
        }

        if bytes[pos] == b'/' {
            if pairs.is_empty() {
                return Err(malformed("block holds no entries", pos));
            }
            pos = skip_line(bytes, pos + 1, end);
            return Ok((pairs, pos));
        }

        let (name, next) = read_string(bytes, pos, end)
            .ok_or_else(|| malformed("expected an alias name", pos))?;
        pos = skip_trivia(bytes, next, end);

        let (expansion, next) = read_string(bytes, pos, end)
            .ok_or_else(|| malformed("alias entry missing its expansion", pos))?;
        pos = skip_trivia(bytes, next, end);

        if pos >= end || bytes[pos] != b'/' {
            return Err(malformed("alias entry missing its `/`", pos));
        }
        pos = skip_line(bytes, pos + 1, end);

        pairs.push((name, expansion));
    }
}

/// Skip blanks, newlines and `--` comments.
fn skip_trivia(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            b'-' if pos + 1 < end && bytes[pos + 1] == b'-' => {
                pos = skip_line(bytes, pos + 2, end);
            }
            _ => break,
        }
    }
    pos
}

/// Skip to just past the next newline (or to `end`).
fn skip_line(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos] != b'\n' {
        pos += 1;
    }
    if pos < end {
        pos += 1;
    }
    pos
}

/// Read a quoted (`'...'` / `"..."`) or bare string at `pos`.
///
/// Bare strings run to the next blank or `/`. Returns `None` when no
/// string starts here or a quote is left unterminated on its line.
fn read_string(bytes: &[u8], pos: usize, end: usize) -> Option<(String, usize)> {
    if pos >= end {
        return None;
    }

    match bytes[pos] {
        quote @ (b'\'' | b'"') => {
            let mut cur = pos + 1;
            while cur < end && bytes[cur] != quote && bytes[cur] != b'\n' {
                cur += 1;
            }
            if cur >= end || bytes[cur] != quote {
                return None;
            }
            let text = String::from_utf8_lossy(&bytes[pos + 1..cur]).into_owned();
            Some((text, cur + 1))
        }
        b'/' => None,
        _ => {
            let mut cur = pos;
            while cur < end && !matches!(bytes[cur], b' ' | b'\t' | b'\r' | b'\n' | b'/') {
                cur += 1;
            }
            if cur == pos {
                return None;
            }
            let text = String::from_utf8_lossy(&bytes[pos..cur]).into_owned();
            Some((text, cur))
        }
    }
}
