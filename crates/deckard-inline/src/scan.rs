//! Two-pattern keyword scanner.
//!
//! Finds the next line-leading `INCLUDE` or `PATHS` in a byte range
//! without tokenizing anything else. The overwhelming majority of deck
//! bytes are digits, blanks and punctuation, so the scanner probes only
//! every fifth byte: if the probed byte belongs to the combined letter
//! set of the two keywords, it rewinds by a per-letter offset to where
//! the keyword would have to start and verifies an exact match there.
//!
//! The probe stride equals the length of `PATHS`, the shorter pattern,
//! so no placement of either keyword can fall between probes. The two
//! keywords share no letters, which is what makes a single rewind table
//! unambiguous.

/// Per-letter rewind distances, indexed by `byte - b'A'` for `A..=U`.
///
/// For every letter of `PATHS` and `INCLUDE` this is its offset within
/// the keyword; probing any byte of a keyword and rewinding lands on
/// the `P` or `I`. Letters in neither keyword rewind 0 and are filtered
/// by the membership check before the table is consulted.
const REWINDS: [usize; 21] = [
    1, 0, 2, 5, 6, 0, 0, 3, // A B C D E F G H
    0, 0, 0, 3, 0, 1, 0, 0, // I J K L M N O P
    0, 0, 4, 2, 4, // Q R S T U
];

const STRIDE: usize = 5;

fn in_letter_set(b: u8) -> bool {
    matches!(
        b,
        b'P' | b'A' | b'T' | b'H' | b'S' | b'I' | b'N' | b'C' | b'L' | b'U' | b'D' | b'E'
    )
}

fn rewind(b: u8) -> usize {
    REWINDS[(b - b'A') as usize]
}

/// Find the first `INCLUDE` or `PATHS` directive within `[begin, end)`
/// of `bytes`, returning the offset of its `I` or `P`. Returns `end`
/// when the range holds no directive.
///
/// A match must be the first non-blank thing on its line (or sit at
/// `begin`), and must not be followed by an alphanumeric byte, so
/// occurrences inside `--` comments and words like `INCLUDED` are
/// skipped over.
pub fn find_directive(bytes: &[u8], begin: usize, end: usize) -> usize {
    debug_assert!(begin <= end && end <= bytes.len());

    let mut probe = begin + STRIDE - 1;
    loop {
        if probe >= end {
            return end;
        }

        let b = bytes[probe];
        if !in_letter_set(b) {
            probe += STRIDE;
            continue;
        }

        // Partial match: rewind to the presumed keyword start. A rewind
        // that would cross `begin` cannot be a directive of this range.
        let skip = rewind(b);
        if skip <= probe - begin {
            let cur = probe - skip;
            if is_candidate(bytes, begin, end, cur) {
                return cur;
            }
        }

        probe += STRIDE;
    }
}

fn is_candidate(bytes: &[u8], begin: usize, end: usize, cur: usize) -> bool {
    let first = bytes[cur];
    if first != b'P' && first != b'I' {
        return false;
    }

    // With fewer than 10 bytes left no complete directive fits, and
    // ruling that out up front keeps every later index in bounds.
    if end - cur < 10 {
        return false;
    }

    let keyword_len = match first {
        b'I' if &bytes[cur + 1..cur + 7] == b"NCLUDE" => 7,
        b'P' if &bytes[cur + 1..cur + 5] == b"ATHS" => 5,
        _ => return false,
    };

    // Whole-word: `INCLUDED` or `PATHS3` is deck data, not a directive.
    if bytes[cur + keyword_len].is_ascii_alphanumeric() {
        return false;
    }

    // Line-leading: only blanks may precede the keyword on its line.
    // A keyword at `begin` is accepted outright, and a run of blanks
    // reaching all the way back to `begin` counts as line-leading too
    // (ranges always start at a file or line boundary).
    bytes[begin..cur]
        .iter()
        .rev()
        .find(|&&b| b != b' ' && b != b'\t')
        .map_or(true, |&b| b == b'\n')
}
