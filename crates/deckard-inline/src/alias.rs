//! PATHS alias table and `$alias` substitution.

use crate::error::InlineError;

/// Ordered table of `(name, expansion)` path aliases.
///
/// Insertion order is preserved and lookups search from the back, so a
/// re-inserted name shadows earlier entries -- set-like behaviour
/// without a map. Alias tables are tiny (a handful of entries) and an
/// alias tends to be used shortly after it is defined, so the reverse
/// linear search is also the fast order.
#[derive(Debug, Default)]
pub struct PathResolver {
    aliases: Vec<(String, String)>,
}

impl PathResolver {
    /// An empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `(name, expansion)` entries, preserving order.
    pub fn insert<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.aliases.extend(pairs);
    }

    /// Expand every `$name` fragment in `input`.
    ///
    /// An alias name runs from the `$` up to (but not including) the
    /// first `/`, `\` or `$`, so `$DIR/file` and `$A$B` both work. The
    /// expansion is spliced in verbatim -- it may itself contain
    /// separators, and no recursive expansion is performed.
    pub fn resolve(&self, input: &str) -> Result<String, InlineError> {
        let bytes = input.as_bytes();
        let mut path = String::with_capacity(input.len());
        let mut pos = 0;

        loop {
            let Some(dollar) = bytes[pos..].iter().position(|&b| b == b'$') else {
                path.push_str(&input[pos..]);
                return Ok(path);
            };
            let dollar = pos + dollar;
            path.push_str(&input[pos..dollar]);

            let name_end = bytes[dollar + 1..]
                .iter()
                .position(|&b| matches!(b, b'/' | b'\\' | b'$'))
                .map(|i| dollar + 1 + i)
                .unwrap_or(bytes.len());
            let name = &input[dollar + 1..name_end];

            let expansion = self
                .aliases
                .iter()
                .rev()
                .find(|(alias, _)| alias == name)
                .map(|(_, expansion)| expansion.as_str())
                .ok_or_else(|| InlineError::UnknownAlias {
                    alias: name.to_string(),
                    path: input.to_string(),
                })?;
            path.push_str(expansion);

            // The terminating delimiter is emitted by the next round.
            pos = name_end;
            if pos == bytes.len() {
                return Ok(path);
            }
        }
    }
}
