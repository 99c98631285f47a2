// Deck preprocessor -- flattens an INCLUDE tree into one byte stream.
//
// Decks reference other files via INCLUDE directives whose paths may
// use $aliases declared in PATHS blocks. Flattening walks that tree
// depth-first, copying every byte that is not part of a directive
// verbatim, so the output parses exactly like a hand-inlined deck.

mod alias;
mod directive;
mod error;
mod scan;
mod source;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

pub use alias::PathResolver;
pub use error::InlineError;
pub use scan::find_directive;
pub use source::{Loader, ReadLoader, SourceBytes};

/// The result of flattening a deck.
#[derive(Debug)]
pub struct Inlined {
    /// The concatenated deck text, directives removed.
    pub bytes: Vec<u8>,
    /// Every file read, root first, then in depth-first include order.
    pub visited: Vec<PathBuf>,
}

/// A pending slice of work: a byte range of one loaded file.
///
/// The handle is reference-counted; the tail of a file that contained
/// an INCLUDE and the included file each hold their own handle, so a
/// file closes exactly when the last range over it is exhausted.
struct Region {
    file: Rc<dyn SourceBytes>,
    begin: usize,
    end: usize,
    /// Directory of this file; relative includes resolve against it.
    dir: Rc<PathBuf>,
}

/// Flatten the deck rooted at `path` using plain file reads.
pub fn concatenate(path: impl AsRef<Path>) -> Result<Inlined, InlineError> {
    concatenate_with(path.as_ref(), &ReadLoader)
}

/// Flatten the deck rooted at `path`, loading files through `loader`.
///
/// The work stack holds byte ranges in LIFO order: when an INCLUDE is
/// hit, the remainder of the enclosing file is pushed first and the
/// included file second, so the include is expanded in place and the
/// output is the depth-first pre-order of the include tree. Aliases
/// from a PATHS block are visible to every directive flattened after
/// it, which is exactly the textual order of the original deck.
pub fn concatenate_with(path: &Path, loader: &dyn Loader) -> Result<Inlined, InlineError> {
    let root = loader.load(path).map_err(|source| InlineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root_dir = Rc::new(parent_dir(path));
    let root_len = root.bytes().len();

    let mut aliases = PathResolver::new();
    let mut visited = vec![path.to_path_buf()];
    let mut output = Vec::with_capacity(root_len);
    let mut work = vec![Region {
        file: root,
        begin: 0,
        end: root_len,
        dir: root_dir,
    }];

    while let Some(region) = work.pop() {
        let data = region.file.bytes();

        let cursor = find_directive(data, region.begin, region.end);
        output.extend_from_slice(&data[region.begin..cursor]);

        // Range exhausted; the file handle drops with the region.
        if cursor == region.end {
            continue;
        }

        if data[cursor] == b'I' {
            let (raw, next) = directive::parse_include(data, cursor, region.end)?;
            work.push(Region {
                file: region.file.clone(),
                begin: next,
                end: region.end,
                dir: region.dir.clone(),
            });

            let resolved = aliases.resolve(&raw)?;
            let full = loader.normalize(&region.dir, &resolved);
            debug!(path = %full.display(), "expanding include");

            let file = loader.load(&full).map_err(|source| InlineError::Io {
                path: full.clone(),
                source,
            })?;
            let len = file.bytes().len();
            let dir = Rc::new(parent_dir(&full));
            visited.push(full);
            work.push(Region {
                file,
                begin: 0,
                end: len,
                dir,
            });
        } else {
            let (pairs, next) = directive::parse_paths(data, cursor, region.end)?;
            debug!(entries = pairs.len(), "registering path aliases");
            aliases.insert(pairs);
            work.push(Region {
                file: region.file.clone(),
                begin: next,
                end: region.end,
                dir: region.dir.clone(),
            });
        }
    }

    Ok(Inlined {
        bytes: output,
        visited,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    /// In-memory loader: the preprocessor against a fake filesystem.
    #[derive(Default)]
    struct MemLoader {
        files: HashMap<PathBuf, Vec<u8>>,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl MemLoader {
        fn file(mut self, path: &str, bytes: impl AsRef<[u8]>) -> Self {
            self.files.insert(PathBuf::from(path), bytes.as_ref().to_vec());
            self
        }
    }

    impl Loader for MemLoader {
        fn load(&self, path: &Path) -> io::Result<Rc<dyn SourceBytes>> {
            self.opened.borrow_mut().push(path.to_path_buf());
            match self.files.get(path) {
                Some(bytes) => Ok(Rc::new(bytes.clone())),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            }
        }
    }

    #[test]
    fn no_directives_copies_verbatim() {
        let loader = MemLoader::default().file("root.data", b"RUNSPEC\nOIL\nWATER\n");
        let cat = concatenate_with(Path::new("root.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"RUNSPEC\nOIL\nWATER\n");
        assert_eq!(cat.visited, vec![PathBuf::from("root.data")]);
    }

    #[test]
    fn include_expands_in_place() {
        let loader = MemLoader::default()
            .file("root.data", b"RUNSPEC\nINCLUDE\n 'inc.data' /\nWATER\n")
            .file("inc.data", b"OIL\n");
        let cat = concatenate_with(Path::new("root.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"RUNSPEC\nOIL\nWATER\n");
        assert_eq!(
            cat.visited,
            vec![PathBuf::from("root.data"), PathBuf::from("inc.data")]
        );
        // Loads happen in the same order the files are visited.
        assert_eq!(*loader.opened.borrow(), cat.visited);
    }

    #[test]
    fn nested_includes_flatten_depth_first() {
        let loader = MemLoader::default()
            .file("a.data", b"1\nINCLUDE 'b.data' /\n4\nINCLUDE 'd.data' /\n")
            .file("b.data", b"2\nINCLUDE 'c.data' /\n")
            .file("c.data", b"3\n")
            .file("d.data", b"5\n");
        let cat = concatenate_with(Path::new("a.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"1\n2\n3\n4\n5\n");
        let names: Vec<_> = cat.visited.iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(names, vec!["a.data", "b.data", "c.data", "d.data"]);
    }

    #[test]
    fn paths_aliases_reach_later_includes() {
        let loader = MemLoader::default()
            .file("root.data", b"PATHS\n 'D' 'sub' /\n/\nINCLUDE\n '$D/inc.data' /\n")
            .file("sub/inc.data", b"RUNSPEC\nOIL\n");
        let cat = concatenate_with(Path::new("root.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"RUNSPEC\nOIL\n");
        let names: Vec<_> = cat.visited.iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(names, vec!["root.data", "sub/inc.data"]);
    }

    #[test]
    fn aliases_from_included_file_reach_the_parent_tail() {
        // DFS order: a PATHS block inside an include is visible to
        // directives after the include in the enclosing file.
        let loader = MemLoader::default()
            .file("root.data", b"INCLUDE 'defs.data' /\nINCLUDE '$D/body.data' /\n")
            .file("defs.data", b"PATHS\n 'D' 'sub' /\n/\n")
            .file("sub/body.data", b"OIL\n");
        let cat = concatenate_with(Path::new("root.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"OIL\n");
    }

    #[test]
    fn newest_alias_wins_across_blocks() {
        let loader = MemLoader::default()
            .file(
                "root.data",
                b"PATHS\n 'D' 'old' /\n/\nPATHS\n 'D' 'new' /\n/\nINCLUDE '$D/x.data' /\n",
            )
            .file("new/x.data", b"OIL\n");
        let cat = concatenate_with(Path::new("root.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"OIL\n");
    }

    #[test]
    fn relative_include_resolves_against_enclosing_file() {
        let loader = MemLoader::default()
            .file("top/root.data", b"INCLUDE 'sub/a.data' /\n")
            .file("top/sub/a.data", b"INCLUDE 'b.data' /\n")
            .file("top/sub/b.data", b"OIL\n");
        let cat = concatenate_with(Path::new("top/root.data"), &loader).unwrap();
        assert_eq!(cat.bytes, b"OIL\n");
    }

    #[test]
    fn missing_include_is_io_error_with_path() {
        let loader = MemLoader::default().file("root.data", b"INCLUDE 'void.data' /\n");
        let err = concatenate_with(Path::new("root.data"), &loader).unwrap_err();
        match err {
            InlineError::Io { path, .. } => assert_eq!(path, PathBuf::from("void.data")),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn unknown_alias_propagates() {
        let loader = MemLoader::default().file("root.data", b"INCLUDE '$NOPE/x.data' /\n");
        let err = concatenate_with(Path::new("root.data"), &loader).unwrap_err();
        assert!(matches!(err, InlineError::UnknownAlias { alias, .. } if alias == "NOPE"));
    }

    #[test]
    fn malformed_include_propagates() {
        let loader = MemLoader::default().file("root.data", b"INCLUDE 'x.data'\nOIL\n");
        let err = concatenate_with(Path::new("root.data"), &loader).unwrap_err();
        assert!(matches!(err, InlineError::MalformedDirective { .. }));
    }

    #[test]
    fn output_length_is_sum_of_non_directive_spans() {
        let body_a: &[u8] = b"RUNSPEC\nDIMENS\n 10 20 30 /\n";
        let body_b: &[u8] = b"OIL\nWATER\n";
        let root = [body_a, b"INCLUDE 'b.data' /\n".as_slice()].concat();
        let loader = MemLoader::default()
            .file("a.data", root.as_slice())
            .file("b.data", body_b);
        let cat = concatenate_with(Path::new("a.data"), &loader).unwrap();
        assert_eq!(cat.bytes.len(), body_a.len() + body_b.len());
    }
}
