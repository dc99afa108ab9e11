//! Glob-style file name patterns.
//!
//! Pipeline outputs are located by shell-style patterns such as
//! `S1.aln*metrics` or `2*_[1-8]_[12]_sequence.txt.gz`. A [`Pattern`] compiles
//! one of these into an anchored [`Regex`] and matches it against the file
//! names within a single directory (no recursion). Supported syntax:
//!
//! * `*` matches any run of characters (including none),
//! * `?` matches exactly one character,
//! * `[...]` matches one character from the class (`[!...]` negates it).
//!
//! Every other character matches literally, so sample identifiers containing
//! regex metacharacters are safe to interpolate.
//!
//! ```
//! use ngs_accounting::utils::pattern::Pattern;
//!
//! let pattern = Pattern::new("S1.aln*metrics").unwrap();
//! assert!(pattern.matches("S1.aln.chr1.md.metrics"));
//! assert!(!pattern.matches("S1xaln.metrics"));
//! ```

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use regex::Regex;

use crate::errors::Error;

/// A compiled glob-style file name pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    glob: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a glob-style pattern.
    pub fn new(glob: &str) -> anyhow::Result<Self> {
        let mut expr = String::from("^");
        let mut chars = glob.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                '[' => {
                    let mut class = String::new();
                    let mut closed = false;

                    if chars.peek() == Some(&'!') {
                        chars.next();
                        class.push('^');
                    }

                    for c in chars.by_ref() {
                        match c {
                            ']' => {
                                closed = true;
                                break;
                            }
                            '\\' | '^' | '[' | '&' | '~' => {
                                class.push('\\');
                                class.push(c);
                            }
                            _ => class.push(c),
                        }
                    }

                    if !closed {
                        bail!("unclosed character class in pattern: {}", glob);
                    }

                    expr.push('[');
                    expr.push_str(&class);
                    expr.push(']');
                }
                c => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }

        expr.push('$');

        let regex =
            Regex::new(&expr).with_context(|| format!("compiling file pattern: {}", glob))?;

        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// The glob this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Indicates whether a file name matches the pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

/// Escapes the glob metacharacters of `literal` so that it only matches
/// itself when interpolated into a glob.
pub fn escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());

    for c in literal.chars() {
        match c {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            c => escaped.push(c),
        }
    }

    escaped
}

/// Lists the regular files in `dir` whose names match `pattern`, sorted by
/// path. A directory that cannot be listed is an error; an empty match is not.
pub fn matching_files(dir: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::missing_source(dir, e))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::missing_source(dir, e))?;
        let name = entry.file_name();

        if let Some(name) = name.to_str() {
            if pattern.matches(name) && entry.path().is_file() {
                matches.push(entry.path());
            }
        }
    }

    matches.sort();
    Ok(matches)
}
