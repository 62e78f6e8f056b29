//! Source locations.
//!
//! Every core-tree node carries a `Loc` recording where its surface syntax
//! came from. The desugarer preserves the location of the construct it
//! expanded, so diagnostics on desugared code still point at real source.

use std::fmt;

use serde::Serialize;

/// A position in a source file.
///
/// `line` and `column` are 1-based (what editors display); `offset` is the
/// 0-based byte offset into the file, used for span rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Loc {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Loc {
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32) -> Self {
        Loc {
            file: file.into(),
            line,
            column,
            offset,
        }
    }

    /// The start of a file. Used for synthetic nodes the desugarer inserts.
    pub fn start(file: impl Into<String>) -> Self {
        Loc::new(file, 1, 1, 0)
    }
}

impl Default for Loc {
    fn default() -> Self {
        Loc::start("<unknown>")
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
