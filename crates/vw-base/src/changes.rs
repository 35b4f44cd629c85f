//! Change metadata shared between the git provider and the tree builder.
//!
//! A [`ChangeMap`] keys watch-root-relative file paths (always `/`-separated)
//! to a change magnitude. Positive values count changed lines, zero or absent
//! means unchanged, and [`NEW_FILE_MAGNITUDE`] marks an untracked file whose
//! size was never measured.

use std::collections::HashMap;

/// Reserved magnitude for new/untracked files.
pub const NEW_FILE_MAGNITUDE: i32 = -1;

/// Relative path → change magnitude. Replaced wholesale on every refresh.
pub type ChangeMap = HashMap<String, i32>;

/// Add `magnitude` to whatever is already recorded for `path`.
/// A file reported by both the staged and unstaged diffs gets the sum.
pub fn add_magnitude(map: &mut ChangeMap, path: &str, magnitude: i32) {
    let entry = map.entry(path.to_string()).or_insert(0);
    if *entry == NEW_FILE_MAGNITUDE {
        return;
    }
    *entry += magnitude.max(0);
}

/// Decoration derived from a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeMark {
    /// Tracked file with this many changed lines.
    Lines(u32),
    /// Untracked file.
    New,
}

impl ChangeMark {
    pub fn from_magnitude(magnitude: i32) -> Option<Self> {
        match magnitude {
            NEW_FILE_MAGNITUDE => Some(Self::New),
            n if n > 0 => Some(Self::Lines(n as u32)),
            _ => None,
        }
    }

    pub fn lookup(map: &ChangeMap, path: &str) -> Option<Self> {
        map.get(path).copied().and_then(Self::from_magnitude)
    }

    /// Suffix appended after the file name, including the leading space.
    pub fn label(&self) -> String {
        match self {
            Self::Lines(n) => format!(" (+{})", n),
            Self::New => " (new)".to_string(),
        }
    }
}
