use serde::{Deserialize, Serialize};
use std::fmt;

/// What a store probe found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Absent,
    File,
    Directory,
}

impl ItemKind {
    /// Returns true unless the probe found nothing.
    #[must_use]
    pub const fn exists(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::File => "file",
            Self::Directory => "directory",
        };
        f.write_str(name)
    }
}
