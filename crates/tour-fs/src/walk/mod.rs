//! Directory traversal and aggregation
//!
//! Two traversal strategies are offered over the same tree:
//!
//! - [`entries`]: a lazy sequence of every node beneath a root, root included.
//! - [`walk_tree`]: a depth-first walk that drives a [`DirectoryVisitor`].
//!
//! [`DirectoryWalker`] wraps both behind one counting entry point. Neither
//! strategy follows symbolic links; a link is a leaf and counts as a file.

mod stream;
mod visitor;

use std::fmt;
use std::fs::{self, FileType, Metadata};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

pub use stream::{Entries, count_entries, entries};
pub use visitor::{CountingVisitor, DirectoryVisitor, VisitControl, walk_tree};

/// What kind of filesystem node was encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

impl NodeKind {
    pub fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl From<FileType> for NodeKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// A node encountered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    path: PathBuf,
    kind: NodeKind,
    depth: usize,
}

impl Node {
    pub fn new(path: impl Into<PathBuf>, kind: NodeKind, depth: usize) -> Self {
        Self {
            path: path.into(),
            kind,
            depth,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Distance from the traversal root; the root itself is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Aggregate counts produced by a traversal.
///
/// `total_entries` always equals `directory_count + file_count`. Nodes whose
/// visit failed are tallied only in `failed_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalResult {
    pub total_entries: u64,
    pub directory_count: u64,
    pub file_count: u64,
    pub failed_count: u64,
}

impl TraversalResult {
    /// Count one successfully visited node.
    pub fn record(&mut self, kind: NodeKind) {
        self.total_entries += 1;
        if kind.is_directory() {
            self.directory_count += 1;
        } else {
            self.file_count += 1;
        }
    }

    /// Count one node that could not be read.
    pub fn record_failure(&mut self) {
        self.failed_count += 1;
    }

    /// True when every node was visited without error.
    pub fn is_complete(&self) -> bool {
        self.failed_count == 0
    }
}

impl fmt::Display for TraversalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries ({} directories, {} files, {} failed)",
            self.total_entries, self.directory_count, self.file_count, self.failed_count
        )
    }
}

/// Traversal strategy used by [`DirectoryWalker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Lazy enumeration via [`entries`].
    #[default]
    Stream,
    /// Visitor callbacks via [`walk_tree`].
    Visitor,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => write!(f, "stream"),
            Self::Visitor => write!(f, "visitor"),
        }
    }
}

/// Counts directories and files beneath a root.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryWalker {
    strategy: Strategy,
}

impl DirectoryWalker {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Walk `root` and count everything beneath it, root included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `root` does not exist, or
    /// [`Error::Traversal`] if the root itself cannot be inspected.
    /// Failures on nodes below the root are counted, not returned.
    pub fn walk(&self, root: impl AsRef<Path>) -> Result<TraversalResult> {
        let root = root.as_ref();
        debug!(root = %root.display(), strategy = %self.strategy, "walking directory tree");

        let result = match self.strategy {
            Strategy::Stream => count_entries(root)?,
            Strategy::Visitor => {
                let mut counter = CountingVisitor::default();
                walk_tree(root, &mut counter)?;
                counter.into_result()
            }
        };

        debug!(root = %root.display(), %result, "walk finished");
        Ok(result)
    }
}

/// Stat the traversal root without following a final symlink.
fn root_metadata(root: &Path) -> Result<Metadata> {
    fs::symlink_metadata(root).map_err(|e| match Error::io(root, e) {
        Error::Io { path, source } => Error::traversal(path, source),
        other => other,
    })
}
