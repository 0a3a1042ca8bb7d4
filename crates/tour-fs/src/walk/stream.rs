//! Lazy full-tree enumeration backed by `walkdir`

use std::io;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use super::{Node, NodeKind, TraversalResult, root_metadata};
use crate::{Error, Result};

/// Lazy sequence of every node beneath a root, the root included.
///
/// Per-node failures are yielded as [`Error::Traversal`] items and the
/// iteration carries on with the remaining siblings.
pub struct Entries {
    inner: walkdir::IntoIter,
}

impl Iterator for Entries {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| match entry {
            Ok(entry) => Ok(Node::new(
                entry.path(),
                NodeKind::from(entry.file_type()),
                entry.depth(),
            )),
            Err(e) => Err(traversal_error(e)),
        })
    }
}

fn traversal_error(err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    Error::traversal(path, io::Error::from(err))
}

/// Enumerate every node beneath `root` without following symlinks.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `root` does not exist.
pub fn entries(root: impl AsRef<Path>) -> Result<Entries> {
    let root = root.as_ref();
    root_metadata(root)?;

    let inner = WalkDir::new(root)
        .follow_links(false)
        .follow_root_links(false)
        .into_iter();
    Ok(Entries { inner })
}

/// Count the nodes produced by [`entries`].
pub fn count_entries(root: impl AsRef<Path>) -> Result<TraversalResult> {
    let mut result = TraversalResult::default();
    for node in entries(root)? {
        match node {
            Ok(node) => result.record(node.kind()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable node");
                result.record_failure();
            }
        }
    }
    Ok(result)
}
