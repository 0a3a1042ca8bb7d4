//! Visitor-driven depth-first traversal

use std::fs::{self, FileType};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{Node, NodeKind, TraversalResult, root_metadata};
use crate::{Error, Result};

/// Continuation signal returned by every [`DirectoryVisitor`] hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitControl {
    #[default]
    Continue,
    /// Do not descend into the directory just entered. Outside
    /// [`DirectoryVisitor::enter_directory`] this behaves like `Continue`.
    SkipSubtree,
    /// Stop the whole traversal immediately.
    Terminate,
}

/// Callbacks invoked by [`walk_tree`].
///
/// Directories get `enter_directory` before their children and
/// `leave_directory` after them. Every other node, symlinks included, gets
/// `visit_file`. Nodes that cannot be listed or inspected get
/// `visit_file_failed`.
pub trait DirectoryVisitor {
    fn enter_directory(&mut self, _dir: &Node) -> VisitControl {
        VisitControl::Continue
    }

    fn visit_file(&mut self, file: &Node) -> VisitControl;

    fn visit_file_failed(&mut self, path: &Path, error: &Error) -> VisitControl {
        warn!(path = %path.display(), error = %error, "visit failed");
        VisitControl::Continue
    }

    fn leave_directory(&mut self, _dir: &Node) -> VisitControl {
        VisitControl::Continue
    }
}

/// Visitor that tallies every node into a [`TraversalResult`].
#[derive(Debug, Default)]
pub struct CountingVisitor {
    result: TraversalResult,
}

impl CountingVisitor {
    pub fn into_result(self) -> TraversalResult {
        self.result
    }
}

impl DirectoryVisitor for CountingVisitor {
    fn enter_directory(&mut self, dir: &Node) -> VisitControl {
        self.result.record(dir.kind());
        VisitControl::Continue
    }

    fn visit_file(&mut self, file: &Node) -> VisitControl {
        self.result.record(file.kind());
        VisitControl::Continue
    }

    fn visit_file_failed(&mut self, path: &Path, error: &Error) -> VisitControl {
        warn!(path = %path.display(), error = %error, "skipping unreadable node");
        self.result.record_failure();
        VisitControl::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Terminate,
}

/// Walk `root` depth-first, driving `visitor`. Symlinks are never followed.
///
/// Returns `Ok(())` both when the tree is exhausted and when a hook
/// signals [`VisitControl::Terminate`].
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `root` does not exist, or
/// [`Error::Traversal`] if the root itself cannot be inspected.
pub fn walk_tree<V>(root: impl AsRef<Path>, visitor: &mut V) -> Result<()>
where
    V: DirectoryVisitor + ?Sized,
{
    let root = root.as_ref();
    let metadata = root_metadata(root)?;
    visit(root.to_path_buf(), metadata.file_type(), 0, visitor);
    Ok(())
}

fn visit<V>(path: PathBuf, file_type: FileType, depth: usize, visitor: &mut V) -> Flow
where
    V: DirectoryVisitor + ?Sized,
{
    let node = Node::new(path, NodeKind::from(file_type), depth);
    if !node.kind().is_directory() {
        return flow(visitor.visit_file(&node));
    }

    match visitor.enter_directory(&node) {
        VisitControl::Continue => {}
        VisitControl::SkipSubtree => return Flow::Continue,
        VisitControl::Terminate => return Flow::Terminate,
    }

    if visit_children(&node, visitor) == Flow::Terminate {
        return Flow::Terminate;
    }

    flow(visitor.leave_directory(&node))
}

fn visit_children<V>(dir: &Node, visitor: &mut V) -> Flow
where
    V: DirectoryVisitor + ?Sized,
{
    let children = match fs::read_dir(dir.path()) {
        Ok(children) => children,
        Err(e) => return report_failure(dir.path(), e, visitor),
    };

    for child in children {
        let child = match child {
            Ok(child) => child,
            Err(e) => {
                if report_failure(dir.path(), e, visitor) == Flow::Terminate {
                    return Flow::Terminate;
                }
                continue;
            }
        };

        let child_path = child.path();
        // DirEntry::file_type does not traverse symlinks.
        let outcome = match child.file_type() {
            Ok(file_type) => visit(child_path, file_type, dir.depth() + 1, visitor),
            Err(e) => report_failure(&child_path, e, visitor),
        };
        if outcome == Flow::Terminate {
            return Flow::Terminate;
        }
    }

    Flow::Continue
}

fn report_failure<V>(path: &Path, source: std::io::Error, visitor: &mut V) -> Flow
where
    V: DirectoryVisitor + ?Sized,
{
    let error = Error::traversal(path, source);
    flow(visitor.visit_file_failed(path, &error))
}

fn flow(control: VisitControl) -> Flow {
    match control {
        VisitControl::Terminate => Flow::Terminate,
        VisitControl::Continue | VisitControl::SkipSubtree => Flow::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records hook calls in order.
    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
    }

    impl DirectoryVisitor for Trace {
        fn enter_directory(&mut self, dir: &Node) -> VisitControl {
            self.events.push(format!("enter:{}", dir.depth()));
            VisitControl::Continue
        }

        fn visit_file(&mut self, file: &Node) -> VisitControl {
            self.events.push(format!("file:{}", file.depth()));
            VisitControl::Continue
        }

        fn leave_directory(&mut self, dir: &Node) -> VisitControl {
            self.events.push(format!("leave:{}", dir.depth()));
            VisitControl::Continue
        }
    }

    #[test]
    fn enter_and_leave_bracket_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let mut trace = Trace::default();
        walk_tree(dir.path(), &mut trace).unwrap();

        assert_eq!(trace.events, vec!["enter:0", "file:1", "leave:0"]);
    }

    #[test]
    fn file_root_only_visits_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "a").unwrap();

        let mut trace = Trace::default();
        walk_tree(&file, &mut trace).unwrap();

        assert_eq!(trace.events, vec!["file:0"]);
    }

    #[test]
    fn skip_subtree_on_root_suppresses_leave() {
        struct SkipAll(usize);
        impl DirectoryVisitor for SkipAll {
            fn enter_directory(&mut self, _dir: &Node) -> VisitControl {
                VisitControl::SkipSubtree
            }
            fn visit_file(&mut self, _file: &Node) -> VisitControl {
                self.0 += 1;
                VisitControl::Continue
            }
            fn leave_directory(&mut self, _dir: &Node) -> VisitControl {
                panic!("leave_directory after SkipSubtree");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let mut visitor = SkipAll(0);
        walk_tree(dir.path(), &mut visitor).unwrap();
        assert_eq!(visitor.0, 0);
    }
}
