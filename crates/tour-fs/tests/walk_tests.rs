//! Directory walking: both strategies against fixture trees

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::rstest;
use tour_fs::walk::{self, walk_tree};
use tour_fs::{DirectoryVisitor, DirectoryWalker, Error, Node, NodeKind, Strategy, VisitControl};
use tour_test_utils::TestTree;

fn sample_tree() -> TestTree {
    let mut tree = TestTree::new();
    tree.file("someFile.txt", "line one\nline two\n")
        .file("username.csv", "# header\nalice;1;Alice;Smith\n")
        .file("nested/a.txt", "a")
        .file("nested/deeper/b.txt", "b")
        .file("nested/deeper/c.txt", "c")
        .dir("empty");
    tree
}

#[rstest]
#[case::stream(Strategy::Stream)]
#[case::visitor(Strategy::Visitor)]
fn counts_match_fixture(#[case] strategy: Strategy) {
    let tree = sample_tree();

    let result = DirectoryWalker::new(strategy).walk(tree.root()).unwrap();

    assert_eq!(result.directory_count, tree.expected_directories());
    assert_eq!(result.file_count, tree.expected_files());
    assert_eq!(result.total_entries, tree.expected_total());
    assert_eq!(result.failed_count, 0);
}

#[test]
fn strategies_agree() {
    let tree = sample_tree();

    let stream = DirectoryWalker::new(Strategy::Stream).walk(tree.root()).unwrap();
    let visitor = DirectoryWalker::new(Strategy::Visitor).walk(tree.root()).unwrap();

    assert_eq!(stream, visitor);
}

#[test]
fn file_count_is_not_directory_count() {
    let mut tree = TestTree::new();
    tree.file("one.txt", "1").file("two.txt", "2").file("three.txt", "3");

    let result = DirectoryWalker::default().walk(tree.root()).unwrap();

    assert_eq!(result.directory_count, 1);
    assert_eq!(result.file_count, 3);
}

#[test]
fn empty_root_counts_only_itself() {
    let tree = TestTree::new();

    let result = DirectoryWalker::new(Strategy::Visitor).walk(tree.root()).unwrap();

    assert_eq!(result.total_entries, 1);
    assert_eq!(result.directory_count, 1);
    assert_eq!(result.file_count, 0);
}

#[rstest]
#[case::stream(Strategy::Stream)]
#[case::visitor(Strategy::Visitor)]
fn missing_root_is_not_found(#[case] strategy: Strategy) {
    let tree = TestTree::new();

    let err = DirectoryWalker::new(strategy)
        .walk(tree.path("files"))
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "unexpected error: {err}");
}

#[test]
fn lazy_sequence_includes_root_and_all_nodes() {
    let tree = sample_tree();

    let mut paths: Vec<PathBuf> = walk::entries(tree.root())
        .unwrap()
        .map(|node| node.unwrap().into_path())
        .collect();
    paths.sort();

    assert_eq!(paths.len() as u64, tree.expected_total());
    assert_eq!(paths[0], tree.root());
    assert!(paths.contains(&tree.path("nested/deeper/c.txt")));
    assert!(paths.contains(&tree.path("empty")));
}

/// Collects visited file paths and skips a chosen directory.
struct SkipDir {
    skip: PathBuf,
    visited: Vec<PathBuf>,
    entered: Vec<PathBuf>,
    left: Vec<PathBuf>,
}

impl SkipDir {
    fn new(skip: PathBuf) -> Self {
        Self {
            skip,
            visited: Vec::new(),
            entered: Vec::new(),
            left: Vec::new(),
        }
    }
}

impl DirectoryVisitor for SkipDir {
    fn enter_directory(&mut self, dir: &Node) -> VisitControl {
        self.entered.push(dir.path().to_path_buf());
        if dir.path() == self.skip {
            VisitControl::SkipSubtree
        } else {
            VisitControl::Continue
        }
    }

    fn visit_file(&mut self, file: &Node) -> VisitControl {
        self.visited.push(file.path().to_path_buf());
        VisitControl::Continue
    }

    fn leave_directory(&mut self, dir: &Node) -> VisitControl {
        self.left.push(dir.path().to_path_buf());
        VisitControl::Continue
    }
}

#[test]
fn skip_subtree_hides_descendants() {
    let tree = sample_tree();
    let skipped = tree.path("nested");
    let mut visitor = SkipDir::new(skipped.clone());

    walk_tree(tree.root(), &mut visitor).unwrap();

    assert!(
        visitor.visited.iter().all(|p| !p.starts_with(&skipped)),
        "visited inside skipped dir: {:?}",
        visitor.visited
    );
    assert!(!visitor.entered.contains(&tree.path("nested/deeper")));
    assert!(!visitor.left.contains(&skipped));
    assert!(visitor.visited.contains(&tree.path("someFile.txt")));
    assert!(visitor.visited.contains(&tree.path("username.csv")));
}

/// Stops after the first file.
#[derive(Default)]
struct StopAfterFirstFile {
    calls_after_stop: usize,
    stopped: bool,
}

impl StopAfterFirstFile {
    fn note_call(&mut self) {
        if self.stopped {
            self.calls_after_stop += 1;
        }
    }
}

impl DirectoryVisitor for StopAfterFirstFile {
    fn enter_directory(&mut self, _dir: &Node) -> VisitControl {
        self.note_call();
        VisitControl::Continue
    }

    fn visit_file(&mut self, _file: &Node) -> VisitControl {
        self.note_call();
        self.stopped = true;
        VisitControl::Terminate
    }

    fn visit_file_failed(&mut self, _path: &Path, _error: &Error) -> VisitControl {
        self.note_call();
        VisitControl::Continue
    }

    fn leave_directory(&mut self, _dir: &Node) -> VisitControl {
        self.note_call();
        VisitControl::Continue
    }
}

#[test]
fn terminate_halts_immediately() {
    let tree = sample_tree();
    let mut visitor = StopAfterFirstFile::default();

    walk_tree(tree.root(), &mut visitor).unwrap();

    assert!(visitor.stopped);
    assert_eq!(visitor.calls_after_stop, 0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Enter,
    File,
    Leave,
}

/// Records every hook call and answers `control` from one hook at `target`.
struct Scripted {
    hook: Hook,
    target: PathBuf,
    control: VisitControl,
    calls: Vec<(Hook, PathBuf)>,
}

impl Scripted {
    fn new(hook: Hook, target: PathBuf, control: VisitControl) -> Self {
        Self {
            hook,
            target,
            control,
            calls: Vec::new(),
        }
    }

    fn answer(&mut self, hook: Hook, node: &Node) -> VisitControl {
        self.calls.push((hook, node.path().to_path_buf()));
        if hook == self.hook && node.path() == self.target {
            self.control
        } else {
            VisitControl::Continue
        }
    }

    fn count(&self, hook: Hook) -> u64 {
        self.calls.iter().filter(|(h, _)| *h == hook).count() as u64
    }
}

impl DirectoryVisitor for Scripted {
    fn enter_directory(&mut self, dir: &Node) -> VisitControl {
        self.answer(Hook::Enter, dir)
    }

    fn visit_file(&mut self, file: &Node) -> VisitControl {
        self.answer(Hook::File, file)
    }

    fn leave_directory(&mut self, dir: &Node) -> VisitControl {
        self.answer(Hook::Leave, dir)
    }
}

#[rstest]
#[case::from_enter_directory(Hook::Enter, "nested")]
#[case::from_leave_directory(Hook::Leave, "nested")]
#[case::from_visit_file(Hook::File, "someFile.txt")]
fn terminate_stops_at_the_answering_hook(#[case] hook: Hook, #[case] target: &str) {
    let tree = sample_tree();
    let target = tree.path(target);
    let mut visitor = Scripted::new(hook, target.clone(), VisitControl::Terminate);

    walk_tree(tree.root(), &mut visitor).unwrap();

    assert_eq!(visitor.calls.last(), Some(&(hook, target.clone())));
    assert!(!visitor.calls.contains(&(Hook::Leave, tree.root().to_path_buf())));
    if hook == Hook::Enter {
        assert!(
            visitor
                .calls
                .iter()
                .all(|(_, p)| *p == target || !p.starts_with(&target)),
            "children of terminated directory were visited: {:?}",
            visitor.calls
        );
    }
}

#[rstest]
#[case::from_visit_file(Hook::File, "someFile.txt")]
#[case::from_leave_directory(Hook::Leave, "nested")]
fn skip_subtree_outside_enter_directory_continues(#[case] hook: Hook, #[case] target: &str) {
    let tree = sample_tree();
    let mut visitor = Scripted::new(hook, tree.path(target), VisitControl::SkipSubtree);

    walk_tree(tree.root(), &mut visitor).unwrap();

    assert_eq!(visitor.count(Hook::Enter), tree.expected_directories());
    assert_eq!(visitor.count(Hook::Leave), tree.expected_directories());
    assert_eq!(visitor.count(Hook::File), tree.expected_files());
    assert_eq!(
        visitor.calls.last(),
        Some(&(Hook::Leave, tree.root().to_path_buf()))
    );
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::stream(Strategy::Stream)]
    #[case::visitor(Strategy::Visitor)]
    fn links_are_leaves_and_not_followed(#[case] strategy: Strategy) {
        let mut tree = TestTree::new();
        tree.file("real/inner.txt", "x")
            .symlink("link_to_dir", "real")
            .symlink("real/loop", "..");

        let result = DirectoryWalker::new(strategy).walk(tree.root()).unwrap();

        assert_eq!(result.directory_count, tree.expected_directories());
        assert_eq!(result.file_count, tree.expected_files());
        assert_eq!(result.file_count, 3);
    }

    #[test]
    fn lazy_sequence_tags_symlinks() {
        let mut tree = TestTree::new();
        tree.file("target.txt", "x").symlink("alias.txt", "target.txt");

        let alias = walk::entries(tree.root())
            .unwrap()
            .map(Result::unwrap)
            .find(|node| node.path() == tree.path("alias.txt"))
            .unwrap();

        assert_eq!(alias.kind(), NodeKind::Symlink);
    }
}
