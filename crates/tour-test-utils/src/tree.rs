//! [`TestTree`] builder for directory-walk test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree that tracks how many directories and leaf
/// nodes it contains, so walk results can be asserted against it.
///
/// The root directory itself counts as one directory. Symlinks count as
/// leaf nodes, matching how the walkers classify them.
///
/// # Example
///
/// ```rust,no_run
/// use tour_test_utils::TestTree;
///
/// let mut tree = TestTree::new();
/// tree.file("a/b/c.txt", "hello").dir("empty");
/// assert_eq!(tree.expected_directories(), 4);
/// assert_eq!(tree.expected_files(), 1);
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    directories: u64,
    files: u64,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            directories: 1,
            files: 0,
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve `rel` against the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create `rel` and any missing parent directories.
    pub fn dir(&mut self, rel: &str) -> &mut Self {
        let mut current = self.root().to_path_buf();
        for component in Path::new(rel).components() {
            current.push(component);
            if !current.exists() {
                fs::create_dir(&current).unwrap_or_else(|e| {
                    panic!("TestTree::dir: failed to create {}: {e}", current.display())
                });
                self.directories += 1;
            }
        }
        self
    }

    /// Write a file at `rel`, creating missing parent directories.
    pub fn file(&mut self, rel: &str, content: &str) -> &mut Self {
        self.ensure_parent(rel);
        let full_path = self.path(rel);
        if !full_path.exists() {
            self.files += 1;
        }
        fs::write(&full_path, content).unwrap_or_else(|e| {
            panic!("TestTree::file: failed to write {}: {e}", full_path.display())
        });
        self
    }

    /// Create a symlink at `rel` pointing at `target` (relative to the link).
    #[cfg(unix)]
    pub fn symlink(&mut self, rel: &str, target: &str) -> &mut Self {
        self.ensure_parent(rel);
        let full_path = self.path(rel);
        std::os::unix::fs::symlink(target, &full_path).unwrap_or_else(|e| {
            panic!("TestTree::symlink: failed to link {}: {e}", full_path.display())
        });
        self.files += 1;
        self
    }

    fn ensure_parent(&mut self, rel: &str) {
        if let Some(parent) = Path::new(rel).parent() {
            if let Some(parent) = parent.to_str().filter(|p| !p.is_empty()) {
                self.dir(parent);
            }
        }
    }

    /// Directories in the tree, root included.
    pub fn expected_directories(&self) -> u64 {
        self.directories
    }

    /// Leaf nodes in the tree: regular files and symlinks.
    pub fn expected_files(&self) -> u64 {
        self.files
    }

    /// Every node in the tree, root included.
    pub fn expected_total(&self) -> u64 {
        self.directories + self.files
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let full_path = self.path(rel);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
