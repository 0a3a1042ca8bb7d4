//! Fixed file locations used by the walkthrough

use std::path::{Path, PathBuf};

/// Directory holding every file the walkthrough touches.
pub const DATA_DIR: &str = "files";

/// Paths read and written by the demo steps.
///
/// The binary always uses [`DemoConfig::default`], which resolves everything
/// relative to `files/` in the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub data_dir: PathBuf,
    pub text_file: PathBuf,
    pub log_file: PathBuf,
    pub users_csv: PathBuf,
    pub archive: PathBuf,
}

impl DemoConfig {
    /// Lay out the standard file set beneath `base`.
    pub fn under(base: impl AsRef<Path>) -> Self {
        let data_dir = base.as_ref().join(DATA_DIR);
        Self {
            text_file: data_dir.join("someFile.txt"),
            log_file: data_dir.join("debug.log"),
            users_csv: data_dir.join("username.csv"),
            archive: data_dir.join("myData.zip"),
            data_dir,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::under("")
    }
}
