//! Line-oriented text I/O and atomic writes

use std::fs::{self, File, OpenOptions};
use std::io::{self as stdio, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Check whether anything exists at `path` without following a final symlink.
pub fn exists(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path.as_ref()).is_ok()
}

/// Lazy sequence of lines read from a text file.
///
/// Line terminators (`\n` or `\r\n`) are stripped. The underlying file
/// handle is released when the iterator is dropped.
#[derive(Debug)]
pub struct Lines {
    path: PathBuf,
    inner: stdio::Lines<BufReader<File>>,
}

impl Lines {
    /// The file these lines are read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for Lines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|line| line.map_err(|e| Error::io(&self.path, e)))
    }
}

/// Open a file for line-by-line reading.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the path does not exist and
/// [`Error::Io`] for any other open failure.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Lines> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "opened file for reading");
    Ok(Lines {
        path: path.to_path_buf(),
        inner: BufReader::new(file).lines(),
    })
}

/// Buffered writer over a freshly created (or truncated) text file.
///
/// Implements [`std::io::Write`] so formatted output can be mixed with
/// literal text. Call [`TextWriter::finish`] to surface flush errors;
/// dropping the writer flushes on a best-effort basis.
#[derive(Debug)]
pub struct TextWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl TextWriter {
    /// Create or truncate the file at `path`. The parent directory must exist.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write literal text.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .map_err(|e| Error::io(&self.path, e))
    }

    /// Write formatted text, e.g. `writer.write_formatted(format_args!("i={}", 12))`.
    pub fn write_formatted(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.inner
            .write_fmt(args)
            .map_err(|e| Error::io(&self.path, e))
    }

    /// Flush buffered content and close the file.
    pub fn finish(mut self) -> Result<()> {
        self.inner.flush().map_err(|e| Error::io(&self.path, e))
    }
}

impl Write for TextWriter {
    fn write(&mut self, buf: &[u8]) -> stdio::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> stdio::Result<()> {
        self.inner.flush()
    }
}

/// Write text to a file, truncating any existing content.
///
/// The parent directory must already exist.
pub fn write_text(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let mut writer = TextWriter::create(path)?;
    writer.write_str(content)?;
    writer.finish()
}

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
/// The temp file lives next to the target to stay on the same filesystem.
pub fn write_atomic(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let result = write_and_sync(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(content).map_err(|e| Error::io(path, e))?;
    file.sync_all().map_err(|e| Error::io(path, e))
}
