//! Zip archive creation with copied and freshly written entries
//!
//! [`ZipArchiveWriter`] stages entries in memory and publishes the archive
//! with an atomic write on [`ZipArchiveWriter::commit`]. Re-opening an
//! existing archive keeps its entries; writing an entry name that already
//! exists replaces its content.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::path::EntryPath;
use crate::{Error, Result, io};

/// Separator appended after every line written into an entry.
pub const LINE_SEPARATOR: &str = "\n";

#[derive(Debug)]
struct StagedEntry {
    name: EntryPath,
    content: Vec<u8>,
}

/// Builder for a zip archive on disk.
///
/// Nothing touches the target path until [`commit`](Self::commit) succeeds;
/// dropping an uncommitted writer discards the staged changes.
#[derive(Debug)]
pub struct ZipArchiveWriter {
    path: PathBuf,
    entries: Vec<StagedEntry>,
    committed: bool,
}

impl ZipArchiveWriter {
    /// Open the archive at `path`, or start a new one if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the parent directory is missing and
    /// [`Error::Archive`] if an existing file is not a readable zip archive.
    pub fn create_or_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(Error::NotFound {
                    path: parent.to_path_buf(),
                });
            }
        }

        let entries = if path.exists() {
            let entries = load_entries(path)?;
            debug!(path = %path.display(), count = entries.len(), "opened existing archive");
            entries
        } else {
            debug!(path = %path.display(), "creating new archive");
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            committed: false,
        })
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> impl Iterator<Item = &EntryPath> {
        self.entries.iter().map(|e| &e.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy an external file into the archive under `entry`, replacing any
    /// entry of the same name.
    pub fn copy_file(&mut self, source: impl AsRef<Path>, entry: &str) -> Result<()> {
        let source = source.as_ref();
        let content = fs::read(source).map_err(|e| Error::io(source, e))?;
        self.stage(entry, content)
    }

    /// Write `lines` into `entry` one line at a time.
    pub fn write_lines<I, S>(&mut self, entry: &str, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut content = Vec::new();
        for line in lines {
            write!(content, "{}{LINE_SEPARATOR}", line.as_ref())
                .map_err(|e| Error::io(&self.path, e))?;
        }
        self.stage(entry, content)
    }

    /// Write `lines` into `entry` with a single bulk write.
    ///
    /// Produces the same bytes as [`write_lines`](Self::write_lines).
    pub fn write_all_lines<S: AsRef<str>>(&mut self, entry: &str, lines: &[S]) -> Result<()> {
        let mut content = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(LINE_SEPARATOR);
        if !lines.is_empty() {
            content.push_str(LINE_SEPARATOR);
        }
        self.stage(entry, content.into_bytes())
    }

    fn stage(&mut self, entry: &str, content: Vec<u8>) -> Result<()> {
        let name = EntryPath::new(entry)?;
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => {
                debug!(entry = %name, "replacing archive entry");
                existing.content = content;
            }
            None => {
                debug!(entry = %name, bytes = content.len(), "adding archive entry");
                self.entries.push(StagedEntry { name, content });
            }
        }
        Ok(())
    }

    /// Serialize all staged entries and atomically replace the archive file.
    pub fn commit(mut self) -> Result<()> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|e| Error::archive(&self.path, e))?;
            writer
                .write_all(&entry.content)
                .map_err(|e| Error::io(&self.path, e))?;
        }

        let bytes = writer
            .finish()
            .map_err(|e| Error::archive(&self.path, e))?
            .into_inner();
        io::write_atomic(&self.path, &bytes)?;

        self.committed = true;
        debug!(path = %self.path.display(), entries = self.entries.len(), "archive committed");
        Ok(())
    }
}

impl Drop for ZipArchiveWriter {
    fn drop(&mut self) {
        if !self.committed && !self.entries.is_empty() {
            warn!(path = %self.path.display(), "discarding uncommitted archive changes");
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    ZipArchive::new(file).map_err(|e| Error::archive(path, e))
}

fn load_entries(path: &Path) -> Result<Vec<StagedEntry>> {
    let mut archive = open_archive(path)?;
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| Error::archive(path, e))?;
        if file.is_dir() {
            // Directory markers are implied by nested entry names.
            debug!(entry = file.name(), "dropping directory marker");
            continue;
        }
        let name = EntryPath::new(file.name())?;
        // Declared sizes come from the archive headers and are untrusted.
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| Error::io(path, e))?;
        entries.push(StagedEntry { name, content });
    }
    Ok(entries)
}

/// List the entry names stored in an archive, in archive order.
pub fn list_entries(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut archive = open_archive(path)?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive
            .by_index(index)
            .map_err(|e| Error::archive(path, e))?;
        names.push(file.name().to_string());
    }
    Ok(names)
}

/// Read one archive entry as UTF-8 text.
pub fn read_entry(path: impl AsRef<Path>, entry: &str) -> Result<String> {
    let path = path.as_ref();
    let name = EntryPath::new(entry)?;
    let mut archive = open_archive(path)?;
    let mut file = archive
        .by_name(name.as_str())
        .map_err(|e| Error::archive(path, e))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::io(path, e))?;
    Ok(content)
}
