//! Semicolon-delimited user records
//!
//! Each non-comment line holds `userName;id;firstName;lastName`. Lines
//! starting with `#` are comments. A line that fails to parse is logged and
//! skipped; it never aborts the rest of the input.

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::io::{self, Lines};
use crate::{Error, Result};

/// Field separator.
pub const DELIMITER: char = ';';

/// Prefix marking a comment line.
pub const COMMENT_PREFIX: char = '#';

const FIELD_COUNT: usize = 4;

/// One parsed user row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    user_name: String,
    id: i32,
    first_name: String,
    last_name: String,
}

impl Record {
    pub fn new(
        user_name: impl Into<String>,
        id: i32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User{{userName='{}', id={}, firstName='{}', lastName='{}'}}",
            self.user_name, self.id, self.first_name, self.last_name
        )
    }
}

/// True if the line is a comment and carries no record.
pub fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_PREFIX)
}

/// Parse a single data line into a [`Record`].
///
/// Fields past the fourth are ignored.
///
/// # Errors
///
/// Returns [`Error::Parse`] when fewer than four fields are present or the
/// id field is not a valid integer.
pub fn parse_line(line: &str) -> Result<Record> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < FIELD_COUNT {
        return Err(Error::parse(
            line,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    }

    let id = fields[1]
        .parse::<i32>()
        .map_err(|e| Error::parse(line, format!("invalid id {:?}: {e}", fields[1])))?;

    Ok(Record::new(fields[0], id, fields[2], fields[3]))
}

/// Turn one input line into a record, logging and dropping bad lines.
fn accept(line: &str) -> Option<Record> {
    if is_comment(line) {
        return None;
    }
    match parse_line(line) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "skipping malformed record");
            None
        }
    }
}

/// Parse records from in-memory content.
pub fn parse_records(content: &str) -> Vec<Record> {
    content.lines().filter_map(accept).collect()
}

/// Lazy record reader over a file.
///
/// Yields `Err` only for I/O failures; malformed lines are counted in
/// [`Records::skipped`] and otherwise ignored.
#[derive(Debug)]
pub struct Records {
    lines: Lines,
    skipped: usize,
}

impl Records {
    /// Number of non-comment lines rejected so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Records {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            if is_comment(&line) {
                continue;
            }
            match accept(&line) {
                Some(record) => return Some(Ok(record)),
                None => self.skipped += 1,
            }
        }
    }
}

/// Open a CSV file for lazy record reading.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the file does not exist.
pub fn read_records(path: impl AsRef<Path>) -> Result<Records> {
    Ok(Records {
        lines: io::read_lines(path)?,
        skipped: 0,
    })
}
