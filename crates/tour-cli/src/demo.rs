//! The fixed walkthrough sequence
//!
//! Every step catches its own failure: the error is logged and recorded in
//! the [`DemoReport`], and the next step runs regardless.

use std::fmt;
use std::io::Write;

use tour_fs::{DirectoryWalker, Strategy, ZipArchiveWriter, csv, io};
use tracing::{error, info, info_span, warn};

use crate::config::DemoConfig;
use crate::error::Result;

/// Lines written twice into the archive.
pub const ARCHIVE_LINES: [&str; 5] = [
    "Line 1",
    "Line 2 2",
    "Line 3 3 3",
    "Line 4 4 4 4",
    "Line 5 5 5 5 5",
];

pub const COPIED_ENTRY: &str = "/copiedDebug.log";
pub const LINE_WRITTEN_ENTRY: &str = "/newFile1.txt";
pub const BULK_WRITTEN_ENTRY: &str = "/myFile2.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ReadText,
    WriteText,
    ReadCsv,
    WalkStream,
    WalkVisitor,
    BuildArchive,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::ReadText,
        Step::WriteText,
        Step::ReadCsv,
        Step::WalkStream,
        Step::WalkVisitor,
        Step::BuildArchive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::ReadText => "read-text",
            Step::WriteText => "write-text",
            Step::ReadCsv => "read-csv",
            Step::WalkStream => "walk-stream",
            Step::WalkVisitor => "walk-visitor",
            Step::BuildArchive => "build-archive",
        }
    }

    fn execute(self, config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
        match self {
            Step::ReadText => read_text(config, out),
            Step::WriteText => write_text(config, out),
            Step::ReadCsv => read_csv(config, out),
            Step::WalkStream => walk_stream(config, out),
            Step::WalkVisitor => walk_visitor(config, out),
            Step::BuildArchive => build_archive(config, out),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Failed(String),
}

/// Outcome of every step, in execution order.
#[derive(Debug, Default)]
pub struct DemoReport {
    outcomes: Vec<(Step, StepOutcome)>,
}

impl DemoReport {
    #[cfg(test)]
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == StepOutcome::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }

    /// Failed steps with their error messages.
    pub fn failures(&self) -> impl Iterator<Item = (Step, &str)> {
        self.outcomes.iter().filter_map(|(step, outcome)| match outcome {
            StepOutcome::Failed(message) => Some((*step, message.as_str())),
            StepOutcome::Completed => None,
        })
    }
}

/// Run every step in order against `config`, writing program output to `out`.
pub fn run(config: &DemoConfig, out: &mut dyn Write) -> DemoReport {
    let mut report = DemoReport::default();
    for step in Step::ALL {
        let _span = info_span!("step", name = %step).entered();
        let outcome = match step.execute(config, out) {
            Ok(()) => StepOutcome::Completed,
            Err(e) => {
                error!(error = %e, "step failed");
                StepOutcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((step, outcome));
    }
    report
}

fn read_text(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    let path = &config.text_file;
    let exists = io::exists(path);
    writeln!(out, "File exists: {exists}")?;

    for line in io::read_lines(path)? {
        writeln!(out, "{}", line?)?;
    }
    Ok(())
}

fn write_text(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    let path = &config.log_file;
    let mut writer = io::TextWriter::create(path)?;
    writer.write_str("Hello World !")?;
    writer.write_formatted(format_args!("\ni={}\n", 12))?;
    writer.finish()?;

    writeln!(out, "File updated: {}", path.display())?;
    Ok(())
}

fn read_csv(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    let mut records = csv::read_records(&config.users_csv)?;
    let mut count = 0usize;
    for record in records.by_ref() {
        writeln!(out, "{}", record?)?;
        count += 1;
    }

    if records.skipped() > 0 {
        warn!(skipped = records.skipped(), "some records were malformed");
    }
    info!(count, "records read");
    Ok(())
}

fn walk_stream(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    let result = DirectoryWalker::new(Strategy::Stream).walk(&config.data_dir)?;
    if !result.is_complete() {
        warn!(failed = result.failed_count, "some nodes could not be read");
    }
    writeln!(out, "Total entries = {}", result.total_entries)?;
    writeln!(out, "Number of directories = {}", result.directory_count)?;
    writeln!(out, "Number of files = {}", result.file_count)?;
    Ok(())
}

fn walk_visitor(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Is directory = {}", config.data_dir.is_dir())?;

    let result = DirectoryWalker::new(Strategy::Visitor).walk(&config.data_dir)?;
    if !result.is_complete() {
        warn!(failed = result.failed_count, "some nodes could not be read");
    }
    writeln!(out, "File count = {}", result.file_count)?;
    Ok(())
}

fn build_archive(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    let mut archive = ZipArchiveWriter::create_or_open(&config.archive)?;
    writeln!(out, "Archive opened: {}", config.archive.display())?;

    archive.copy_file(&config.log_file, COPIED_ENTRY)?;
    archive.write_lines(LINE_WRITTEN_ENTRY, ARCHIVE_LINES)?;
    archive.write_all_lines(BULK_WRITTEN_ENTRY, &ARCHIVE_LINES)?;

    let names: Vec<String> = archive.entry_names().map(ToString::to_string).collect();
    archive.commit()?;
    writeln!(
        out,
        "Archive written with {} entries: {}",
        names.len(),
        names.join(", ")
    )?;
    Ok(())
}
