//! Error types for tour-cli

/// Result type for demo steps
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can end a demo step
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from tour-fs
    #[error(transparent)]
    Fs(#[from] tour_fs::Error),

    /// Failure writing program output
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
