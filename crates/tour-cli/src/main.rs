//! fs-tour
//!
//! Runs the fixed filesystem walkthrough against `files/` in the working
//! directory. Takes no arguments and always exits 0; failed steps are
//! logged to stderr.

mod config;
mod demo;
mod error;
mod logging;

use config::DemoConfig;
use tracing::{info, warn};

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("warning: logging unavailable: {e}");
    }

    let config = DemoConfig::default();
    let stdout = std::io::stdout();
    let report = demo::run(&config, &mut stdout.lock());

    if report.failed() > 0 {
        let failed: Vec<&str> = report.failures().map(|(step, _)| step.name()).collect();
        warn!(steps = ?failed, "some steps failed");
    }
    info!(
        completed = report.completed(),
        failed = report.failed(),
        "walkthrough finished"
    );
}
