//! # stocklens entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Initialize logging (console + rolling files)
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load settings, apply overrides, load both tables
//!   │
//!   ├─> `report`: print text or JSON to stdout and exit
//!   └─> `dashboard` (default): open the egui window
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    if let Err(e) = stocklens::logging::init() {
        report_logging_failure(&e);
    }

    let cli = cli::Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    cli::run(cli, &mut out).inspect_err(|e| tracing::error!("{e:#}"))
}

/// Nothing is listening to `tracing` yet when logging setup fails.
#[expect(clippy::print_stderr)]
fn report_logging_failure(e: &anyhow::Error) {
    eprintln!("Failed to initialize logging: {e:#}");
}
