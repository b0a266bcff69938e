use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Context;
use clap::Parser;

use crate::download::Hubzip;
use crate::download::progress::ConsoleProgress;
use crate::task::DownloadTask;

/// Download and decompress master zips from GitHub.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    after_help = "example: hubzip mitsuhiko/flask"
)]
pub struct Cli {
    /// GitHub owner/repository pairs to download and decompress
    #[arg(required = true, value_name = "OWNER/REPO")]
    pub repositories: Vec<String>,

    /// Keep the .zip files instead of deleting them
    #[arg(long)]
    pub keep: bool,

    /// Do not print progress messages to stdout
    #[arg(long)]
    pub quiet: bool,

    /// Print the SHA256 of each downloaded archive
    #[arg(long)]
    pub sha256: bool,
}

impl Cli {
    /// Runs against the current directory. All specifiers are validated
    /// before the first request goes out.
    pub fn execute(self) -> anyhow::Result<()> {
        let tasks = DownloadTask::parse_all(&self.repositories)?;

        let interrupted = Arc::new(AtomicBool::new(false));
        let interrupted_clone = interrupted.clone();
        ctrlc::set_handler(move || {
            interrupted_clone.store(true, Ordering::SeqCst);
        })
        .context("could not set keyboard interrupt handler")?;

        let hubzip = Hubzip::new(PathBuf::from("."), interrupted)?
            .keep(self.keep)
            .sha256(self.sha256);
        let mut progress = ConsoleProgress::stdout(self.quiet);
        hubzip.run(&tasks, &mut progress)?;
        Ok(())
    }
}
