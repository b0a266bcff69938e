use std::io::{self, Stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::task::DownloadTask;

// Trait to homogenize the progress reporting, so the runner is not tied to a
// terminal.
pub trait ProgressTracker {
    /// Called once per task before its request is sent.
    fn announce(&mut self, task: &DownloadTask) -> io::Result<()>;
    fn update_progress(&mut self, downloaded: u64, total: Option<u64>);
    fn finish(&mut self);
    fn abandon(&mut self, msg: &str);
    fn report_digest(&mut self, archive: &Path, digest: &[u8; 32]) -> io::Result<()>;
}

/// Writes the `owner/repo...` lines to `out` and shows a byte spinner on
/// stderr while a body is streaming.
pub struct ConsoleProgress<W: Write> {
    out: W,
    quiet: bool,
    draw_target: fn() -> ProgressDrawTarget,
    bar: Option<ProgressBar>,
    started: Instant,
    last_update: Instant,
}

impl ConsoleProgress<Stdout> {
    pub fn stdout(quiet: bool) -> Self {
        Self::new(io::stdout(), quiet)
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        let now = Instant::now();
        Self {
            out,
            quiet,
            draw_target: ProgressDrawTarget::stderr,
            bar: None,
            started: now,
            last_update: now,
        }
    }

    /// Never draw the spinner, whatever stderr is.
    pub fn without_spinner(mut self) -> Self {
        self.draw_target = ProgressDrawTarget::hidden;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn spinner(&mut self) -> &ProgressBar {
        let draw_target = self.draw_target;
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::with_draw_target(None, draw_target())
                .with_style(ProgressStyle::default_spinner());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        })
    }
}

impl<W: Write> ProgressTracker for ConsoleProgress<W> {
    fn announce(&mut self, task: &DownloadTask) -> io::Result<()> {
        self.started = Instant::now();
        self.last_update = self.started;
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "{task}...")?;
        self.out.flush()
    }

    fn update_progress(&mut self, downloaded: u64, total: Option<u64>) {
        if self.quiet || self.last_update.elapsed() < Duration::from_millis(250) {
            return;
        }
        self.last_update = Instant::now();
        let speed = downloaded / self.started.elapsed().as_secs().max(1);
        let message = match total {
            Some(len) => format!(
                "Downloaded {}/{}. Speed: {}/s.",
                HumanBytes(downloaded),
                HumanBytes(len),
                HumanBytes(speed),
            ),
            None => format!(
                "Downloaded {}. Speed: {}/s.",
                HumanBytes(downloaded),
                HumanBytes(speed),
            ),
        };
        self.spinner().set_message(message);
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        tracing::debug!(elapsed = %HumanDuration(self.started.elapsed()), "download finished");
    }

    fn abandon(&mut self, msg: &str) {
        if let Some(bar) = self.bar.take() {
            bar.abandon_with_message(msg.to_string());
        }
    }

    fn report_digest(&mut self, archive: &Path, digest: &[u8; 32]) -> io::Result<()> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| archive.to_string_lossy());
        writeln!(self.out, "{}: sha256 {}", name, hex::encode(digest))?;
        self.out.flush()
    }
}
