mod blocking;
pub mod progress;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::blocking::Client;
use url::Url;

pub use blocking::{CHUNK_SIZE, fetch_archive};
use progress::ProgressTracker;

use crate::error::{FetchError, HubzipError};
use crate::extract::extract_zip;
use crate::task::DownloadTask;

/// Fetches and unpacks repositories one after the other into a single
/// directory.
pub struct Hubzip {
    client: Client,
    base_url: Url,
    target_dir: PathBuf,
    keep: bool,
    sha256: bool,
    interrupted: Arc<AtomicBool>,
}

impl Hubzip {
    pub fn new(
        target_dir: impl Into<PathBuf>,
        interrupted: Arc<AtomicBool>,
    ) -> Result<Self, HubzipError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HubzipError::Client)?;
        Ok(Self {
            client,
            base_url: Url::parse(utils::GITHUB_URL)?,
            target_dir: target_dir.into(),
            keep: false,
            sha256: false,
            interrupted,
        })
    }

    /// Host serving `{owner}/{repo}/archive/master.zip`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Leave `{repo}.zip` next to the extracted tree.
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn sha256(mut self, sha256: bool) -> Self {
        self.sha256 = sha256;
        self
    }

    /// Processes `tasks` in order and stops at the first failure; later
    /// tasks are not touched.
    pub fn run(
        &self,
        tasks: &[DownloadTask],
        progress: &mut impl ProgressTracker,
    ) -> Result<(), HubzipError> {
        for task in tasks {
            self.process(task, progress)?;
        }
        Ok(())
    }

    /// Download, extract, then remove the archive unless it should be kept.
    pub fn process(
        &self,
        task: &DownloadTask,
        progress: &mut impl ProgressTracker,
    ) -> Result<(), HubzipError> {
        let download_error = |source| HubzipError::Download {
            task: task.clone(),
            source,
        };

        if self.interrupted.load(Ordering::SeqCst) {
            return Err(download_error(FetchError::Interrupted));
        }

        progress.announce(task).map_err(|e| download_error(e.into()))?;

        let url = utils::archive_url(&self.base_url, task).map_err(download_error)?;
        let archive = utils::archive_path(&self.target_dir, task);
        fetch_archive(&self.client, url, &archive, progress, &self.interrupted)
            .map_err(download_error)?;

        if self.sha256 {
            utils::hash_file(&archive, CHUNK_SIZE)
                .and_then(|digest| progress.report_digest(&archive, &digest))
                .map_err(|e| download_error(e.into()))?;
        }

        extract_zip(&archive, &self.target_dir).map_err(|source| HubzipError::Extract {
            archive: archive.clone(),
            source,
        })?;

        if !self.keep {
            fs_err::remove_file(&archive).map_err(|source| HubzipError::Cleanup {
                archive: archive.clone(),
                source,
            })?;
            tracing::debug!(path = %archive.display(), "removed archive");
        }
        Ok(())
    }
}
