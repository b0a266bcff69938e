use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use fs_err::File;
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use url::Url;

use crate::download::progress::ProgressTracker;
use crate::error::FetchError;

pub const CHUNK_SIZE: usize = 65_536;

/// Streams the archive at `url` into `dest`, overwriting whatever is there.
///
/// Nothing is written unless the server answers with a success status and a
/// zip content type. If the body cannot be fully written the partial file is
/// removed before returning. Returns the number of bytes written.
pub fn fetch_archive(
    client: &Client,
    url: Url,
    dest: &Path,
    progress: &mut impl ProgressTracker,
    interrupted: &AtomicBool,
) -> Result<u64, FetchError> {
    tracing::debug!(%url, "requesting archive");
    let response = client.get(url).send()?;
    let status = response.status();
    tracing::debug!(%status, "archive response");
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    check_content_type(response.headers())?;

    match stream_body(response, dest, progress, interrupted) {
        Ok(downloaded) => {
            progress.finish();
            tracing::debug!(bytes = downloaded, path = %dest.display(), "archive written");
            Ok(downloaded)
        }
        Err(err) => {
            progress.abandon(&err.to_string());
            Err(err)
        }
    }
}

fn stream_body(
    mut response: Response,
    dest: &Path,
    progress: &mut impl ProgressTracker,
    interrupted: &AtomicBool,
) -> Result<u64, FetchError> {
    let content_length = response.content_length();
    let mut archive = PartialArchive::create(dest)?;
    let mut buffer = vec![0; CHUNK_SIZE];
    let mut downloaded = 0u64;
    loop {
        let data = response.read(&mut buffer[..])?;
        if data == 0 {
            break;
        }
        if interrupted.load(Ordering::SeqCst) {
            return Err(FetchError::Interrupted);
        }
        archive.write_all(&buffer[..data])?;
        downloaded += data as u64;
        progress.update_progress(downloaded, content_length);
    }
    archive.commit()?;
    Ok(downloaded)
}

fn check_content_type(headers: &HeaderMap) -> Result<(), FetchError> {
    let value = headers
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    let is_zip = value
        .as_deref()
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/zip"));
    if is_zip {
        Ok(())
    } else {
        Err(FetchError::ContentType(value))
    }
}

/// Archive file that is deleted on drop unless `commit` succeeded.
struct PartialArchive {
    path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl PartialArchive {
    fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(File::create(path)?),
            committed: false,
        })
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(buf),
            None => Ok(()),
        }
    }

    fn commit(mut self) -> std::io::Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartialArchive {
    fn drop(&mut self) {
        // close before removing, windows refuses to delete open files
        drop(self.file.take());
        if self.committed {
            return;
        }
        if let Err(err) = fs_err::remove_file(&self.path) {
            tracing::debug!("failed to remove partial archive: {err}");
        } else {
            tracing::debug!(path = %self.path.display(), "removed partial archive");
        }
    }
}
