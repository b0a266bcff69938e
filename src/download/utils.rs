use std::io::Read;
use std::path::{Path, PathBuf};

use fs_err::File;
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::FetchError;
use crate::task::DownloadTask;

pub const GITHUB_URL: &str = "https://github.com";

/// Branch archive GitHub serves for `task`. Always `master`, repositories
/// with a differently named default branch will 404.
pub fn archive_url(base: &Url, task: &DownloadTask) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::Url(base.to_string()))?
        .pop_if_empty()
        .extend([task.owner.as_str(), task.repo.as_str(), "archive", "master.zip"]);
    Ok(url)
}

pub fn archive_path(target_dir: &Path, task: &DownloadTask) -> PathBuf {
    target_dir.join(format!("{}.zip", task.repo))
}

pub fn hash_file(path: &Path, chunk_size: usize) -> std::io::Result<[u8; 32]> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; chunk_size];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hasher.finalize().into())
}
