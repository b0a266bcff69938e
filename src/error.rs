use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::task::{DownloadTask, TaskParseError};

/// Every way a run can stop. None of these are retried.
#[derive(Debug, Error)]
pub enum HubzipError {
    #[error(transparent)]
    Usage(#[from] TaskParseError),

    #[error("unable to download {task}")]
    Download {
        task: DownloadTask,
        #[source]
        source: FetchError,
    },

    #[error("unable to decompress {}", archive.display())]
    Extract {
        archive: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error("unable to remove {}", archive.display())]
    Cleanup {
        archive: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    #[error("invalid base url")]
    BaseUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid archive url for {0}")]
    Url(String),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("unexpected content type {}, expected application/zip", .0.as_deref().unwrap_or("(none)"))]
    ContentType(Option<String>),
    #[error("download interrupted")]
    Interrupted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid zip archive")]
    InvalidZip(#[source] zip::result::ZipError),
    #[error("unreadable entry #{index}")]
    Entry {
        index: usize,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("entry '{0}' escapes the target directory")]
    UnsafePath(String),
}
