//! Fetch GitHub repositories as zip archives and unpack them in place.
pub mod cli;
pub mod download;
pub mod error;
pub mod extract;
pub mod task;

pub use download::Hubzip;
pub use error::{ExtractError, FetchError, HubzipError};
pub use task::DownloadTask;
