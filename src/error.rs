use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("got status {status} while fetching feed {url}")]
    FeedStatus { url: String, status: u16 },

    #[error("failed to parse feed: {0}")]
    FeedParse(#[from] rss::Error),

    #[error("feed entry {index} requested but the feed only has {len} items")]
    EntryOutOfRange { index: usize, len: usize },

    #[error("feed entry {index} has no {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Got status {0} while fetching audio")]
    DownloadStatus(u16),

    #[error("manual mode expects <audioFile> <title>, got {0} value(s)")]
    ManualArgs(usize),

    #[error("{program} exited with {code:?}, see {}", .log.display())]
    Encoder {
        program: String,
        code: Option<i32>,
        log: PathBuf,
    },

    #[error("failed to load font {}: {reason}", .path.display())]
    Font { path: PathBuf, reason: &'static str },

    #[error("failed to read {}: {source}", .path.display())]
    Asset { path: PathBuf, source: io::Error },

    #[error("failed to load image {}: {source}", .path.display())]
    Background {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    Color(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
