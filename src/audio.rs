use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::feed::FeedItem;
use crate::http::Fetch;
use crate::utils::artifact_path;

/// Download the item's enclosure to `<dir>/<title>.mp3`.
pub async fn download_audio(fetch: &dyn Fetch, item: &FeedItem, dir: &Path) -> Result<PathBuf> {
    info!("Downloading audio...");
    let res = fetch.get(&item.url).await?;
    if !res.is_success() {
        error!("Audio download from {} failed with status {}", item.url, res.status);
        return Err(Error::DownloadStatus(res.status));
    }

    let audio_file = artifact_path(dir, &item.title, "mp3");
    tokio::fs::write(&audio_file, &res.body).await?;
    info!("Audio written to {} ({} bytes)", audio_file.display(), res.body.len());
    Ok(audio_file)
}
