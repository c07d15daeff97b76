use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::audio::download_audio;
use crate::config::Config;
use crate::encoder::{EncodeJob, Encoder, Ffmpeg};
use crate::error::Result;
use crate::feed::fetch_item;
use crate::http::{Fetch, HttpFetcher};
use crate::thumbnail::{Thumbnailer, TitleCardRenderer};
use crate::utils::{artifact_path, clear_dir};

/// Where the episode audio and title come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Feed { entry: usize },
    Manual { audio: PathBuf, title: String },
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: Source,
    pub keep: bool,
    pub revision: bool,
    /// Title for a standalone thumbnail render before the main run.
    pub thumbnail: Option<String>,
}

pub struct Pipeline {
    config: Arc<Config>,
    fetch: Arc<dyn Fetch>,
    thumbnailer: Arc<dyn Thumbnailer>,
    encoder: Arc<dyn Encoder>,
}

impl Pipeline {
    /// Wire up reqwest, the title card renderer and ffmpeg.
    pub fn new(config: Config) -> Self {
        let thumbnailer = TitleCardRenderer::new(config.thumbnail.clone());
        let encoder = Ffmpeg::new(&config.encoder);
        Self::with_parts(
            config,
            Arc::new(HttpFetcher::new()),
            Arc::new(thumbnailer),
            Arc::new(encoder),
        )
    }

    pub fn with_parts(
        config: Config,
        fetch: Arc<dyn Fetch>,
        thumbnailer: Arc<dyn Thumbnailer>,
        encoder: Arc<dyn Encoder>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetch,
            thumbnailer,
            encoder,
        }
    }

    /// Run every step and return the path of the finished video.
    pub async fn run(&self, options: &RunOptions) -> Result<PathBuf> {
        if options.revision {
            debug!("Revision marker set");
        }

        if options.keep {
            info!("Keeping existing output");
            std::fs::create_dir_all(&self.config.work_dir)?;
            std::fs::create_dir_all(&self.config.out_dir)?;
        } else {
            clear_dir(&self.config.out_dir)?;
            clear_dir(&self.config.work_dir)?;
        }

        if let Some(title) = &options.thumbnail {
            let dest = self.config.thumbnail_path.clone();
            self.render_thumbnail(title.clone(), dest).await?;
        }

        let (title, audio_file, thumbnail_file) = match &options.source {
            Source::Manual { audio, title } => {
                info!("Manual mode with audio {} and title \"{}\"", audio.display(), title);
                let dest = artifact_path(&self.config.work_dir, title, "png");
                let thumbnail_file = self.render_thumbnail(title.clone(), dest).await?;
                (title.clone(), audio.clone(), thumbnail_file)
            }
            Source::Feed { entry } => {
                let item = fetch_item(self.fetch.as_ref(), &self.config.feed_url, *entry).await?;
                let (audio_file, thumbnail_file) = tokio::try_join!(
                    download_audio(self.fetch.as_ref(), &item, &self.config.work_dir),
                    self.render_thumbnail(
                        item.title.clone(),
                        artifact_path(&self.config.work_dir, &item.title, "png"),
                    ),
                )?;
                (item.title, audio_file, thumbnail_file)
            }
        };

        let job = EncodeJob {
            thumbnail: thumbnail_file,
            audio: audio_file,
            output: self.config.video_path(&title),
        };
        self.encoder.encode(&job)?;
        Ok(job.output)
    }

    /// Runs the render on the blocking pool.
    async fn render_thumbnail(&self, title: String, dest: PathBuf) -> Result<PathBuf> {
        let thumbnailer = Arc::clone(&self.thumbnailer);
        tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            thumbnailer.render(&title, &dest)?;
            Ok(dest)
        })
        .await?
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Operator message printed once the video exists.
pub fn completion_message(video: &Path, upload_url: &str) -> String {
    format!("Done! Now upload \"{}\" to {}", video.display(), upload_url)
}
