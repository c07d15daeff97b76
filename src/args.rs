use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::pipeline::{RunOptions, Source};

pub const MANUAL_USAGE: &str = "Usage: podcast-video --manual <audioFile> <title>";

#[derive(Parser, Debug)]
#[command(
    name = "podcast-video",
    version,
    about = "Turn the latest podcast episode into a still-image video"
)]
pub struct Args {
    /// Mark the run as a revision episode
    #[arg(short, long)]
    pub revision: bool,

    /// Render a thumbnail for this title, then continue
    #[arg(short, long, value_name = "TITLE")]
    pub thumbnail: Option<String>,

    /// Feed entry to use, 0 is the newest
    #[arg(short, long, default_value_t = 0)]
    pub entry: usize,

    /// Keep existing files in the working and output directories
    #[arg(short, long)]
    pub keep: bool,

    /// Use a local audio file and title instead of the feed
    #[arg(short, long, num_args = 0.., value_name = "AUDIO_FILE TITLE")]
    pub manual: Option<Vec<String>>,

    /// Config file, defaults to ./podcast-video.toml when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn source(&self) -> Result<Source> {
        match self.manual.as_deref() {
            None => Ok(Source::Feed { entry: self.entry }),
            Some([audio, title]) => Ok(Source::Manual {
                audio: PathBuf::from(audio),
                title: title.clone(),
            }),
            Some(values) => Err(Error::ManualArgs(values.len())),
        }
    }

    pub fn run_options(&self) -> Result<RunOptions> {
        Ok(RunOptions {
            source: self.source()?,
            keep: self.keep,
            revision: self.revision,
            thumbnail: self.thumbnail.clone(),
        })
    }
}
