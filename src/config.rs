use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "podcast-video.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed_url: String,
    pub work_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Where `--thumbnail` writes its standalone render.
    pub thumbnail_path: PathBuf,
    pub upload_url: String,
    pub thumbnail: ThumbnailConfig,
    pub encoder: EncoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub background: PathBuf,
    pub font: PathBuf,
    pub special_label: String,
    pub fill_color: String,
    pub stroke_color: String,
    pub margin_x: u32,
    pub tag: TextStyle,
    pub caption: TextStyle,
}

/// Size, stroke and baseline position for one line of text.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TextStyle {
    pub size: f32,
    pub stroke_width: u32,
    /// Baseline distance from the bottom edge of the image.
    pub baseline_from_bottom: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Mp4,
    Mov,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Mov => "mov",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub program: String,
    pub container: Container,
    pub audio_bitrate: String,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: "https://workingdraft.de/feed/".to_string(),
            work_dir: PathBuf::from("tmp"),
            out_dir: PathBuf::from("out"),
            thumbnail_path: PathBuf::from("thumbnail.png"),
            upload_url: "https://studio.youtube.com/channel/UCTJTfsq21-sC6maSTzifiPQ/videos/upload?d=ud"
                .to_string(),
            thumbnail: ThumbnailConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("img/video.png"),
            font: PathBuf::from("fonts/SourceSansPro-Bold.ttf"),
            special_label: "#spezial".to_string(),
            fill_color: "#910c69".to_string(),
            stroke_color: "#FFF".to_string(),
            margin_x: 250,
            tag: TextStyle {
                size: 400.0,
                stroke_width: 80,
                baseline_from_bottom: 400,
            },
            caption: TextStyle {
                size: 200.0,
                stroke_width: 40,
                baseline_from_bottom: 150,
            },
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            container: Container::Mp4,
            audio_bitrate: "192k".to_string(),
            log_file: PathBuf::from("log.txt"),
        }
    }
}

impl Config {
    /// Load config from `path`, or from [`DEFAULT_CONFIG_FILE`] when `path` is `None`.
    ///
    /// A missing default file yields the built-in defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        info!("Loading config from {}", path.display());
        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Final video path for an episode title.
    pub fn video_path(&self, title: &str) -> PathBuf {
        crate::utils::artifact_path(&self.out_dir, title, self.encoder.container.extension())
    }
}

/// Parse `#rgb` or `#rrggbb` into RGB bytes.
pub fn parse_color(value: &str) -> Result<[u8; 3]> {
    let invalid = || Error::Color(value.to_string());
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                rgb[i] = v * 17;
            }
            Ok(rgb)
        }
        6 => Ok([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        _ => Err(invalid()),
    }
}
