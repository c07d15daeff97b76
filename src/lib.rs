//! Turn a podcast feed entry into an upload-ready video.
//!
//! The pipeline reads an RSS feed, downloads the episode audio, renders a
//! title card thumbnail and hands both to ffmpeg, which loops the still image
//! over the audio track.
//!
//! ```bash
//! # newest episode
//! cargo run
//!
//! # third newest, keeping earlier artifacts
//! cargo run -- --entry 2 --keep
//!
//! # local audio file, no feed access
//! cargo run -- --manual episode.mp3 "Revision 600: Release"
//! ```

pub mod args;
pub mod audio;
pub mod config;
pub mod encoder;
pub mod error;
pub mod feed;
pub mod http;
pub mod pipeline;
pub mod thumbnail;
pub mod title;
pub mod utils;

pub use error::{Error, Result};
