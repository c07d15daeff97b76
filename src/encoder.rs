use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{error, info};

use crate::config::EncoderConfig;
use crate::error::{Error, Result};

/// Inputs and output of one encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    pub thumbnail: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
}

pub trait Encoder: Send + Sync {
    /// Runs to completion; blocks the calling thread.
    fn encode(&self, job: &EncodeJob) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: String,
    audio_bitrate: String,
    log_file: PathBuf,
}

impl Ffmpeg {
    pub fn new(config: &EncoderConfig) -> Self {
        Self {
            program: config.program.clone(),
            audio_bitrate: config.audio_bitrate.clone(),
            log_file: config.log_file.clone(),
        }
    }

    /// Still image looped over the audio track, cut to the audio length.
    pub fn args(&self, job: &EncodeJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(20);
        args.extend(["-y", "-loop", "1", "-i"].map(OsString::from));
        args.push(job.thumbnail.clone().into_os_string());
        args.push("-i".into());
        args.push(job.audio.clone().into_os_string());
        args.extend(
            ["-c:v", "libx264", "-tune", "stillimage", "-c:a", "aac", "-b:a"].map(OsString::from),
        );
        args.push(self.audio_bitrate.clone().into());
        args.extend(["-pix_fmt", "yuv420p", "-shortest"].map(OsString::from));
        args.push(job.output.clone().into_os_string());
        args
    }
}

impl Encoder for Ffmpeg {
    fn encode(&self, job: &EncodeJob) -> Result<()> {
        info!(
            "Encoding \"{}\". This will take some time...",
            job.output.display()
        );
        let log = File::create(&self.log_file)?;
        let status = Command::new(&self.program)
            .args(self.args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::from(log.try_clone()?))
            .stderr(Stdio::from(log))
            .status()?;

        if !status.success() {
            error!("{} failed to produce {}", self.program, job.output.display());
            return Err(Error::Encoder {
                program: self.program.clone(),
                code: status.code(),
                log: self.log_file.clone(),
            });
        }
        info!("Final video written to {}", job.output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> EncodeJob {
        EncodeJob {
            thumbnail: PathBuf::from("tmp/Revision 5: Launch.png"),
            audio: PathBuf::from("tmp/Revision 5: Launch.mp3"),
            output: PathBuf::from("out/Revision 5: Launch.mp4"),
        }
    }

    #[test]
    fn builds_still_image_template() {
        let ffmpeg = Ffmpeg::new(&EncoderConfig::default());
        let args: Vec<String> = ffmpeg
            .args(&job())
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();

        assert_eq!(
            args,
            [
                "-y",
                "-loop",
                "1",
                "-i",
                "tmp/Revision 5: Launch.png",
                "-i",
                "tmp/Revision 5: Launch.mp3",
                "-c:v",
                "libx264",
                "-tune",
                "stillimage",
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "-pix_fmt",
                "yuv420p",
                "-shortest",
                "out/Revision 5: Launch.mp4",
            ]
        );
    }

    #[test]
    fn bitrate_comes_from_config() {
        let ffmpeg = Ffmpeg::new(&EncoderConfig {
            audio_bitrate: "320k".to_string(),
            ..EncoderConfig::default()
        });
        let args = ffmpeg.args(&job());
        let pos = args.iter().position(|a| a == "-b:a").unwrap();
        assert_eq!(args[pos + 1], "320k");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = Ffmpeg::new(&EncoderConfig {
            program: "false".to_string(),
            log_file: dir.path().join("log.txt"),
            ..EncoderConfig::default()
        });

        let err = ffmpeg.encode(&job()).unwrap_err();
        assert!(matches!(err, Error::Encoder { code: Some(1), .. }));
        assert!(dir.path().join("log.txt").exists());
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = Ffmpeg::new(&EncoderConfig {
            program: "podcast-video-no-such-encoder".to_string(),
            log_file: dir.path().join("log.txt"),
            ..EncoderConfig::default()
        });

        assert!(matches!(ffmpeg.encode(&job()).unwrap_err(), Error::Io(_)));
    }
}
