use anyhow::Context;
use clap::Parser;
use podcast_video::args::{Args, MANUAL_USAGE};
use podcast_video::config::Config;
use podcast_video::pipeline::{Pipeline, completion_message};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let options = match args.run_options() {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", MANUAL_USAGE);
            std::process::exit(1);
        }
    };

    let config = Config::load(args.config.as_deref()).context("failed to load config")?;
    info!("Starting podcast video pipeline");

    let pipeline = Pipeline::new(config);
    let video_file = pipeline.run(&options).await?;

    println!("{}", completion_message(&video_file, &pipeline.config().upload_url));
    Ok(())
}
