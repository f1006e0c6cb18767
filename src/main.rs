use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ytcomments::config::Config;
use ytcomments::crawler::CommentCrawler;
use ytcomments::storage::JsonLinesSink;
use ytcomments::utils::read_video_ids;

#[derive(Parser)]
#[command(
    name = "ytcomments",
    version,
    about = "Download video comments without using the official API",
    long_about = None
)]
struct Cli {
    /// File containing video ids to crawl, one per line
    #[arg(short = 'y', long = "youtubeids")]
    video_ids: PathBuf,

    /// Directory for the <video_id>_comments.json files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    setup_tracing(&config.logging.level, &config.logging.format, cli.verbose);

    let video_ids = read_video_ids(&cli.video_ids)?;
    tracing::info!(
        input = %cli.video_ids.display(),
        videos = video_ids.len(),
        "Starting comment crawl"
    );

    let crawler = CommentCrawler::new(config)?;
    let mut sink = JsonLinesSink::new(&cli.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            cli.output_dir.display()
        )
    })?;

    let summary = crawler.run(&video_ids, &mut sink).await;

    println!("\nCrawl Summary");
    println!("=============");
    println!("Videos processed: {}", summary.videos_attempted());
    println!("Successful: {}", summary.videos_succeeded);
    println!("Failed: {}", summary.videos_failed);
    println!("Comments written: {}", summary.total_comments);
    println!("Output directory: {}", cli.output_dir.display());
    if !summary.failed_videos.is_empty() {
        println!("Failed videos: {}", summary.failed_videos.join(", "));
    }

    Ok(())
}

fn setup_tracing(level: &str, format: &str, verbose: bool) {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ytcomments=debug,warn")
    } else {
        tracing_subscriber::EnvFilter::new(format!("ytcomments={level},warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
