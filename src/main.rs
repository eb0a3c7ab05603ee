// SYNOID Shorts Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use synoid_shorts::media::ffmpeg::is_tool_on_path;
use synoid_shorts::media::{FfmpegMedia, MediaOps, RecordingMedia};
use synoid_shorts::models::{ScriptStyle, VisualIntensity};
use synoid_shorts::retry::RetryPolicy;
use synoid_shorts::{AppConfig, GenerationRequest, ShortsPipeline};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};

/// Seconds reported for every probe during a dry run.
const DRY_RUN_SEGMENT_SECS: f64 = 2.0;

#[derive(Parser)]
#[command(name = "synoid-shorts")]
#[command(about = "SYNOID Shorts: vertical short-video generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn is_on(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one vertical video
    Generate {
        /// Subject of the video
        #[arg(long)]
        topic: String,

        #[arg(long, value_enum)]
        style: ScriptStyle,

        /// Target length in seconds
        #[arg(long, default_value_t = 40)]
        length: u32,

        /// Rotate CTA lines between runs
        #[arg(long, value_enum, default_value = "on")]
        cta_variation: Toggle,

        #[arg(long, value_enum, default_value = "medium")]
        visual_intensity: VisualIntensity,

        /// Mix the BG_MUSIC_PATH track under the narration
        #[arg(long, value_enum, default_value = "off")]
        music: Toggle,

        /// Fix the random sequence (CTA picks, zoom variation)
        #[arg(long)]
        seed: Option<u64>,

        /// Record media commands instead of running ffmpeg
        #[arg(long)]
        dry_run: bool,
    },

    /// Check external tools and configured credentials
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Cli::parse();
    let config = AppConfig::from_env().context("loading configuration")?;

    match args.command {
        Commands::Generate {
            topic,
            style,
            length,
            cta_variation,
            visual_intensity,
            music,
            seed,
            dry_run,
        } => {
            info!("--- SYNOID SHORTS v{} ---", env!("CARGO_PKG_VERSION"));
            let request = GenerationRequest {
                topic,
                style,
                length,
                cta_variation: cta_variation.is_on(),
                visual_intensity,
                music: music.is_on(),
            };

            if dry_run {
                // Offline, and isolated so touched placeholder files never
                // land in the real asset cache.
                let config = AppConfig {
                    output_dir: config.output_dir.join("dry-run"),
                    cache_dir: config.cache_dir.join("dry-run"),
                    pexels_api_key: None,
                    gemini_api_key: None,
                    elevenlabs_api_key: None,
                    ..config
                };
                let recorder =
                    Arc::new(RecordingMedia::new().with_default_duration(DRY_RUN_SEGMENT_SECS));
                let media: Arc<dyn MediaOps> = recorder.clone();
                let pipeline =
                    ShortsPipeline::from_config(&config, media, seed, RetryPolicy::immediate(1))?;
                let report = pipeline.run(&request).await.context("dry run failed")?;
                for call in recorder.calls() {
                    println!("{}", call.describe());
                }
                info!("Dry run finished: {:?}", report.final_video);
                return Ok(());
            }

            let retry = RetryPolicy::default();
            let media: Arc<dyn MediaOps> = Arc::new(FfmpegMedia::new(retry));
            let pipeline = ShortsPipeline::from_config(&config, media, seed, retry)?;
            let report = pipeline.run(&request).await.context("generation failed")?;
            println!("{}", report.final_video.display());
        }
        Commands::Doctor => {
            let mut ok = true;
            for tool in ["ffmpeg", "ffprobe"] {
                if is_tool_on_path(tool) {
                    info!("[DOCTOR] {} found", tool);
                } else {
                    warn!("[DOCTOR] {} not found on PATH", tool);
                    ok = false;
                }
            }
            let credentials = [
                ("GEMINI_API_KEY", config.gemini_api_key.is_some(), "templated scripts"),
                ("ELEVENLABS_API_KEY", config.elevenlabs_api_key.is_some(), "tone narration"),
                ("PEXELS_API_KEY", config.pexels_api_key.is_some(), "cache + placeholders"),
            ];
            for (name, set, fallback) in credentials {
                if set {
                    info!("[DOCTOR] {} configured", name);
                } else {
                    info!("[DOCTOR] {} not set, using {}", name, fallback);
                }
            }
            match &config.music_path {
                Some(p) if p.is_file() => info!("[DOCTOR] Music track {:?}", p),
                Some(p) => warn!("[DOCTOR] BG_MUSIC_PATH {:?} does not exist", p),
                None => info!("[DOCTOR] No background music configured"),
            }
            if !ok {
                anyhow::bail!("required media tools are missing");
            }
        }
    }

    Ok(())
}
