// SYNOID Shorts Media Operations
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The narrow seam between the assembly pipeline and the external media tool.
// `FfmpegMedia` shells out to ffmpeg/ffprobe; `RecordingMedia` records the
// calls and touches the outputs so the pipeline can run without encoding.

pub mod ffmpeg;
pub mod recording;

pub use ffmpeg::FfmpegMedia;
pub use recording::{MediaCall, RecordingMedia};

use crate::error::Result;
use crate::models::MediaType;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Fixed output frame for every rendered artifact.
pub const FRAME_WIDTH: u32 = 1080;
pub const FRAME_HEIGHT: u32 = 1920;
pub const FRAME_RATE: u32 = 30;

/// One silent, filtered clip of an exact duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub source: PathBuf,
    pub media_type: MediaType,
    pub duration: f64,
    pub filter: String,
    pub output: PathBuf,
}

/// Final mux: visual track + narration (+ ducked music) + burned subtitles.
#[derive(Debug, Clone, PartialEq)]
pub struct MixRequest {
    pub visual: PathBuf,
    pub narration: PathBuf,
    pub music: Option<PathBuf>,
    pub subtitles: PathBuf,
    pub output: PathBuf,
}

#[async_trait]
pub trait MediaOps: Send + Sync {
    /// Exact duration in seconds of an audio or video file.
    async fn probe_duration(&self, path: &Path) -> Result<f64>;

    async fn render_clip(&self, request: &ClipRequest) -> Result<()>;

    /// Stream-copy concatenation of the files listed in a concat manifest.
    async fn concatenate(&self, manifest: &Path, output: &Path) -> Result<()>;

    async fn normalize_loudness(&self, input: &Path, output: &Path) -> Result<()>;

    async fn mix_and_burn(&self, request: &MixRequest) -> Result<()>;

    /// Quiet sine tone standing in for narration when no voice is configured.
    async fn synthesize_tone(&self, seconds: f64, output: &Path) -> Result<()>;

    /// Generic test-pattern clip used when no asset could be found.
    async fn generate_placeholder(&self, seconds: f64, output: &Path) -> Result<()>;
}

/// Build the contents of a concat manifest. Entries are file names relative
/// to the manifest's own directory, in the given order.
pub fn concat_manifest(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.to_string_lossy().into_owned());
            format!("file '{}'", name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
