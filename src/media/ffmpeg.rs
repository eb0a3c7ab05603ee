// SYNOID Shorts FFmpeg Backend
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// ffmpeg/ffprobe invoked as opaque subprocesses with a fixed argument
// contract. Any non-zero exit is a ToolFailed error, retried per step.

use super::{ClipRequest, MediaOps, MixRequest, FRAME_HEIGHT, FRAME_RATE, FRAME_WIDTH};
use crate::error::{Result, ShortsError};
use crate::models::MediaType;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

pub const LOUDNORM_FILTER: &str = "loudnorm=I=-16:TP=-1.5:LRA=11";
pub const DUCKING_FILTER: &str =
    "[2:a]volume=0.08[bg];[bg][1:a]sidechaincompress=threshold=0.08:ratio=8[ducked]";

/// Prefix relative paths that start with '-' so they are not read as flags.
pub fn safe_arg_path(path: &Path) -> PathBuf {
    if path.to_string_lossy().starts_with('-') {
        Path::new(".").join(path)
    } else {
        path.to_path_buf()
    }
}

fn arg(path: &Path) -> String {
    safe_arg_path(path).to_string_lossy().into_owned()
}

/// Escape a path for use as a filter option value (`ass=<path>`).
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

pub fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        arg(path),
    ]
}

pub fn clip_args(req: &ClipRequest) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into()];
    match req.media_type {
        MediaType::Video => args.extend(["-stream_loop".into(), "-1".into()]),
        MediaType::Image => args.extend(["-loop".into(), "1".into()]),
    }
    args.extend([
        "-i".into(),
        arg(&req.source),
        "-t".into(),
        req.duration.to_string(),
        "-vf".into(),
        req.filter.clone(),
        "-an".into(),
        arg(&req.output),
    ]);
    args
}

pub fn concat_args(manifest: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        arg(manifest),
        "-c".into(),
        "copy".into(),
        arg(output),
    ]
}

pub fn loudnorm_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        arg(input),
        "-af".into(),
        LOUDNORM_FILTER.into(),
        arg(output),
    ]
}

pub fn mix_args(req: &MixRequest) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-i".into(),
        arg(&req.visual),
        "-i".into(),
        arg(&req.narration),
    ];
    match &req.music {
        Some(music) => args.extend([
            "-stream_loop".into(),
            "-1".into(),
            "-i".into(),
            arg(music),
            "-filter_complex".into(),
            DUCKING_FILTER.into(),
            "-map".into(),
            "0:v".into(),
            "-map".into(),
            "[ducked]".into(),
        ]),
        None => args.extend([
            "-map".into(),
            "0:v".into(),
            "-map".into(),
            "1:a".into(),
        ]),
    }
    args.extend([
        "-vf".into(),
        format!("ass={}", escape_filter_path(&req.subtitles)),
        "-shortest".into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "veryfast".into(),
        "-crf".into(),
        "20".into(),
        "-c:a".into(),
        "aac".into(),
        arg(&req.output),
    ]);
    args
}

pub fn tone_args(seconds: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        format!("sine=frequency=220:duration={}", seconds),
        "-af".into(),
        "volume=0.03".into(),
        arg(output),
    ]
}

pub fn placeholder_args(seconds: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        format!(
            "testsrc2=size={}x{}:rate={}",
            FRAME_WIDTH, FRAME_HEIGHT, FRAME_RATE
        ),
        "-t".into(),
        seconds.to_string(),
        arg(output),
    ]
}

pub fn is_tool_on_path(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub struct FfmpegMedia {
    ffmpeg: String,
    ffprobe: String,
    retry: RetryPolicy,
}

impl FfmpegMedia {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            retry,
        }
    }

    /// Use explicit binaries instead of the ones on PATH.
    pub fn with_binaries(mut self, ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self.ffprobe = ffprobe.into();
        self
    }

    async fn exec(&self, tool: &str, args: &[String]) -> Result<Output> {
        debug!("[MEDIA] {} {}", tool, args.join(" "));
        let output = Command::new(tool)
            .kill_on_drop(true)
            .args(args)
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShortsError::tool(tool, output.status, stderr.trim()));
        }
        Ok(output)
    }

    async fn ffmpeg(&self, label: &str, args: Vec<String>) -> Result<()> {
        let args = &args;
        self.retry
            .run(label, move || async move {
                self.exec(&self.ffmpeg, args).await.map(|_| ())
            })
            .await
    }
}

impl Default for FfmpegMedia {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

#[async_trait]
impl MediaOps for FfmpegMedia {
    async fn probe_duration(&self, path: &Path) -> Result<f64> {
        if !path.exists() {
            return Err(ShortsError::MissingArtifact(path.to_path_buf()));
        }
        let args = probe_args(path);
        let args = &args;
        self.retry
            .run("probe duration", move || async move {
                let output = self.exec(&self.ffprobe, args).await?;
                let stdout = String::from_utf8_lossy(&output.stdout);
                stdout.trim().parse::<f64>().map_err(|_| {
                    ShortsError::malformed(format!(
                        "ffprobe returned no duration for {:?}: '{}'",
                        path,
                        stdout.trim()
                    ))
                })
            })
            .await
    }

    async fn render_clip(&self, request: &ClipRequest) -> Result<()> {
        self.ffmpeg("render clip", clip_args(request)).await?;
        info!("[MEDIA] Rendered {:?} ({:.2}s)", request.output, request.duration);
        Ok(())
    }

    async fn concatenate(&self, manifest: &Path, output: &Path) -> Result<()> {
        self.ffmpeg("concat", concat_args(manifest, output)).await
    }

    async fn normalize_loudness(&self, input: &Path, output: &Path) -> Result<()> {
        self.ffmpeg("loudnorm", loudnorm_args(input, output)).await
    }

    async fn mix_and_burn(&self, request: &MixRequest) -> Result<()> {
        self.ffmpeg("final mix", mix_args(request)).await
    }

    async fn synthesize_tone(&self, seconds: f64, output: &Path) -> Result<()> {
        self.ffmpeg("tone", tone_args(seconds, output)).await
    }

    async fn generate_placeholder(&self, seconds: f64, output: &Path) -> Result<()> {
        self.ffmpeg("placeholder", placeholder_args(seconds, output))
            .await
    }
}
