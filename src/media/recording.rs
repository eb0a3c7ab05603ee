// SYNOID Shorts Recording Media Backend
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Records every media operation instead of shelling out. Outputs are touched
// on disk so later steps see them; probes answer from a table keyed by file
// name. Used by `--dry-run` and by the test suite.

use super::{ClipRequest, MediaOps, MixRequest};
use crate::error::{Result, ShortsError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Probe(PathBuf),
    RenderClip(ClipRequest),
    Concatenate { manifest: PathBuf, output: PathBuf },
    NormalizeLoudness { input: PathBuf, output: PathBuf },
    MixAndBurn(MixRequest),
    Tone { seconds: f64, output: PathBuf },
    Placeholder { seconds: f64, output: PathBuf },
}

impl MediaCall {
    /// Shell-like rendering for dry-run output.
    pub fn describe(&self) -> String {
        match self {
            MediaCall::Probe(p) => format!("ffprobe {:?}", p),
            MediaCall::RenderClip(r) => format!(
                "ffmpeg -i {:?} -t {} -vf \"{}\" -an {:?}",
                r.source, r.duration, r.filter, r.output
            ),
            MediaCall::Concatenate { manifest, output } => {
                format!("ffmpeg -f concat -i {:?} -c copy {:?}", manifest, output)
            }
            MediaCall::NormalizeLoudness { input, output } => {
                format!("ffmpeg -i {:?} -af loudnorm {:?}", input, output)
            }
            MediaCall::MixAndBurn(r) => format!(
                "ffmpeg -i {:?} -i {:?}{} -vf ass={:?} {:?}",
                r.visual,
                r.narration,
                r.music
                    .as_ref()
                    .map(|m| format!(" -stream_loop -1 -i {:?} (ducked)", m))
                    .unwrap_or_default(),
                r.subtitles,
                r.output
            ),
            MediaCall::Tone { seconds, output } => {
                format!("ffmpeg -f lavfi -i sine:{}s {:?}", seconds, output)
            }
            MediaCall::Placeholder { seconds, output } => {
                format!("ffmpeg -f lavfi -i testsrc2 -t {} {:?}", seconds, output)
            }
        }
    }
}

pub struct RecordingMedia {
    calls: Mutex<Vec<MediaCall>>,
    durations: HashMap<String, f64>,
    default_duration: Option<f64>,
}

impl RecordingMedia {
    /// Probes of unknown files fail, like ffprobe on a missing file.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            durations: HashMap::new(),
            default_duration: None,
        }
    }

    /// Answer probes of unlisted files with `seconds`.
    pub fn with_default_duration(mut self, seconds: f64) -> Self {
        self.default_duration = Some(seconds);
        self
    }

    /// Answer probes of any file named `file_name` with `seconds`.
    pub fn with_duration(mut self, file_name: &str, seconds: f64) -> Self {
        self.durations.insert(file_name.to_string(), seconds);
        self
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, pred: impl Fn(&MediaCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    fn record(&self, call: MediaCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn require(path: &Path) -> Result<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(ShortsError::MissingArtifact(path.to_path_buf()))
        }
    }

    fn touch(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, b"")?;
        Ok(())
    }
}

impl Default for RecordingMedia {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaOps for RecordingMedia {
    async fn probe_duration(&self, path: &Path) -> Result<f64> {
        self.record(MediaCall::Probe(path.to_path_buf()));
        Self::require(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.durations
            .get(&name)
            .copied()
            .or(self.default_duration)
            .ok_or_else(|| ShortsError::tool("ffprobe", "exit status: 1", format!("{:?}: no duration", path)))
    }

    async fn render_clip(&self, request: &ClipRequest) -> Result<()> {
        self.record(MediaCall::RenderClip(request.clone()));
        Self::require(&request.source)?;
        Self::touch(&request.output)
    }

    async fn concatenate(&self, manifest: &Path, output: &Path) -> Result<()> {
        self.record(MediaCall::Concatenate {
            manifest: manifest.to_path_buf(),
            output: output.to_path_buf(),
        });
        Self::require(manifest)?;
        Self::touch(output)
    }

    async fn normalize_loudness(&self, input: &Path, output: &Path) -> Result<()> {
        self.record(MediaCall::NormalizeLoudness {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        Self::require(input)?;
        Self::touch(output)
    }

    async fn mix_and_burn(&self, request: &MixRequest) -> Result<()> {
        self.record(MediaCall::MixAndBurn(request.clone()));
        Self::require(&request.visual)?;
        Self::require(&request.narration)?;
        Self::require(&request.subtitles)?;
        Self::touch(&request.output)
    }

    async fn synthesize_tone(&self, seconds: f64, output: &Path) -> Result<()> {
        self.record(MediaCall::Tone {
            seconds,
            output: output.to_path_buf(),
        });
        Self::touch(output)
    }

    async fn generate_placeholder(&self, seconds: f64, output: &Path) -> Result<()> {
        self.record(MediaCall::Placeholder {
            seconds,
            output: output.to_path_buf(),
        });
        Self::touch(output)
    }
}
