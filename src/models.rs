// SYNOID Shorts Data Model
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One narrative unit of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub emphasis_words: Vec<String>,
}

impl Segment {
    pub fn new(text: impl Into<String>, keywords: Vec<String>, emphasis_words: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keywords,
            emphasis_words,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStyle {
    Curiosity,
    Tips,
    Facts,
    TopList,
}

impl ScriptStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptStyle::Curiosity => "curiosity",
            ScriptStyle::Tips => "tips",
            ScriptStyle::Facts => "facts",
            ScriptStyle::TopList => "top_list",
        }
    }
}

impl fmt::Display for ScriptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    pub hook: String,
    pub style: ScriptStyle,
    pub segments: Vec<Segment>,
    pub hashtags: Vec<String>,
    pub description: String,
    pub cta_final: Option<String>,
    #[serde(default)]
    pub safety_flags: serde_json::Map<String, serde_json::Value>,
}

/// The interval a segment occupies in the narration timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub segment_index: usize,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
}

impl MediaType {
    /// Classify a file by extension. Anything that is not a known video
    /// container is treated as a still image.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "mov" => MediaType::Video,
            _ => MediaType::Image,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Image => "image",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetChoice {
    pub segment_index: usize,
    pub keyword: String,
    pub media_type: MediaType,
    pub path: PathBuf,
    pub source_url: Option<String>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VisualIntensity {
    Low,
    #[default]
    Medium,
    High,
}

impl VisualIntensity {
    /// Terminal zoom factor reached by the per-scene pseudo-zoom.
    pub fn zoom_target(&self) -> f64 {
        match self {
            VisualIntensity::Low => 1.04,
            VisualIntensity::Medium => 1.06,
            VisualIntensity::High => 1.08,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualIntensity::Low => "low",
            VisualIntensity::Medium => "medium",
            VisualIntensity::High => "high",
        }
    }
}

impl fmt::Display for VisualIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Written once to `metadata.json` after the final mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub video: PathBuf,
    pub scene_count: usize,
    pub visual_intensity: VisualIntensity,
    pub music_on: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub title: String,
    pub topic: String,
    pub style: ScriptStyle,
    pub length_target: u32,
    pub assets: Vec<AssetChoice>,
    pub final_video: PathBuf,
    pub subtitles_srt: PathBuf,
    pub subtitles_ass: PathBuf,
    pub metadata: PathBuf,
    pub hashtags: Vec<String>,
    pub description: String,
}
