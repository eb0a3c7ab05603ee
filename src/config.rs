// SYNOID Shorts Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::error::{Result, ShortsError};
use crate::services::narration::DEFAULT_VOICE_ID;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub pexels_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: String,
    pub music_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read the process environment (call `dotenv()` first to pick up `.env`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset. Output and
    /// cache directories are created.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            output_dir: get("SHORTS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
            cache_dir: get("SHORTS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets").join("cache")),
            pexels_api_key: get("PEXELS_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: get("ELEVENLABS_VOICE_ID")
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            music_path: get("BG_MUSIC_PATH").map(PathBuf::from),
        };
        config.ensure_dirs()?;
        Ok(config)
    }

    fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.cache_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                ShortsError::Config(format!("cannot create {:?}: {}", dir, e))
            })?;
        }
        Ok(())
    }

    /// Cached stock downloads and placeholders.
    pub fn asset_dir(&self) -> PathBuf {
        self.cache_dir.join("pexels")
    }

    pub fn asset_history_path(&self) -> PathBuf {
        self.cache_dir.join("asset_history.json")
    }

    pub fn cta_history_path(&self) -> PathBuf {
        self.cache_dir.join("cta_history.json")
    }
}
