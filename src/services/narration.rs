// SYNOID Shorts Narrator
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Per-segment speech (ElevenLabs, or a quiet tone when no key is set), joined
// and loudness-normalized into one narration track. Timing is measured from
// the rendered segment files, never estimated from text.

use crate::assembly::timing::TimingDeriver;
use crate::error::{Result, ShortsError};
use crate::media::{concat_manifest, MediaOps};
use crate::models::Timing;
use crate::retry::RetryPolicy;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const TTS_ENDPOINT: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const TTS_MODEL: &str = "eleven_multilingual_v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

pub const AUDIO_DIR: &str = "audio";
pub const RAW_NARRATION: &str = "narration_raw.mp3";
pub const FULL_NARRATION: &str = "narration_full.mp3";
pub const TIMING_FILE: &str = "timing.json";

/// Rough speaking time used for the stand-in tone.
pub fn tone_seconds(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words * 0.38).max(1.8)
}

pub fn segment_file_name(index: usize) -> String {
    format!("segment_{:02}.mp3", index + 1)
}

#[derive(Debug, Clone)]
pub struct NarrationOutput {
    pub segment_files: Vec<PathBuf>,
    pub narration: PathBuf,
    pub timing_path: PathBuf,
    pub timings: Vec<Timing>,
}

pub struct Narrator {
    client: reqwest::Client,
    api_key: Option<String>,
    voice_id: String,
    endpoint: String,
    media: Arc<dyn MediaOps>,
    retry: RetryPolicy,
}

impl Narrator {
    pub fn new(api_key: Option<String>, voice_id: impl Into<String>, media: Arc<dyn MediaOps>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id: voice_id.into(),
            endpoint: TTS_ENDPOINT.to_string(),
            media,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn synthesize(&self, texts: &[String], out_dir: &Path) -> Result<NarrationOutput> {
        if texts.is_empty() {
            return Err(ShortsError::contiguity("nothing to narrate"));
        }
        let audio_dir = out_dir.join(AUDIO_DIR);
        fs::create_dir_all(&audio_dir)?;

        if self.api_key.is_none() {
            warn!("[NARRATION] No ELEVENLABS_API_KEY; rendering placeholder tones");
        }

        let mut segment_files = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let path = audio_dir.join(segment_file_name(i));
            match self.api_key.as_deref() {
                Some(key) => {
                    let path_ref = &path;
                    self.retry
                        .run("elevenlabs tts", || self.speak(key, text, path_ref))
                        .await?
                }
                None => self.media.synthesize_tone(tone_seconds(text), &path).await?,
            }
            segment_files.push(path);
        }

        let manifest = audio_dir.join("concat.txt");
        fs::write(&manifest, concat_manifest(&segment_files))?;
        let raw = out_dir.join(RAW_NARRATION);
        self.media.concatenate(&manifest, &raw).await?;
        let narration = out_dir.join(FULL_NARRATION);
        self.media.normalize_loudness(&raw, &narration).await?;

        let timings = TimingDeriver::new(self.media.clone())
            .derive(&segment_files)
            .await?;
        let timing_path = out_dir.join(TIMING_FILE);
        fs::write(&timing_path, serde_json::to_string_pretty(&timings)?)?;

        info!(
            "[NARRATION] {} segments -> {:?}",
            segment_files.len(),
            narration
        );
        Ok(NarrationOutput {
            segment_files,
            narration,
            timing_path,
            timings,
        })
    }

    async fn speak(&self, key: &str, text: &str, out: &Path) -> Result<()> {
        let payload = json!({
            "text": text,
            "model_id": TTS_MODEL,
            "voice_settings": { "stability": 0.45, "similarity_boost": 0.8 }
        });
        let resp = self
            .client
            .post(format!("{}/{}", self.endpoint, self.voice_id))
            .header("xi-api-key", key)
            .header("Accept", "audio/mpeg")
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ShortsError::Network(format!("elevenlabs returned {}", resp.status())));
        }
        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(ShortsError::malformed("elevenlabs returned no audio"));
        }
        tokio::fs::write(out, &audio).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaCall, RecordingMedia};

    #[test]
    fn tone_length_follows_word_count() {
        assert_eq!(tone_seconds("curta"), 1.8);
        let ten = "um dois tres quatro cinco seis sete oito nove dez";
        assert!((tone_seconds(ten) - 3.8).abs() < 1e-9);
    }

    #[test]
    fn segment_files_are_one_based() {
        assert_eq!(segment_file_name(0), "segment_01.mp3");
        assert_eq!(segment_file_name(11), "segment_12.mp3");
    }

    #[tokio::test]
    async fn offline_narration_builds_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let media = Arc::new(
            RecordingMedia::new()
                .with_duration("segment_01.mp3", 1.0)
                .with_duration("segment_02.mp3", 2.0)
                .with_duration("segment_03.mp3", 1.5),
        );
        let narrator = Narrator::new(None, DEFAULT_VOICE_ID, media.clone());
        let texts: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let out = narrator.synthesize(&texts, dir.path()).await.unwrap();

        assert_eq!(out.segment_files.len(), 3);
        assert_eq!(out.narration, dir.path().join(FULL_NARRATION));
        assert_eq!(out.timings[2].start, 3.0);
        assert_eq!(out.timings[2].end, 4.5);

        let saved: Vec<Timing> =
            serde_json::from_str(&fs::read_to_string(&out.timing_path).unwrap()).unwrap();
        assert_eq!(saved, out.timings);

        let manifest = fs::read_to_string(dir.path().join("audio/concat.txt")).unwrap();
        assert_eq!(
            manifest,
            "file 'segment_01.mp3'\nfile 'segment_02.mp3'\nfile 'segment_03.mp3'"
        );
        assert_eq!(media.count(|c| matches!(c, MediaCall::Tone { .. })), 3);
        assert_eq!(media.count(|c| matches!(c, MediaCall::NormalizeLoudness { .. })), 1);
    }

    #[tokio::test]
    async fn failed_probe_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let media = Arc::new(RecordingMedia::new().with_duration("segment_01.mp3", 1.0));
        let narrator = Narrator::new(None, DEFAULT_VOICE_ID, media);
        let texts: Vec<String> = vec!["A".into(), "B".into()];
        assert!(narrator.synthesize(&texts, dir.path()).await.is_err());
        assert!(!dir.path().join(TIMING_FILE).exists());
    }
}
