// SYNOID Shorts Pipeline
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// One run, strictly in order: script, CTAs, narration + timing, assets,
// subtitles, scenes, final mix, report. Any failed step aborts the run and
// leaves what was already written on disk.

use crate::assembly::{
    validate_contiguous, AssetSelector, FinalMixer, MixInputs, SceneCompositor, SubtitleRenderer,
};
use crate::cache::{HistoryStore, JsonHistoryStore};
use crate::config::AppConfig;
use crate::error::{Result, ShortsError};
use crate::media::MediaOps;
use crate::models::{AssetChoice, GenerationReport, Script, ScriptStyle, Timing, VisualIntensity};
use crate::retry::RetryPolicy;
use crate::rng::SeededRng;
use crate::services::{CtaPicker, Narrator, PexelsClient, ScriptSource, StockSearch};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const REPORT_FILE: &str = "generation_report.json";

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub topic: String,
    pub style: ScriptStyle,
    pub length: u32,
    pub cta_variation: bool,
    pub visual_intensity: VisualIntensity,
    pub music: bool,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, style: ScriptStyle) -> Self {
        Self {
            topic: topic.into(),
            style,
            length: 40,
            cta_variation: true,
            visual_intensity: VisualIntensity::default(),
            music: false,
        }
    }
}

/// `<style>_<first 18 chars of topic, spaces as underscores>`.
pub fn run_name(style: ScriptStyle, topic: &str) -> String {
    let head: String = topic.chars().take(18).collect();
    format!("{}_{}", style, head.replace(' ', "_"))
}

/// Hook and opening CTA lead into the first segment; the closing CTA ends
/// the last one.
pub fn splice_ctas(script: &mut Script, initial: &str, final_line: &str) -> Result<()> {
    let hook = script.hook.clone();
    let first = script
        .segments
        .first_mut()
        .ok_or_else(|| ShortsError::malformed("script has no segments"))?;
    first.text = format!("{} {}. {}", hook, initial, first.text);
    if let Some(last) = script.segments.last_mut() {
        last.text = format!("{} {}.", last.text, final_line);
    }
    Ok(())
}

fn check_assets(assets: &[AssetChoice], timings: &[Timing]) -> Result<()> {
    if assets.len() != timings.len() {
        return Err(ShortsError::contiguity(format!(
            "{} assets for {} timings",
            assets.len(),
            timings.len()
        )));
    }
    if let Some((i, a)) = assets
        .iter()
        .enumerate()
        .find(|(i, a)| a.segment_index != *i)
    {
        return Err(ShortsError::contiguity(format!(
            "asset at position {} carries segment_index {}",
            i, a.segment_index
        )));
    }
    Ok(())
}

pub struct ShortsPipeline {
    output_dir: PathBuf,
    music_path: Option<PathBuf>,
    media: Arc<dyn MediaOps>,
    rng: SeededRng,
    script: ScriptSource,
    narrator: Narrator,
    cta: CtaPicker,
    assets: AssetSelector,
    subtitles: SubtitleRenderer,
}

impl ShortsPipeline {
    /// Wire every component from configuration. Services without a key run
    /// in their offline mode.
    pub fn from_config(
        config: &AppConfig,
        media: Arc<dyn MediaOps>,
        seed: Option<u64>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let rng = SeededRng::new(seed);
        let asset_history: Arc<dyn HistoryStore> =
            Arc::new(JsonHistoryStore::open(config.asset_history_path())?);
        let cta_history: Arc<dyn HistoryStore> =
            Arc::new(JsonHistoryStore::open(config.cta_history_path())?);

        let mut assets = AssetSelector::new(config.asset_dir(), asset_history, media.clone())
            .with_retry(retry);
        if let Some(key) = &config.pexels_api_key {
            assets = assets.with_search(Arc::new(PexelsClient::new(key.clone())));
        }

        Ok(Self {
            output_dir: config.output_dir.clone(),
            music_path: config.music_path.clone(),
            script: ScriptSource::new(config.gemini_api_key.clone()).with_retry(retry),
            narrator: Narrator::new(
                config.elevenlabs_api_key.clone(),
                config.elevenlabs_voice_id.clone(),
                media.clone(),
            )
            .with_retry(retry),
            cta: CtaPicker::new(cta_history, rng.clone()),
            assets,
            subtitles: SubtitleRenderer::new(),
            media,
            rng,
        })
    }

    /// Replace the stock search backend (tests, alternative providers).
    pub fn with_stock_search(mut self, search: Arc<dyn StockSearch>) -> Self {
        self.assets = self.assets.with_search(search);
        self
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationReport> {
        let run_dir = self.output_dir.join(run_name(request.style, &request.topic));
        fs::create_dir_all(&run_dir)?;
        info!("[PIPELINE] Run {:?} ({} / {}s)", run_dir, request.style, request.length);

        let mut script = self
            .script
            .generate(&request.topic, request.style, request.length)
            .await?;

        let initial = self.cta.initial(request.style, request.cta_variation)?;
        let final_line = match script.cta_final.clone() {
            Some(line) => line,
            None => self.cta.final_line(request.cta_variation)?,
        };
        splice_ctas(&mut script, &initial, &final_line)?;

        let texts: Vec<String> = script.segments.iter().map(|s| s.text.clone()).collect();
        let narration = self.narrator.synthesize(&texts, &run_dir).await?;
        let timings = narration.timings;
        if timings.len() != script.segments.len() {
            return Err(ShortsError::contiguity(format!(
                "{} timings for {} segments",
                timings.len(),
                script.segments.len()
            )));
        }
        validate_contiguous(&timings)?;

        let mut assets = Vec::with_capacity(script.segments.len());
        for (i, segment) in script.segments.iter().enumerate() {
            assets.push(self.assets.pick_asset(i, &segment.keywords).await?);
        }
        check_assets(&assets, &timings)?;

        let (srt_path, ass_path) = self.subtitles.write(&script.segments, &timings, &run_dir)?;

        let compositor = SceneCompositor::new(self.media.clone(), self.rng.clone(), &run_dir);
        let mut clips = Vec::with_capacity(assets.len());
        for (asset, timing) in assets.iter().zip(&timings) {
            clips.push(
                compositor
                    .render_scene(asset, timing, request.visual_intensity)
                    .await?,
            );
        }
        let visual = compositor.concatenate(&clips).await?;

        let (final_video, metadata) = FinalMixer::new(self.media.clone(), &run_dir)
            .mix(MixInputs {
                visual: &visual,
                narration: &narration.narration,
                subtitles_ass: &ass_path,
                music_on: request.music,
                music_path: self.music_path.as_deref(),
                scene_count: clips.len(),
                intensity: request.visual_intensity,
            })
            .await?;

        let report = GenerationReport {
            title: script.title.clone(),
            topic: request.topic.clone(),
            style: request.style,
            length_target: request.length,
            assets,
            final_video,
            subtitles_srt: srt_path,
            subtitles_ass: ass_path,
            metadata,
            hashtags: script.hashtags.clone(),
            description: script.description.clone(),
        };
        write_report(&run_dir, &report)?;
        info!("[PIPELINE] Done: {:?}", report.final_video);
        Ok(report)
    }
}

fn write_report(run_dir: &Path, report: &GenerationReport) -> Result<PathBuf> {
    let path = run_dir.join(REPORT_FILE);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}
