// SYNOID Shorts Scene Compositor
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// One silent clip per segment, cut to the segment's exact narration length,
// then a stream-copy concat into the visual-only track.

use crate::error::{Result, ShortsError};
use crate::media::{concat_manifest, ClipRequest, MediaOps, FRAME_HEIGHT, FRAME_RATE, FRAME_WIDTH};
use crate::models::{AssetChoice, Timing, VisualIntensity};
use crate::rng::SeededRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const SCENES_DIR: &str = "scenes";
pub const VISUAL_TRACK: &str = "visual_only.mp4";
pub const BASE_ZOOM_STEP: f64 = 0.0008;
/// Relative spread of the per-scene zoom step.
pub const ZOOM_STEP_VARIATION: f64 = 0.1;

pub fn scene_file_name(index: usize) -> String {
    format!("scene_{:02}.mp4", index)
}

/// Horizontal pan anchor for the zoom window. Even scenes hold the left edge,
/// odd scenes drift toward the right one. The zoom factor is the same for both.
pub fn pan_bias(index: usize) -> &'static str {
    if index % 2 == 1 {
        "iw-iw/zoom"
    } else {
        "0"
    }
}

/// Cover-crop to the vertical frame, clamp-bounded pseudo-zoom, and a slight
/// lift on every fourth scene.
pub fn scene_filter(index: usize, intensity: VisualIntensity, step: f64) -> String {
    let mut filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},\
         zoompan=z='min(max(if(lte(on,1),1,zoom+{step:.6}),1),{target})':\
         x='{x}':y='ih/2-ih/zoom/2':d=1:s={w}x{h}:fps={fps}",
        w = FRAME_WIDTH,
        h = FRAME_HEIGHT,
        step = step.abs(),
        target = intensity.zoom_target(),
        x = pan_bias(index),
        fps = FRAME_RATE,
    );
    if index % 4 == 0 {
        filter.push_str(",eq=brightness=0.02");
    }
    filter
}

pub struct SceneCompositor {
    media: Arc<dyn MediaOps>,
    rng: SeededRng,
    scenes_dir: PathBuf,
    run_dir: PathBuf,
}

impl SceneCompositor {
    pub fn new(media: Arc<dyn MediaOps>, rng: SeededRng, run_dir: impl Into<PathBuf>) -> Self {
        let run_dir = run_dir.into();
        Self {
            media,
            rng,
            scenes_dir: run_dir.join(SCENES_DIR),
            run_dir,
        }
    }

    pub fn scenes_dir(&self) -> &Path {
        &self.scenes_dir
    }

    /// Render `scenes/scene_NN.mp4` lasting exactly `timing.duration`.
    pub async fn render_scene(
        &self,
        asset: &AssetChoice,
        timing: &Timing,
        intensity: VisualIntensity,
    ) -> Result<PathBuf> {
        if asset.segment_index != timing.segment_index {
            return Err(ShortsError::contiguity(format!(
                "asset for segment {} paired with timing for segment {}",
                asset.segment_index, timing.segment_index
            )));
        }
        fs::create_dir_all(&self.scenes_dir)?;

        let index = timing.segment_index;
        let step = BASE_ZOOM_STEP * (1.0 + self.rng.jitter(ZOOM_STEP_VARIATION));
        let output = self.scenes_dir.join(scene_file_name(index));
        let request = ClipRequest {
            source: asset.path.clone(),
            media_type: asset.media_type,
            duration: timing.duration,
            filter: scene_filter(index, intensity, step),
            output: output.clone(),
        };
        self.media.render_clip(&request).await?;
        info!(
            "[SCENES] Scene {} ({}, {:.2}s) -> {:?}",
            index, asset.media_type, timing.duration, output
        );
        Ok(output)
    }

    /// Join clips in the given order into `visual_only.mp4`.
    pub async fn concatenate(&self, clips: &[PathBuf]) -> Result<PathBuf> {
        if clips.is_empty() {
            return Err(ShortsError::contiguity("no scenes to concatenate"));
        }
        fs::create_dir_all(&self.scenes_dir)?;
        let manifest = self.scenes_dir.join("concat.txt");
        fs::write(&manifest, concat_manifest(clips))?;

        let output = self.run_dir.join(VISUAL_TRACK);
        self.media.concatenate(&manifest, &output).await?;
        info!("[SCENES] Concatenated {} scenes -> {:?}", clips.len(), output);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaCall, RecordingMedia};
    use crate::models::MediaType;

    #[test]
    fn filter_shape() {
        let f = scene_filter(0, VisualIntensity::Medium, BASE_ZOOM_STEP);
        assert_eq!(
            f,
            "scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920,\
             zoompan=z='min(max(if(lte(on,1),1,zoom+0.000800),1),1.06)':\
             x='0':y='ih/2-ih/zoom/2':d=1:s=1080x1920:fps=30,\
             eq=brightness=0.02"
        );
    }

    #[test]
    fn every_scene_zooms_toward_its_target() {
        for index in 0..8 {
            let f = scene_filter(index, VisualIntensity::High, BASE_ZOOM_STEP);
            assert!(f.contains("zoom+0.000800),1),1.08)"), "scene {}: {}", index, f);
            assert!(!f.contains("*-1"));
        }
        assert!(scene_filter(2, VisualIntensity::Low, BASE_ZOOM_STEP).contains("x='0'"));
        assert!(scene_filter(3, VisualIntensity::Low, BASE_ZOOM_STEP).contains("x='iw-iw/zoom'"));
    }

    #[test]
    fn brightness_lift_every_fourth_scene() {
        let lifted: Vec<usize> = (0..9)
            .filter(|&i| scene_filter(i, VisualIntensity::Low, BASE_ZOOM_STEP).contains("eq=brightness"))
            .collect();
        assert_eq!(lifted, vec![0, 4, 8]);
    }

    #[test]
    fn seeded_steps_stay_within_ten_percent() {
        let rng = SeededRng::seeded(9);
        for _ in 0..100 {
            let step = BASE_ZOOM_STEP * (1.0 + rng.jitter(ZOOM_STEP_VARIATION));
            assert!(step >= BASE_ZOOM_STEP * 0.9 - 1e-12);
            assert!(step <= BASE_ZOOM_STEP * 1.1 + 1e-12);
        }
    }

    fn asset(dir: &Path, index: usize, name: &str) -> AssetChoice {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        AssetChoice {
            segment_index: index,
            keyword: "kw".into(),
            media_type: MediaType::from_path(&path),
            path,
            source_url: None,
        }
    }

    #[tokio::test]
    async fn scenes_match_timing_and_concat_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let media = Arc::new(RecordingMedia::new());
        let comp = SceneCompositor::new(media.clone(), SeededRng::seeded(1), dir.path());

        let timings = crate::assembly::timing::build_timeline(&[1.0, 2.5]).unwrap();
        let a = asset(dir.path(), 0, "a_0000000000.mp4");
        let b = asset(dir.path(), 1, "b_0000000000.jpg");

        let s0 = comp.render_scene(&a, &timings[0], VisualIntensity::Medium).await.unwrap();
        let s1 = comp.render_scene(&b, &timings[1], VisualIntensity::Medium).await.unwrap();
        assert!(s0.ends_with("scenes/scene_00.mp4"));

        let calls = media.calls();
        match &calls[1] {
            MediaCall::RenderClip(req) => {
                assert_eq!(req.duration, 2.5);
                assert_eq!(req.media_type, MediaType::Image);
            }
            other => panic!("unexpected call {:?}", other),
        }

        let visual = comp.concatenate(&[s0, s1]).await.unwrap();
        assert_eq!(visual, dir.path().join(VISUAL_TRACK));
        let manifest = fs::read_to_string(dir.path().join("scenes/concat.txt")).unwrap();
        assert_eq!(manifest, "file 'scene_00.mp4'\nfile 'scene_01.mp4'");
    }

    #[tokio::test]
    async fn mismatched_pairs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let media = Arc::new(RecordingMedia::new());
        let comp = SceneCompositor::new(media.clone(), SeededRng::seeded(1), dir.path());
        let timings = crate::assembly::timing::build_timeline(&[1.0, 1.0]).unwrap();
        let a = asset(dir.path(), 0, "a_0000000000.mp4");
        assert!(matches!(
            comp.render_scene(&a, &timings[1], VisualIntensity::Low).await,
            Err(ShortsError::Contiguity(_))
        ));
        assert!(media.calls().is_empty());
    }
}
