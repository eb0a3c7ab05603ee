// SYNOID Shorts Final Mixer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Visual track + normalized narration (+ ducked background music) with the
// ASS overlay burned in. Writes the run's metadata record last.

use crate::error::{Result, ShortsError};
use crate::media::{MediaOps, MixRequest};
use crate::models::{RunMetadata, VisualIntensity};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const FINAL_VIDEO: &str = "final.mp4";
pub const METADATA_FILE: &str = "metadata.json";

pub struct MixInputs<'a> {
    pub visual: &'a Path,
    pub narration: &'a Path,
    pub subtitles_ass: &'a Path,
    pub music_on: bool,
    pub music_path: Option<&'a Path>,
    pub scene_count: usize,
    pub intensity: VisualIntensity,
}

pub struct FinalMixer {
    media: Arc<dyn MediaOps>,
    run_dir: PathBuf,
}

impl FinalMixer {
    pub fn new(media: Arc<dyn MediaOps>, run_dir: impl Into<PathBuf>) -> Self {
        Self {
            media,
            run_dir: run_dir.into(),
        }
    }

    /// Returns `(final.mp4, metadata.json)`.
    pub async fn mix(&self, inputs: MixInputs<'_>) -> Result<(PathBuf, PathBuf)> {
        for required in [inputs.visual, inputs.narration, inputs.subtitles_ass] {
            if !required.exists() {
                return Err(ShortsError::MissingArtifact(required.to_path_buf()));
            }
        }

        let music = match (inputs.music_on, inputs.music_path) {
            (true, Some(path)) if path.is_file() => Some(path.to_path_buf()),
            (true, Some(path)) => {
                warn!("[MIXER] Music requested but {:?} is missing; mixing narration only", path);
                None
            }
            (true, None) => {
                warn!("[MIXER] Music requested but no track configured");
                None
            }
            (false, _) => None,
        };
        let music_mixed = music.is_some();

        let output = self.run_dir.join(FINAL_VIDEO);
        let request = MixRequest {
            visual: inputs.visual.to_path_buf(),
            narration: inputs.narration.to_path_buf(),
            music,
            subtitles: inputs.subtitles_ass.to_path_buf(),
            output: output.clone(),
        };
        self.media.mix_and_burn(&request).await?;

        let metadata = RunMetadata {
            video: output.clone(),
            scene_count: inputs.scene_count,
            visual_intensity: inputs.intensity,
            music_on: music_mixed,
        };
        let metadata_path = self.run_dir.join(METADATA_FILE);
        fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

        info!(
            "[MIXER] Final video {:?} ({} scenes, music: {})",
            output, inputs.scene_count, music_mixed
        );
        Ok((output, metadata_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaCall, RecordingMedia};

    struct Fixture {
        dir: tempfile::TempDir,
        media: Arc<RecordingMedia>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            for name in ["visual_only.mp4", "narration_full.mp3", "subtitles.ass"] {
                fs::write(dir.path().join(name), b"").unwrap();
            }
            Self {
                dir,
                media: Arc::new(RecordingMedia::new()),
            }
        }

        async fn mix(&self, music_on: bool, music: Option<&Path>) -> RunMetadata {
            let d = self.dir.path();
            let mixer = FinalMixer::new(self.media.clone(), d);
            let (video, meta) = mixer
                .mix(MixInputs {
                    visual: &d.join("visual_only.mp4"),
                    narration: &d.join("narration_full.mp3"),
                    subtitles_ass: &d.join("subtitles.ass"),
                    music_on,
                    music_path: music,
                    scene_count: 3,
                    intensity: VisualIntensity::High,
                })
                .await
                .unwrap();
            assert!(video.exists());
            serde_json::from_str(&fs::read_to_string(meta).unwrap()).unwrap()
        }

        fn last_music(&self) -> Option<PathBuf> {
            match self.media.calls().last() {
                Some(MediaCall::MixAndBurn(req)) => req.music.clone(),
                other => panic!("unexpected call {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn music_off_maps_narration_only() {
        let fx = Fixture::new();
        let meta = fx.mix(false, None).await;
        assert!(!meta.music_on);
        assert_eq!(meta.scene_count, 3);
        assert_eq!(meta.visual_intensity, VisualIntensity::High);
        assert!(fx.last_music().is_none());
    }

    #[tokio::test]
    async fn missing_music_file_is_reported_as_off() {
        let fx = Fixture::new();
        let ghost = fx.dir.path().join("ghost.mp3");
        let meta = fx.mix(true, Some(ghost.as_path())).await;
        assert!(!meta.music_on);
        assert!(fx.last_music().is_none());
    }

    #[tokio::test]
    async fn existing_music_is_mixed() {
        let fx = Fixture::new();
        let track = fx.dir.path().join("bg.mp3");
        fs::write(&track, b"").unwrap();
        let meta = fx.mix(true, Some(track.as_path())).await;
        assert!(meta.music_on);
        assert_eq!(fx.last_music(), Some(track));
    }

    #[tokio::test]
    async fn missing_visual_track_aborts() {
        let fx = Fixture::new();
        let d = fx.dir.path();
        let err = FinalMixer::new(fx.media.clone(), d)
            .mix(MixInputs {
                visual: &d.join("nope.mp4"),
                narration: &d.join("narration_full.mp3"),
                subtitles_ass: &d.join("subtitles.ass"),
                music_on: false,
                music_path: None,
                scene_count: 1,
                intensity: VisualIntensity::Low,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ShortsError::MissingArtifact(_)));
        assert!(fx.media.calls().is_empty());
    }
}
