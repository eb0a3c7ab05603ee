// SYNOID Shorts Assembly
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod assets;
pub mod compositor;
pub mod mixer;
pub mod subtitles;
pub mod timing;

pub use assets::AssetSelector;
pub use compositor::SceneCompositor;
pub use mixer::{FinalMixer, MixInputs};
pub use subtitles::SubtitleRenderer;
pub use timing::{build_timeline, validate_contiguous, TimingDeriver};
