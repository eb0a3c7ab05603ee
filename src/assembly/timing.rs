// SYNOID Shorts Timing Deriver
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Turns rendered narration segments into a contiguous timeline. Segment i
// starts exactly where segment i-1 ends; segment 0 starts at 0.

use crate::error::{Result, ShortsError};
use crate::media::MediaOps;
use crate::models::Timing;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct TimingDeriver {
    media: Arc<dyn MediaOps>,
}

impl TimingDeriver {
    pub fn new(media: Arc<dyn MediaOps>) -> Self {
        Self { media }
    }

    /// Probe each file in order and accumulate offsets. A failed probe aborts.
    pub async fn derive(&self, audio_files: &[PathBuf]) -> Result<Vec<Timing>> {
        let mut durations = Vec::with_capacity(audio_files.len());
        for file in audio_files {
            durations.push(self.media.probe_duration(file).await?);
        }
        let timings = build_timeline(&durations)?;
        validate_contiguous(&timings)?;
        info!(
            "[TIMING] {} segments, {:.2}s total",
            timings.len(),
            timings.last().map(|t| t.end).unwrap_or(0.0)
        );
        Ok(timings)
    }
}

/// Accumulate measured durations into a timeline.
pub fn build_timeline(durations: &[f64]) -> Result<Vec<Timing>> {
    let mut timings = Vec::with_capacity(durations.len());
    let mut current = 0.0;
    for (segment_index, &duration) in durations.iter().enumerate() {
        if !duration.is_finite() || duration < 0.0 {
            return Err(ShortsError::malformed(format!(
                "segment {} has invalid duration {}",
                segment_index, duration
            )));
        }
        let end = current + duration;
        timings.push(Timing {
            segment_index,
            start: current,
            end,
            duration,
        });
        current = end;
    }
    Ok(timings)
}

/// Fail fast unless the timeline is index-ordered and gap-free.
pub fn validate_contiguous(timings: &[Timing]) -> Result<()> {
    let mut expected_start = 0.0;
    for (i, t) in timings.iter().enumerate() {
        if t.segment_index != i {
            return Err(ShortsError::contiguity(format!(
                "timing at position {} carries segment_index {}",
                i, t.segment_index
            )));
        }
        if t.start != expected_start {
            return Err(ShortsError::contiguity(format!(
                "segment {} starts at {} but previous ends at {}",
                i, t.start, expected_start
            )));
        }
        expected_start = t.end;
    }
    Ok(())
}
