// SYNOID Shorts Subtitle Renderer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Emits a plain SRT caption file and a styled ASS overlay. The ASS output is
// consumed by ffmpeg's `ass` filter, so header fields and override tags must
// match the libass dialect exactly.

use crate::error::{Result, ShortsError};
use crate::models::{Segment, Timing};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SRT_FILE: &str = "subtitles.srt";
pub const ASS_FILE: &str = "subtitles.ass";

const HIGHLIGHT_ON: &str = "{\\c&H0000FFFF&}";
const HIGHLIGHT_OFF: &str = "{\\c&H00FFFFFF&}";
const ANCHOR_TOP: &str = "{\\an8}";
const ANCHOR_BOTTOM: &str = "{\\an2}";

pub const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
PlayResX: 1080
PlayResY: 1920

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Main,Montserrat,72,&H00FFFFFF,&H0000FFFF,&H00000000,&H64000000,-1,0,0,0,100,100,0,0,1,4,1,2,70,70,220,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// `HH:MM:SS,mmm`, truncated to the millisecond.
pub fn format_srt_time(seconds: f64) -> String {
    let whole = seconds.trunc();
    let hours = (seconds / 3600.0).floor() as u64;
    let mins = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds - whole) * 1000.0) as u64;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

/// `H:MM:SS.cc`, truncated to the centisecond.
pub fn format_ass_time(seconds: f64) -> String {
    let whole = seconds.trunc();
    let hours = (seconds / 3600.0).floor() as u64;
    let mins = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds - whole) * 100.0) as u64;
    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, centis)
}

/// Wrap the first occurrence of each emphasis word in color overrides.
/// Occurrences are located in the plain text, and a word whose matches all
/// overlap an earlier word's span is left alone.
pub fn highlight_emphasis(text: &str, emphasis_words: &[String]) -> String {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for (i, word) in emphasis_words.iter().enumerate() {
        if word.is_empty() || emphasis_words[..i].contains(word) {
            continue;
        }
        let free = text
            .match_indices(word.as_str())
            .map(|(start, w)| (start, start + w.len()))
            .find(|&(start, end)| spans.iter().all(|&(s, e)| end <= s || start >= e));
        if let Some(span) = free {
            spans.push(span);
        }
    }
    spans.sort_unstable();

    let mut out = String::with_capacity(text.len() + spans.len() * 32);
    let mut cursor = 0;
    for (start, end) in spans {
        out.push_str(&text[cursor..start]);
        out.push_str(HIGHLIGHT_ON);
        out.push_str(&text[start..end]);
        out.push_str(HIGHLIGHT_OFF);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Every third segment (index 0, 3, 6...) goes to the top of the frame.
pub fn anchor_tag(index: usize) -> &'static str {
    if index % 3 == 0 {
        ANCHOR_TOP
    } else {
        ANCHOR_BOTTOM
    }
}

fn check_lengths(segments: &[Segment], timings: &[Timing]) -> Result<()> {
    if segments.len() != timings.len() {
        return Err(ShortsError::contiguity(format!(
            "{} segments but {} timings",
            segments.len(),
            timings.len()
        )));
    }
    Ok(())
}

pub fn render_srt(segments: &[Segment], timings: &[Timing]) -> Result<String> {
    check_lengths(segments, timings)?;
    let mut lines = Vec::with_capacity(segments.len() * 4);
    for (i, (segment, timing)) in segments.iter().zip(timings).enumerate() {
        lines.push((i + 1).to_string());
        lines.push(format!(
            "{} --> {}",
            format_srt_time(timing.start),
            format_srt_time(timing.end)
        ));
        lines.push(segment.text.clone());
        lines.push(String::new());
    }
    Ok(lines.join("\n"))
}

pub fn render_ass(segments: &[Segment], timings: &[Timing]) -> Result<String> {
    check_lengths(segments, timings)?;
    let events: Vec<String> = segments
        .iter()
        .zip(timings)
        .enumerate()
        .map(|(idx, (segment, timing))| {
            format!(
                "Dialogue: 0,{},{},Main,,0,0,0,,{}{}",
                format_ass_time(timing.start),
                format_ass_time(timing.end),
                anchor_tag(idx),
                highlight_emphasis(&segment.text, &segment.emphasis_words)
            )
        })
        .collect();
    Ok(format!("{}{}", ASS_HEADER, events.join("\n")))
}

#[derive(Default)]
pub struct SubtitleRenderer;

impl SubtitleRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Write both subtitle artifacts into `out_dir`.
    pub fn write(
        &self,
        segments: &[Segment],
        timings: &[Timing],
        out_dir: &Path,
    ) -> Result<(PathBuf, PathBuf)> {
        let srt = render_srt(segments, timings)?;
        let ass = render_ass(segments, timings)?;

        fs::create_dir_all(out_dir)?;
        let srt_path = out_dir.join(SRT_FILE);
        let ass_path = out_dir.join(ASS_FILE);
        fs::write(&srt_path, srt)?;
        fs::write(&ass_path, ass)?;

        info!("[SUBS] Wrote {} cues: {:?}, {:?}", segments.len(), srt_path, ass_path);
        Ok((srt_path, ass_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::timing::build_timeline;

    fn seg(text: &str, emphasis: &[&str]) -> Segment {
        Segment::new(
            text,
            vec!["kw".into()],
            emphasis.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn srt_time_format() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(4.5), "00:00:04,500");
        assert_eq!(format_srt_time(3723.25), "01:02:03,250");
    }

    #[test]
    fn ass_time_format() {
        assert_eq!(format_ass_time(0.0), "0:00:00.00");
        assert_eq!(format_ass_time(1.0), "0:00:01.00");
        assert_eq!(format_ass_time(4.5), "0:00:04.50");
        assert_eq!(format_ass_time(3723.257), "1:02:03.25");
    }

    #[test]
    fn only_first_occurrence_is_highlighted() {
        let out = highlight_emphasis(
            "isso surpreende e surpreende de novo",
            &["surpreende".to_string()],
        );
        assert_eq!(
            out,
            "isso {\\c&H0000FFFF&}surpreende{\\c&H00FFFFFF&} e surpreende de novo"
        );
        assert_eq!(out.matches(HIGHLIGHT_ON).count(), 1);
    }

    #[test]
    fn later_words_never_match_inside_earlier_highlights() {
        let words = vec!["casa".to_string(), "c".to_string()];
        let out = highlight_emphasis("casa com vista", &words);
        assert_eq!(
            out,
            "{\\c&H0000FFFF&}casa{\\c&H00FFFFFF&} {\\c&H0000FFFF&}c{\\c&H00FFFFFF&}om vista"
        );
        assert_eq!(out.matches(HIGHLIGHT_ON).count(), 2);

        let out = highlight_emphasis("casa bonita", &words);
        assert_eq!(out, "{\\c&H0000FFFF&}casa{\\c&H00FFFFFF&} bonita");

        let twice = vec!["mar".to_string(), "mar".to_string()];
        let out = highlight_emphasis("mar e mar", &twice);
        assert_eq!(out.matches(HIGHLIGHT_ON).count(), 1);
    }

    #[test]
    fn absent_and_empty_words_are_skipped() {
        let out = highlight_emphasis("texto simples", &["nada".into(), String::new()]);
        assert_eq!(out, "texto simples");
    }

    #[test]
    fn anchors_alternate_every_third() {
        let tags: Vec<&str> = (0..7).map(anchor_tag).collect();
        assert_eq!(
            tags,
            vec![ANCHOR_TOP, ANCHOR_BOTTOM, ANCHOR_BOTTOM, ANCHOR_TOP, ANCHOR_BOTTOM, ANCHOR_BOTTOM, ANCHOR_TOP]
        );
    }

    #[test]
    fn srt_entries_are_numbered() {
        let segments = vec![seg("A", &[]), seg("B", &[])];
        let timings = build_timeline(&[1.0, 2.0]).unwrap();
        let srt = render_srt(&segments, &timings).unwrap();
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:01,000\nA\n\n2\n00:00:01,000 --> 00:00:03,000\nB\n"
        );
    }

    #[test]
    fn ass_events_follow_header() {
        let segments = vec![seg("A", &[]), seg("B", &[]), seg("C", &[])];
        let timings = build_timeline(&[1.0, 2.0, 1.5]).unwrap();
        let ass = render_ass(&segments, &timings).unwrap();
        assert!(ass.starts_with(ASS_HEADER));
        let events: Vec<&str> = ass.lines().filter(|l| l.starts_with("Dialogue:")).collect();
        assert_eq!(
            events,
            vec![
                "Dialogue: 0,0:00:00.00,0:00:01.00,Main,,0,0,0,,{\\an8}A",
                "Dialogue: 0,0:00:01.00,0:00:03.00,Main,,0,0,0,,{\\an2}B",
                "Dialogue: 0,0:00:03.00,0:00:04.50,Main,,0,0,0,,{\\an2}C",
            ]
        );
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        let segments = vec![seg("A", &[])];
        let timings = build_timeline(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            render_ass(&segments, &timings),
            Err(ShortsError::Contiguity(_))
        ));
        let dir = tempfile::tempdir().unwrap();
        assert!(SubtitleRenderer::new()
            .write(&segments, &timings, dir.path())
            .is_err());
        assert!(!dir.path().join(SRT_FILE).exists());
    }
}
