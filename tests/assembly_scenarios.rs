// SYNOID Shorts Assembly Scenario Tests
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use std::fs;
use std::sync::Arc;
use synoid_shorts::assembly::assets::RECENT_ASSETS_KEY;
use synoid_shorts::assembly::{validate_contiguous, AssetSelector, SubtitleRenderer};
use synoid_shorts::cache::{HistoryStore, JsonHistoryStore};
use synoid_shorts::media::RecordingMedia;
use synoid_shorts::models::Segment;
use synoid_shorts::services::narration::{Narrator, DEFAULT_VOICE_ID};
use tempfile::TempDir;

fn seg(text: &str, emphasis: &[&str]) -> Segment {
    Segment::new(
        text,
        vec!["kw".into()],
        emphasis.iter().map(|s| s.to_string()).collect(),
    )
}

#[tokio::test]
async fn three_segment_narration_drives_subtitles() {
    let dir = TempDir::new().unwrap();
    let media = Arc::new(
        RecordingMedia::new()
            .with_duration("segment_01.mp3", 1.0)
            .with_duration("segment_02.mp3", 2.0)
            .with_duration("segment_03.mp3", 1.5),
    );
    let narrator = Narrator::new(None, DEFAULT_VOICE_ID, media);
    let texts: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
    let narration = narrator.synthesize(&texts, dir.path()).await.unwrap();

    let triples: Vec<(f64, f64, f64)> = narration
        .timings
        .iter()
        .map(|t| (t.start, t.end, t.duration))
        .collect();
    assert_eq!(triples, vec![(0.0, 1.0, 1.0), (1.0, 3.0, 2.0), (3.0, 4.5, 1.5)]);
    validate_contiguous(&narration.timings).unwrap();

    let segments = vec![seg("A", &[]), seg("B", &[]), seg("C", &[])];
    let (srt, ass) = SubtitleRenderer::new()
        .write(&segments, &narration.timings, dir.path())
        .unwrap();

    let srt = fs::read_to_string(srt).unwrap();
    assert!(srt.contains("00:00:03,000 --> 00:00:04,500"));

    let ass = fs::read_to_string(ass).unwrap();
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

#[tokio::test]
async fn each_emphasis_word_is_highlighted_once() {
    let dir = TempDir::new().unwrap();
    let media = Arc::new(RecordingMedia::new().with_default_duration(2.0));
    let narrator = Narrator::new(None, DEFAULT_VOICE_ID, media);
    let segments = vec![
        seg("o mar surpreende e o mar acalma", &["mar", "acalma"]),
        seg("sem destaque aqui", &["ausente"]),
    ];
    let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
    let narration = narrator.synthesize(&texts, dir.path()).await.unwrap();

    let (_, ass) = SubtitleRenderer::new()
        .write(&segments, &narration.timings, dir.path())
        .unwrap();
    let ass = fs::read_to_string(ass).unwrap();
    let events: Vec<&str> = ass.lines().filter(|l| l.starts_with("Dialogue:")).collect();

    assert_eq!(events[0].matches("{\\c&H0000FFFF&}mar{\\c&H00FFFFFF&}").count(), 1);
    assert_eq!(events[0].matches("{\\c&H0000FFFF&}acalma{\\c&H00FFFFFF&}").count(), 1);
    assert_eq!(events[0].matches("{\\c&H0000FFFF&}").count(), 2);
    assert!(!events[1].contains("&H0000FFFF&"));
}

#[tokio::test]
async fn persisted_recency_rotates_cached_assets_across_runs() {
    let cache = TempDir::new().unwrap();
    let asset_dir = cache.path().join("pexels");
    fs::create_dir_all(&asset_dir).unwrap();
    let names = ["praia_0000000001.mp4", "praia_0000000002.mp4", "praia_0000000003.jpg"];
    for name in names {
        fs::write(asset_dir.join(name), b"").unwrap();
    }
    let history_path = cache.path().join("asset_history.json");

    // Previous run already used the first two.
    {
        let store = JsonHistoryStore::open(&history_path).unwrap();
        for name in &names[..2] {
            store
                .append(RECENT_ASSETS_KEY, &asset_dir.join(name).to_string_lossy(), 12)
                .unwrap();
        }
    }

    let store: Arc<dyn HistoryStore> = Arc::new(JsonHistoryStore::open(&history_path).unwrap());
    let selector = AssetSelector::new(&asset_dir, store, Arc::new(RecordingMedia::new()));
    let choice = selector.pick_asset(0, &["Praia".into()]).await.unwrap();
    assert_eq!(choice.path, asset_dir.join("praia_0000000003.jpg"));
    assert_eq!(choice.media_type, synoid_shorts::models::MediaType::Image);

    // All three are recent now; the first by name is reused.
    let again = selector.pick_asset(1, &["Praia".into()]).await.unwrap();
    assert_eq!(again.path, asset_dir.join("praia_0000000001.mp4"));

    let reopened = JsonHistoryStore::open(&history_path).unwrap();
    assert_eq!(reopened.load(RECENT_ASSETS_KEY).unwrap().len(), 4);
}

#[tokio::test]
async fn lookback_of_six_frees_an_asset_on_the_seventh_pick() {
    let cache = TempDir::new().unwrap();
    let asset_dir = cache.path().join("pexels");
    fs::create_dir_all(&asset_dir).unwrap();
    let cached: Vec<String> = (0..8)
        .map(|i| {
            let path = asset_dir.join(format!("rio_{:010}.mp4", i));
            fs::write(&path, b"").unwrap();
            path.to_string_lossy().into_owned()
        })
        .collect();
    let history_path = cache.path().join("asset_history.json");

    // Six earlier picks: the first six files by name.
    JsonHistoryStore::open(&history_path)
        .unwrap()
        .store(RECENT_ASSETS_KEY, &cached[..6].to_vec())
        .unwrap();

    let store: Arc<dyn HistoryStore> = Arc::new(JsonHistoryStore::open(&history_path).unwrap());
    let selector = AssetSelector::new(&asset_dir, store, Arc::new(RecordingMedia::new()));
    let mut sequence: Vec<String> = cached[..6].to_vec();
    for i in 0..14 {
        let choice = selector.pick_asset(i, &["Rio".into()]).await.unwrap();
        sequence.push(choice.path.to_string_lossy().into_owned());
    }

    // The oldest entry leaves the lookback after six newer picks.
    assert_eq!(sequence[6], cached[6]);
    assert_eq!(sequence[7], cached[0]);
    for i in 6..sequence.len() {
        assert!(
            !sequence[i - 6..i].contains(&sequence[i]),
            "pick {} repeats within six: {}",
            i,
            sequence[i]
        );
    }

    let persisted = JsonHistoryStore::open(&history_path)
        .unwrap()
        .load(RECENT_ASSETS_KEY)
        .unwrap();
    assert_eq!(persisted.len(), 12);
    assert_eq!(persisted, sequence[sequence.len() - 12..].to_vec());
}
