// SYNOID Shorts Stock Search (Pexels)
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Portrait video/photo search and download. Only reached when an API key is
// configured; the asset selector falls back to placeholders otherwise.

use crate::error::{Result, ShortsError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const VIDEO_SEARCH_URL: &str = "https://api.pexels.com/videos/search";
const PHOTO_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(25);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimum variant height preferred for a 1080x1920 frame.
pub const MIN_VARIANT_HEIGHT: u32 = 1080;
/// Videos at least this long get a ranking bonus (they loop less).
pub const LONG_CLIP_SECS: f64 = 4.0;

#[async_trait]
pub trait StockSearch: Send + Sync {
    /// Best portrait video URL for `keyword`, if any.
    async fn search_video(&self, keyword: &str) -> Result<Option<String>>;

    /// First portrait photo URL for `keyword`, if any.
    async fn search_image(&self, keyword: &str) -> Result<Option<String>>;

    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoFile {
    #[serde(default)]
    pub height: Option<u32>,
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoSearch {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoSrc {
    pub large2x: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub src: PhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PhotoSearch {
    #[serde(default)]
    photos: Vec<Photo>,
}

/// Per video: the first variant at least 1080 tall (else the first variant),
/// scored by height plus a bonus for clips of 4s or more. Highest score wins;
/// ties keep search order.
pub fn rank_videos(videos: &[Video]) -> Option<String> {
    let mut best: Option<(u32, &str)> = None;
    for video in videos {
        let variant = video
            .video_files
            .iter()
            .find(|f| f.height.unwrap_or(0) >= MIN_VARIANT_HEIGHT)
            .or_else(|| video.video_files.first());
        let Some(variant) = variant else { continue };
        let height = variant.height.unwrap_or(0);
        let score = if video.duration >= LONG_CLIP_SECS {
            height + 1000
        } else {
            height
        };
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, variant.link.as_str()));
        }
    }
    best.map(|(_, link)| link.to_string())
}

/// First photo, preferring the `large2x` rendition.
pub fn pick_photo(photos: &[Photo]) -> Option<String> {
    let src = &photos.first()?.src;
    src.large2x.clone().or_else(|| src.original.clone())
}

/// Hidden sibling a download is written to before the rename. Its name never
/// starts with the keyword slug, so cache scans cannot pick it up.
pub fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.part", name))
}

pub struct PexelsClient {
    client: reqwest::Client,
    api_key: String,
    video_url: String,
    photo_url: String,
}

impl PexelsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            video_url: VIDEO_SEARCH_URL.to_string(),
            photo_url: PHOTO_SEARCH_URL.to_string(),
        }
    }

    /// Point both searches at another host (local mirrors, tests).
    pub fn with_endpoints(mut self, video_url: &str, photo_url: &str) -> Self {
        self.video_url = video_url.to_string();
        self.photo_url = photo_url.to_string();
        self
    }

    async fn search<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        keyword: &str,
        per_page: u32,
    ) -> Result<T> {
        let per_page = per_page.to_string();
        let resp = self
            .client
            .get(url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", keyword),
                ("per_page", per_page.as_str()),
                ("orientation", "portrait"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ShortsError::Network(format!(
                "search '{}' returned {}",
                keyword,
                resp.status()
            )));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ShortsError::malformed(format!("pexels search body: {}", e)))
    }
}

#[async_trait]
impl StockSearch for PexelsClient {
    async fn search_video(&self, keyword: &str) -> Result<Option<String>> {
        let found: VideoSearch = self.search(&self.video_url, keyword, 8).await?;
        debug!("[PEXELS] '{}': {} videos", keyword, found.videos.len());
        Ok(rank_videos(&found.videos))
    }

    async fn search_image(&self, keyword: &str) -> Result<Option<String>> {
        let found: PhotoSearch = self.search(&self.photo_url, keyword, 5).await?;
        debug!("[PEXELS] '{}': {} photos", keyword, found.photos.len());
        Ok(pick_photo(&found.photos))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ShortsError::Network(format!(
                "download {} returned {}",
                url,
                resp.status()
            )));
        }
        let bytes = resp.bytes().await?;

        let partial = partial_path(dest);
        if let Err(e) = tokio::fs::write(&partial, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        tokio::fs::rename(&partial, dest).await?;
        info!("[PEXELS] Downloaded {} bytes -> {:?}", bytes.len(), dest);
        Ok(())
    }
}
