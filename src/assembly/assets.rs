// SYNOID Shorts Asset Selector
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// One visual per segment: local cache first, then stock search, then a
// generated placeholder. Never fails for lack of remote access.

use crate::cache::HistoryStore;
use crate::error::{Result, ShortsError};
use crate::media::MediaOps;
use crate::models::{AssetChoice, MediaType};
use crate::retry::RetryPolicy;
use crate::services::pexels::StockSearch;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const RECENT_ASSETS_KEY: &str = "recent_assets";
/// Entries kept in the persisted recency window.
pub const RECENT_CAPACITY: usize = 12;
/// Entries consulted when avoiding repeats.
pub const RECENT_LOOKBACK: usize = 6;
pub const PLACEHOLDER_SECS: f64 = 4.0;

const SLUG_MAX_CHARS: usize = 40;
const HASH_CHARS: usize = 10;

/// Lowercase, non-alphanumerics replaced by '_', capped at 40 chars.
pub fn slug(keyword: &str) -> String {
    keyword
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec!['_']
            }
        })
        .take(SLUG_MAX_CHARS)
        .collect()
}

/// First 10 hex chars of the SHA-256 of the source URL.
pub fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()[..HASH_CHARS]
        .to_string()
}

/// Cache file name for a download: `<slug>_<hash>.<ext>`. Photos are stored
/// as `.jpg` unless the URL itself names an mp4.
pub fn cache_file_name(keyword: &str, url: &str, found_as: MediaType) -> String {
    let ext = match found_as {
        MediaType::Video => "mp4",
        MediaType::Image if url.contains(".mp4") => "mp4",
        MediaType::Image => "jpg",
    };
    format!("{}_{}.{}", slug(keyword), url_hash(url), ext)
}

/// Extensions a cached asset may carry.
const MEDIA_EXTENSIONS: [&str; 5] = ["mp4", "mov", "jpg", "jpeg", "png"];

/// True when `file_name` is `<slug>_<10 hex>.<ext>` for exactly this slug and
/// a known media extension.
fn is_cache_entry(file_name: &str, slug: &str) -> bool {
    let Some(rest) = file_name
        .strip_prefix(slug)
        .and_then(|r| r.strip_prefix('_'))
    else {
        return false;
    };
    let Some((stem, ext)) = rest.split_once('.') else {
        return false;
    };
    stem.len() == HASH_CHARS
        && stem.chars().all(|c| c.is_ascii_hexdigit())
        && MEDIA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

pub fn placeholder_path(asset_dir: &Path, segment_index: usize) -> PathBuf {
    asset_dir.join(format!("placeholder_{}.mp4", segment_index))
}

pub struct AssetSelector {
    asset_dir: PathBuf,
    history: Arc<dyn HistoryStore>,
    search: Option<Arc<dyn StockSearch>>,
    media: Arc<dyn MediaOps>,
    retry: RetryPolicy,
}

impl AssetSelector {
    pub fn new(
        asset_dir: impl Into<PathBuf>,
        history: Arc<dyn HistoryStore>,
        media: Arc<dyn MediaOps>,
    ) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            history,
            search: None,
            media,
            retry: RetryPolicy::default(),
        }
    }

    /// Enable remote search. Without it only cache and placeholders are used.
    pub fn with_search(mut self, search: Arc<dyn StockSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Pick the visual for one segment, trying keywords in order.
    pub async fn pick_asset(&self, segment_index: usize, keywords: &[String]) -> Result<AssetChoice> {
        let first = keywords.first().ok_or_else(|| {
            ShortsError::contiguity(format!("segment {} has no keywords", segment_index))
        })?;
        fs::create_dir_all(&self.asset_dir)?;

        for keyword in keywords {
            if let Some(path) = self.from_cache(keyword)? {
                info!("[ASSETS] Segment {} cache hit '{}': {:?}", segment_index, keyword, path);
                return Ok(AssetChoice {
                    segment_index,
                    keyword: keyword.clone(),
                    media_type: MediaType::from_path(&path),
                    path,
                    source_url: None,
                });
            }

            if let Some(search) = &self.search {
                if let Some(choice) = self.from_remote(search.as_ref(), segment_index, keyword).await? {
                    return Ok(choice);
                }
            }
        }

        let path = self.placeholder(segment_index).await?;
        Ok(AssetChoice {
            segment_index,
            keyword: first.clone(),
            media_type: MediaType::Video,
            path,
            source_url: None,
        })
    }

    /// Cached files for `keyword`, sorted by name. The first one outside the
    /// recent lookback wins, otherwise the first overall.
    fn from_cache(&self, keyword: &str) -> Result<Option<PathBuf>> {
        let slug = slug(keyword);
        if slug.is_empty() {
            return Ok(None);
        }
        let mut candidates: Vec<PathBuf> = fs::read_dir(&self.asset_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| is_cache_entry(&entry.file_name().to_string_lossy(), &slug))
            .map(|entry| entry.path())
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        candidates.sort();

        let recent = self.history.window(RECENT_ASSETS_KEY, RECENT_CAPACITY)?;
        let chosen = candidates
            .iter()
            .find(|p| !recent.contains_recent(&p.to_string_lossy(), RECENT_LOOKBACK))
            .unwrap_or(&candidates[0])
            .clone();
        self.remember(&chosen)?;
        Ok(Some(chosen))
    }

    async fn from_remote(
        &self,
        search: &dyn StockSearch,
        segment_index: usize,
        keyword: &str,
    ) -> Result<Option<AssetChoice>> {
        let video = self
            .retry
            .run("pexels video search", || search.search_video(keyword))
            .await?;
        let found = match video {
            Some(url) => Some((url, MediaType::Video)),
            None => self
                .retry
                .run("pexels image search", || search.search_image(keyword))
                .await?
                .map(|url| (url, MediaType::Image)),
        };
        let Some((url, found_as)) = found else {
            return Ok(None);
        };

        let path = self.asset_dir.join(cache_file_name(keyword, &url, found_as));
        let media_type = MediaType::from_path(&path);
        if !path.exists() {
            let (url_ref, path_ref) = (&url, &path);
            self.retry
                .run("pexels download", move || search.download(url_ref, path_ref))
                .await?;
        }
        self.remember(&path)?;
        info!(
            "[ASSETS] Segment {} remote {} for '{}': {:?}",
            segment_index, media_type, keyword, path
        );
        Ok(Some(AssetChoice {
            segment_index,
            keyword: keyword.to_string(),
            media_type,
            path,
            source_url: Some(url),
        }))
    }

    /// Reuse `placeholder_<i>.mp4` when present; generate it otherwise.
    async fn placeholder(&self, segment_index: usize) -> Result<PathBuf> {
        let path = placeholder_path(&self.asset_dir, segment_index);
        if path.exists() {
            info!("[ASSETS] Segment {} reusing {:?}", segment_index, path);
            return Ok(path);
        }
        warn!("[ASSETS] Segment {}: no asset found, generating placeholder", segment_index);
        self.media
            .generate_placeholder(PLACEHOLDER_SECS, &path)
            .await?;
        Ok(path)
    }

    fn remember(&self, path: &Path) -> Result<()> {
        self.history
            .append(RECENT_ASSETS_KEY, &path.to_string_lossy(), RECENT_CAPACITY)?;
        Ok(())
    }
}
