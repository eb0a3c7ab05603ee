// SYNOID Shorts Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod assembly;
pub mod cache;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod rng;
pub mod services;

pub use config::AppConfig;
pub use error::{Result, ShortsError};
pub use pipeline::{GenerationRequest, ShortsPipeline};
