// SYNOID Shorts External Services
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Thin wrappers over the hosted APIs. Each one has an offline fallback so a
// run without credentials still produces a video.

pub mod cta;
pub mod narration;
pub mod pexels;
pub mod script;

pub use cta::CtaPicker;
pub use narration::{NarrationOutput, Narrator};
pub use pexels::{PexelsClient, StockSearch};
pub use script::ScriptSource;
