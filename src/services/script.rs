// SYNOID Shorts Script Source
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Narration script from Gemini when a key is configured, otherwise a
// templated script so the rest of the pipeline can still run offline.

use crate::error::{Result, ShortsError};
use crate::models::{Script, ScriptStyle, Segment};
use crate::retry::RetryPolicy;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

pub fn build_prompt(topic: &str, style: ScriptStyle, length: u32) -> String {
    format!(
        r##"Você é roteirista especialista em vídeos virais verticais para o canal Aprende Aqui (PT-BR).
Retorne APENAS JSON válido (sem markdown), no formato:
{{"title":"...","hook":"...","style":"{style}","segments":[{{"text":"...","keywords":["..."],"emphasis_words":["..."]}}],"hashtags":["#..."],"description":"...","cta_final":"...","safety_flags":{{"medical_claim":false,"financial_claim":false,"harmful":false}}}}
Regras: PT-BR natural, frases curtas, 6-10 segmentos, duração alvo {length}s, evitar repetição.
Tema: {topic}"##,
        style = style,
        length = length,
        topic = topic
    )
}

/// Models like to wrap JSON in ```json fences even when told not to.
pub fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse model output into a script with at least one usable segment. The
/// model's own `style` label is free text, so the requested style replaces it.
pub fn parse_script(text: &str, style: ScriptStyle) -> Result<Script> {
    let cleaned = strip_fences(text);
    let mut value: serde_json::Value = serde_json::from_str(&cleaned)
        .map_err(|e| ShortsError::malformed(format!("script JSON: {}", e)))?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| ShortsError::malformed("script JSON is not an object"))?;
    obj.insert("style".into(), json!(style.as_str()));
    let script: Script = serde_json::from_value(value)
        .map_err(|e| ShortsError::malformed(format!("script JSON: {}", e)))?;
    if script.segments.is_empty() {
        return Err(ShortsError::malformed("script has no segments"));
    }
    if let Some(i) = script.segments.iter().position(|s| s.keywords.is_empty()) {
        return Err(ShortsError::malformed(format!("segment {} has no keywords", i)));
    }
    Ok(script)
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

pub fn segment_count(style: ScriptStyle) -> usize {
    match style {
        ScriptStyle::Curiosity => 7,
        ScriptStyle::Tips => 8,
        ScriptStyle::Facts => 7,
        ScriptStyle::TopList => 9,
    }
}

fn template_line(style: ScriptStyle, n: usize, topic: &str) -> String {
    match style {
        ScriptStyle::Curiosity => {
            format!("Curiosidade {}: {} tem um detalhe que quase ninguém percebe.", n, topic)
        }
        ScriptStyle::Tips => format!("Dica {}: ação prática sobre {} para aplicar hoje.", n, topic),
        ScriptStyle::Facts => format!("Fato {}: em {}, esse dado surpreende muita gente.", n, topic),
        ScriptStyle::TopList => {
            format!("Posição {}: ponto essencial sobre {} que merece destaque.", n, topic)
        }
    }
}

/// Deterministic script used when no model is available.
pub fn fallback_script(topic: &str, style: ScriptStyle, length: u32) -> Script {
    let count = segment_count(style);
    let emphasis = match style {
        ScriptStyle::Tips => "prática",
        _ => "surpreende",
    };
    let segments = (1..=count)
        .map(|n| {
            Segment::new(
                template_line(style, n, topic),
                vec![topic.to_string(), style.to_string(), format!("item {}", n)],
                vec![emphasis.to_string()],
            )
        })
        .collect();

    let mut safety_flags = serde_json::Map::new();
    safety_flags.insert("fallback_mode".into(), json!(true));

    Script {
        title: format!("{} em {} pontos", title_case(topic), count),
        hook: format!(
            "Você vai ver {} de outro jeito em menos de {} segundos.",
            topic, length
        ),
        style,
        segments,
        hashtags: vec!["#aprendeaqui".into(), "#curiosidades".into(), "#shorts".into()],
        description: format!("Vídeo sobre {} com estilo {}.", topic, style),
        cta_final: None,
        safety_flags,
    }
}

pub struct ScriptSource {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    retry: RetryPolicy,
}

impl ScriptSource {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: GEMINI_ENDPOINT.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub async fn generate(&self, topic: &str, style: ScriptStyle, length: u32) -> Result<Script> {
        let Some(key) = self.api_key.as_deref() else {
            warn!("[SCRIPT] No GEMINI_API_KEY; using templated {} script", style);
            return Ok(fallback_script(topic, style, length));
        };
        let prompt = build_prompt(topic, style, length);
        let script = self
            .retry
            .run("gemini script", || self.request(key, &prompt, style))
            .await?;
        info!(
            "[SCRIPT] '{}' with {} segments",
            script.title,
            script.segments.len()
        );
        Ok(script)
    }

    async fn request(&self, key: &str, prompt: &str, style: ScriptStyle) -> Result<Script> {
        let payload = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ShortsError::Network(format!("gemini returned {}", resp.status())));
        }
        let body: serde_json::Value = resp.json().await?;
        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| ShortsError::malformed("gemini response has no candidate text"))?;
        parse_script(text, style)
    }
}
