use serde::{Deserialize, Serialize};

use crate::error::{DataError, FrameError};
use crate::frames::{FrameService, Reply};

const DEFAULT_USER: &str = "anon";

#[derive(Debug, Clone, Deserialize)]
pub struct FramesRequest {
    pub query: String,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FramesResponse {
    pub status: &'static str,
    pub replies: Vec<Reply>,
}

#[derive(Debug, thiserror::Error)]
pub enum FramesPayloadError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Frame(#[from] FrameError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("reload failed: {0}")]
    Data(#[from] DataError),
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

pub fn health_payload(service: &FrameService) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "menat-api",
        "version": env!("CARGO_PKG_VERSION"),
        "source": service.source_description(),
        "characters": service.index().len(),
        "indexed_at": service.indexed_at().to_rfc3339(),
    }))
}

pub fn characters_payload(service: &FrameService) -> Result<String, serde_json::Error> {
    let names: Vec<&str> = service.index().character_names().collect();
    serde_json::to_string_pretty(&serde_json::json!({ "characters": names }))
}

/// Handles POST /api/frames: `{"query": "...", "user": "..."}` -> `{"status": "ok", "replies": [...]}`.
pub fn frames_payload(service: &FrameService, body: &str) -> Result<String, FramesPayloadError> {
    let request: FramesRequest = serde_json::from_str(body)?;
    let user = request
        .user
        .as_deref()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or(DEFAULT_USER);
    let replies = service.handle(&request.query, user)?;
    Ok(serde_json::to_string_pretty(&FramesResponse {
        status: "ok",
        replies,
    })?)
}

pub fn reload_payload(service: &mut FrameService) -> Result<String, ReloadError> {
    service.reload()?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "characters": service.index().len(),
        "aliases": service.index().alias_count(),
        "indexed_at": service.indexed_at().to_rfc3339(),
    }))?)
}
