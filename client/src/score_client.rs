use std::time::Duration;

use chrono::{DateTime, Utc};
use common::log;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// A score row as the remote store returns it. Records are only ever
/// created, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub player_name: String,
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ScoreSubmission<'a> {
    player_name: &'a str,
    score: u32,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Deserialize)]
struct FieldError {
    loc: Vec<serde_json::Value>,
    msg: String,
}

pub struct ScoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScoreClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submits a new score. An empty name fails locally before any network
    /// call; remote validation failures come back as one composed message.
    pub async fn submit(&self, name: &str, score: u32) -> Result<ScoreRecord, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Player name cannot be empty.".to_string());
        }

        let url = format!("{}/scores", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&ScoreSubmission {
                player_name: name,
                score,
            })
            .send()
            .await
            .map_err(|e| {
                log!("Score submission failed: {}", e);
                "Failed to submit score. Please try again.".to_string()
            })?;

        if response.status().is_success() {
            response
                .json::<ScoreRecord>()
                .await
                .map_err(|e| format!("Failed to decode score response: {}", e))
        } else {
            Err(compose_error(response).await)
        }
    }

    /// Fetches up to `limit` records; the store returns them in descending
    /// score order. An empty list is a valid result.
    pub async fn fetch_top(&self, limit: u32) -> Result<Vec<ScoreRecord>, String> {
        let url = format!("{}/scores", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| {
                log!("Fetching scores failed: {}", e);
                "Failed to fetch scores.".to_string()
            })?;

        if !response.status().is_success() {
            return Err(compose_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| format!("Failed to decode score list: {}", e))
    }

    pub async fn health(&self) -> Result<(), String> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|_| "API health check failed.".to_string())?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("API reported status {}", response.status()))
        }
    }
}

/// Maps a non-success response to one human-readable message. A string
/// `detail` passes through; a field-error list becomes `loc - msg` pairs.
async fn compose_error(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => match body.detail {
            ErrorDetail::Message(message) => message,
            ErrorDetail::Fields(fields) => fields
                .iter()
                .map(|field| format!("{} - {}", join_loc(&field.loc), field.msg))
                .collect::<Vec<_>>()
                .join("; "),
        },
        Err(_) => format!("Request failed with status {}", status),
    }
}

fn join_loc(loc: &[serde_json::Value]) -> String {
    loc.iter()
        .map(|part| match part {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}
