//! JSON response types for the PlotBot API

use plotbot_core::Answer;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static payload served at `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "PlotBot API is running!")]
    pub status: String,
    /// Data endpoints exposed by the service
    pub endpoints: Vec<String>,
}

impl StatusResponse {
    pub fn running() -> Self {
        Self {
            status: "PlotBot API is running!".to_string(),
            endpoints: vec![
                "/menu".to_string(),
                "/questions/{subject}".to_string(),
                "/answer?question={...}".to_string(),
            ],
        }
    }
}

/// Answer lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    /// The question as received
    #[schema(example = "2+2?")]
    pub question: String,

    /// Stored answer, or the fallback sentence when nothing matched
    #[schema(example = "4")]
    pub answer: String,
}

impl From<Answer> for AnswerResponse {
    fn from(answer: Answer) -> Self {
        Self { question: answer.question, answer: answer.answer }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Data loaded
    Healthy,
    /// Running without data; data endpoints answer 500
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub uptime_seconds: u64,
    /// Number of distinct subjects
    pub subjects: usize,
    /// Number of loaded rows
    pub rows: usize,
    /// Why loading failed, when degraded
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}
