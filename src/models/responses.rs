use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for the explicit cache reset endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheClearResponse {
    pub success: bool,
    #[serde(rename = "clearedAt")]
    pub cleared_at: chrono::DateTime<chrono::Utc>,
}
