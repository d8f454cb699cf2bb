use chrono::{DateTime, Utc};
use serde::Serialize;

/// Corps de GET /api/health : "ok" ou "degraded" (base injoignable)
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: DateTime<Utc>,
}
