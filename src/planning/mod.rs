mod http;
mod in_memory;

pub use http::HttpPlanningService;
pub use in_memory::InMemoryPlanningService;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::plan::{ExistingPlan, NewPlan, PlanId};

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("Planning service unreachable: {0}")]
    Transport(String),

    #[error("Planning service answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected planning service response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid planning service url {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Payload(#[from] serde_json::Error),
}

/// Remote store of daily plans.
#[async_trait]
pub trait PlanningService: Send + Sync {
    async fn get_daily_plans(&self, date: NaiveDate) -> Result<Vec<ExistingPlan>, PlanningError>;
    async fn save_daily_plan(&self, plan: &NewPlan) -> Result<Option<PlanId>, PlanningError>;
}
