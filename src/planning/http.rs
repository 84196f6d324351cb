use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::{
    appsettings::PlanningSettings,
    plan::{ExistingPlan, NewPlan, PlanId, iso_date_string},
};

use super::{PlanningError, PlanningService};

const DAILY_PLANS_PATH: &str = "daily-plans";
pub(crate) const CREATED_MESSAGE: &str = "Daily plan created successfully";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DailyPlansResponse {
    Plans(Vec<serde_json::Value>),
    Wrapped { data: Vec<serde_json::Value> },
}

impl DailyPlansResponse {
    /// Decodes each record on its own; a malformed record is dropped, not the list.
    fn into_plans(self) -> Vec<ExistingPlan> {
        let records = match self {
            DailyPlansResponse::Plans(records) => records,
            DailyPlansResponse::Wrapped { data } => data,
        };

        records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<ExistingPlan>(record) {
                Ok(plan) => Some(plan),
                Err(error) => {
                    log::warn!("Skipping unreadable plan record. [error = {}]", error);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CreatePlanResponse {
    message: Option<String>,
    id: Option<PlanId>,
    data: Option<CreatedPlan>,
}

#[derive(Debug, Deserialize)]
struct CreatedPlan {
    id: Option<PlanId>,
}

#[derive(Debug, Clone)]
pub struct HttpPlanningService {
    client: Client,
    endpoint: Url,
}

impl HttpPlanningService {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, PlanningError> {
        let endpoint = daily_plans_endpoint(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| PlanningError::Transport(format!("could not build client: {error}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn from_settings(settings: &PlanningSettings) -> Result<Self, PlanningError> {
        Self::new(
            &settings.base_url,
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn daily_plans_endpoint(base_url: &str) -> Result<Url, PlanningError> {
    let mut url = Url::parse(base_url.trim()).map_err(|error| {
        PlanningError::InvalidBaseUrl(format!("{base_url:?}: {error}"))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            PlanningError::InvalidBaseUrl(format!("{base_url:?} cannot be a base"))
        })?
        .pop_if_empty()
        .push(DAILY_PLANS_PATH);

    Ok(url)
}

fn parse_create_response(status: StatusCode, body: &str) -> (bool, CreatePlanResponse) {
    let parsed: CreatePlanResponse = serde_json::from_str(body).unwrap_or_default();
    let created = status == StatusCode::CREATED
        || parsed.message.as_deref().map(str::trim) == Some(CREATED_MESSAGE);

    (created, parsed)
}

#[async_trait]
impl PlanningService for HttpPlanningService {
    async fn get_daily_plans(&self, date: NaiveDate) -> Result<Vec<ExistingPlan>, PlanningError> {
        let date = iso_date_string(&date);
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("date", date.as_str())])
            .send()
            .await
            .map_err(|error| PlanningError::Transport(format!("listing plans for {date}: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| PlanningError::Transport(format!("reading plans for {date}: {error}")))?;

        if !status.is_success() {
            return Err(PlanningError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DailyPlansResponse = serde_json::from_str(&body)?;
        let plans = parsed.into_plans();
        log::debug!("Fetched {} plans for {}", plans.len(), date);

        Ok(plans)
    }

    async fn save_daily_plan(&self, plan: &NewPlan) -> Result<Option<PlanId>, PlanningError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(plan)
            .send()
            .await
            .map_err(|error| PlanningError::Transport(format!("creating plan: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| PlanningError::Transport(format!("reading create response: {error}")))?;

        let (created, parsed) = parse_create_response(status, &body);
        if !created {
            if status.is_success() {
                return Err(PlanningError::UnexpectedResponse(body));
            }
            return Err(PlanningError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parsed.id.or(parsed.data.and_then(|data| data.id)))
    }
}
