use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    block::{TimeBlock, format_duration},
    plan::{ExistingPlan, NewPlan, PlanDraft, PlanId},
    planning::{PlanningError, PlanningService},
    submission::SubmissionGate,
    time_of_day::{ClockTime, TimeOfDay},
};

const RETRY_MESSAGE: &str = "Something went wrong while saving your plan. Please try again.";

#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub date: NaiveDate,
    pub start: Option<ClockTime>,
    pub end: Option<ClockTime>,
    pub plan: PlanDraft,
}

#[derive(Debug, Clone)]
pub struct SubmittedPlan {
    pub id: Option<PlanId>,
    pub plan: NewPlan,
}

/// A persisted plan whose block collides with the proposed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub plan_id: PlanId,
    pub habit: String,
    pub block: TimeBlock,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Block time is required")]
    MissingBlockTime,

    #[error("A submission is already in flight")]
    AlreadyInFlight,

    #[error("Block overlaps plan {} ({})", .0.plan_id, .0.habit)]
    Conflict(Conflict),

    #[error(transparent)]
    Service(#[from] PlanningError),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::MissingBlockTime => "Please select a block time.".to_string(),
            SubmitError::AlreadyInFlight => "Your plan is already being saved.".to_string(),
            SubmitError::Conflict(conflict) => {
                let when = match conflict.block.end() {
                    Some(end) => format!("{} - {}", conflict.block.start(), end),
                    None => conflict.block.start().to_string(),
                };
                format!(
                    "This time overlaps with \"{}\" ({}). Please choose another time.",
                    conflict.habit, when
                )
            }
            SubmitError::Service(_) => RETRY_MESSAGE.to_string(),
        }
    }
}

/// Returns the first plan whose block collides with `proposed`.
///
/// Plans without a start are not scheduled and never conflict; plans whose
/// times cannot be parsed are skipped.
pub fn find_conflict(proposed: &TimeBlock, plans: &[ExistingPlan]) -> Option<Conflict> {
    plans.iter().find_map(|plan| {
        let existing = match TimeBlock::from_record(&plan.block_time) {
            Ok(Some(block)) => block,
            Ok(None) => return None,
            Err(error) => {
                log::warn!(
                    "Skipping plan with unreadable block time. [plan_id = {}, error = {}]",
                    plan.id,
                    error
                );
                return None;
            }
        };

        proposed.conflicts_with(&existing).then(|| Conflict {
            plan_id: plan.id,
            habit: plan.habit.clone(),
            block: existing,
        })
    })
}

/// Validates a new plan's block time against the plans already scheduled on
/// its date and persists it when free.
///
/// The read and the write are not atomic: another session can take the slot
/// between them.
pub struct BlockScheduler {
    service: Arc<dyn PlanningService>,
}

impl BlockScheduler {
    pub fn new(service: Arc<dyn PlanningService>) -> Self {
        Self { service }
    }

    pub async fn check_conflict(
        &self,
        date: NaiveDate,
        proposed: &TimeBlock,
    ) -> Result<Option<Conflict>, PlanningError> {
        let plans = self.service.get_daily_plans(date).await?;
        log::debug!("Checking {} against {} plans on {}", describe(proposed), plans.len(), date);

        Ok(find_conflict(proposed, &plans))
    }

    pub async fn submit(&self, request: ScheduleRequest) -> Result<SubmittedPlan, SubmitError> {
        let ScheduleRequest {
            date,
            start,
            end,
            plan,
        } = request;

        let start = start.ok_or(SubmitError::MissingBlockTime)?;
        let proposed = TimeBlock::new(start.into(), end.map(TimeOfDay::from));

        let result = self.check_conflict(date, &proposed).await;
        if let Some(conflict) = result.inspect_err(log_service_error)? {
            log::warn!(
                "Rejecting {} on {}: overlaps plan {}",
                describe(&proposed),
                date,
                conflict.plan_id
            );
            return Err(SubmitError::Conflict(conflict));
        }

        let duration = proposed.display_duration().map(format_duration);
        let new_plan = NewPlan::from_draft(plan, date, proposed.to_record(), duration);

        let id = self
            .service
            .save_daily_plan(&new_plan)
            .await
            .inspect_err(log_service_error)?;

        log::info!(
            "Saved plan \"{}\" at {} on {}. [plan_id = {:?}]",
            new_plan.habit,
            describe(&proposed),
            date,
            id
        );

        Ok(SubmittedPlan { id, plan: new_plan })
    }

    /// Same as `submit`, refused while `gate` is held by another submission.
    pub async fn submit_gated(
        &self,
        gate: &SubmissionGate,
        request: ScheduleRequest,
    ) -> Result<SubmittedPlan, SubmitError> {
        let _guard = gate.try_begin().ok_or(SubmitError::AlreadyInFlight)?;
        self.submit(request).await
    }
}

fn log_service_error(error: &PlanningError) {
    log::error!("Planning service request failed: {}", error);
}

fn describe(block: &TimeBlock) -> String {
    match block.end() {
        Some(end) => format!("{}-{}", block.start().to_24h_string(), end.to_24h_string()),
        None => block.start().to_24h_string(),
    }
}
