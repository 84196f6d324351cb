use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::plan::{ExistingPlan, NewPlan, PlanId};

use super::{PlanningError, PlanningService};

struct PlanStore {
    next_id: PlanId,
    plans: HashMap<NaiveDate, Vec<ExistingPlan>>,
}

pub struct InMemoryPlanningService {
    store: RwLock<PlanStore>,
}

impl InMemoryPlanningService {
    pub fn new() -> Self {
        InMemoryPlanningService {
            store: RwLock::new(PlanStore {
                next_id: 1,
                plans: HashMap::new(),
            }),
        }
    }

    pub fn with_plans(date: NaiveDate, plans: Vec<ExistingPlan>) -> Self {
        let next_id = plans.iter().map(|plan| plan.id).max().unwrap_or(0) + 1;

        InMemoryPlanningService {
            store: RwLock::new(PlanStore {
                next_id,
                plans: HashMap::from([(date, plans)]),
            }),
        }
    }

    pub async fn plan_count(&self) -> usize {
        let store = self.store.read().await;
        store.plans.values().map(Vec::len).sum()
    }
}

impl Default for InMemoryPlanningService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanningService for InMemoryPlanningService {
    async fn get_daily_plans(&self, date: NaiveDate) -> Result<Vec<ExistingPlan>, PlanningError> {
        let store = self.store.read().await;
        Ok(store.plans.get(&date).cloned().unwrap_or_default())
    }

    async fn save_daily_plan(&self, plan: &NewPlan) -> Result<Option<PlanId>, PlanningError> {
        let mut store = self.store.write().await;
        let id = store.next_id;
        store.next_id += 1;

        store
            .plans
            .entry(plan.start_date)
            .or_default()
            .push(ExistingPlan {
                id,
                habit: plan.habit.clone(),
                block_time: plan.block_time.clone(),
            });

        log::info!("Stored plan {} for {}", id, plan.start_date);
        Ok(Some(id))
    }
}
