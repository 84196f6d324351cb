use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

pub type PlanId = i64;

/// Block time exactly as the planning service stores it (`"9:30 AM"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTimeRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    pub end_time: Option<String>,
}

/// A plan already persisted by the planning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingPlan {
    pub id: PlanId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub habit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_time: BlockTimeRecord,
}

/// The service sends `null` for fields it never filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Health,
    Study,
    Finance,
    Personal,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Habit,
    RecurringTask,
    Task,
}

impl TaskType {
    pub fn is_one_off(&self) -> bool {
        matches!(self, TaskType::Task)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
    YesOrNo,
    Numeric,
    Timer,
    Checklist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    EveryDay,
    SpecificDaysOfWeek,
    SpecificDaysOfMonth,
    RepeatEveryNDays(u16),
}

impl Frequency {
    pub fn needs_selected_days(&self) -> bool {
        matches!(
            self,
            Frequency::SpecificDaysOfWeek | Frequency::SpecificDaysOfMonth
        )
    }
}

/// A day picked for a specific-days frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedDay {
    Weekday(Weekday),
    DayOfMonth(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub minutes_before: u16,
}

/// Everything the wizard collects about a plan apart from when it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDraft {
    pub category: Category,
    pub task_type: TaskType,
    pub evaluation_type: EvaluationType,
    pub habit: String,
    pub description: String,
    pub frequency: Option<Frequency>,
    pub selected_days: Vec<SelectedDay>,
    pub is_flexible: bool,
    pub end_date: Option<NaiveDate>,
    pub priority: Priority,
    pub pomodoro: u8,
    pub reminder: ReminderSettings,
}

/// The create request sent to the planning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlan {
    pub category: Category,
    pub task_type: TaskType,
    pub evaluation_type: EvaluationType,
    pub habit: String,
    pub description: String,
    pub frequency: Option<Frequency>,
    pub selected_days: Vec<SelectedDay>,
    pub is_flexible: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub priority: Priority,
    pub block_time: BlockTimeRecord,
    pub pomodoro: u8,
    pub reminder: ReminderSettings,
    pub status: PlanStatus,
    pub is_completed: bool,
}

impl NewPlan {
    pub fn from_draft(
        draft: PlanDraft,
        start_date: NaiveDate,
        block_time: BlockTimeRecord,
        duration: Option<String>,
    ) -> Self {
        let PlanDraft {
            category,
            task_type,
            evaluation_type,
            habit,
            description,
            frequency,
            selected_days,
            is_flexible,
            end_date,
            priority,
            pomodoro,
            reminder,
        } = draft;

        Self {
            category,
            task_type,
            evaluation_type,
            habit,
            description,
            frequency: if task_type.is_one_off() {
                None
            } else {
                frequency
            },
            selected_days,
            is_flexible,
            start_date,
            end_date,
            duration,
            priority,
            block_time,
            pomodoro,
            reminder,
            status: PlanStatus::Pending,
            is_completed: false,
        }
    }
}

pub(crate) fn iso_date_string(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn draft() -> PlanDraft {
        PlanDraft {
            category: Category::Health,
            task_type: TaskType::Habit,
            evaluation_type: EvaluationType::YesOrNo,
            habit: "Morning run".to_string(),
            description: String::new(),
            frequency: Some(Frequency::SpecificDaysOfWeek),
            selected_days: vec![SelectedDay::Weekday(Weekday::Mon)],
            is_flexible: false,
            end_date: None,
            priority: Priority::High,
            pomodoro: 0,
            reminder: ReminderSettings::default(),
        }
    }

    #[test]
    pub fn existing_plan_tolerates_missing_fields() {
        let json = r#"[
            {"id": 1, "habit": "Read", "block_time": {"start_time": "9:30 AM", "end_time": null}},
            {"id": 2, "habit": "Walk", "block_time": {"start_time": "1:00 PM", "end_time": "2:00 PM"}, "extra": true},
            {"id": 3}
        ]"#;

        let plans: Vec<ExistingPlan> = serde_json::from_str(json).unwrap();

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].block_time.end_time, None);
        assert_eq!(plans[1].block_time.end_time.as_deref(), Some("2:00 PM"));
        assert_eq!(plans[2].block_time, BlockTimeRecord::default());
    }

    #[test]
    pub fn null_fields_read_as_no_block() {
        let json = r#"[
            {"id": 1, "habit": null, "block_time": {"start_time": null, "end_time": null}},
            {"id": 2, "habit": "Walk", "block_time": null}
        ]"#;

        let plans: Vec<ExistingPlan> = serde_json::from_str(json).unwrap();

        assert_eq!(plans[0].habit, "");
        assert_eq!(plans[0].block_time, BlockTimeRecord::default());
        assert_eq!(plans[1].block_time, BlockTimeRecord::default());
    }

    #[test]
    pub fn new_plan_serializes_flat_record() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let plan = NewPlan::from_draft(
            draft(),
            date,
            BlockTimeRecord {
                start_time: "9:00 AM".to_string(),
                end_time: None,
            },
            None,
        );

        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(value["start_date"], "2025-03-07");
        assert_eq!(value["end_date"], serde_json::Value::Null);
        assert_eq!(value["task_type"], "habit");
        assert_eq!(value["evaluation_type"], "yes_or_no");
        assert_eq!(value["frequency"], "specific_days_of_week");
        assert_eq!(value["selected_days"][0], "Mon");
        assert_eq!(value["block_time"]["start_time"], "9:00 AM");
        assert_eq!(value["block_time"]["end_time"], serde_json::Value::Null);
        assert_eq!(value["status"], "pending");
        assert_eq!(value["is_completed"], false);
    }

    #[test]
    pub fn one_off_task_drops_frequency() {
        let mut draft = draft();
        draft.task_type = TaskType::Task;
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();

        let plan = NewPlan::from_draft(draft, date, BlockTimeRecord::default(), None);

        assert_eq!(plan.frequency, None);
    }
}
