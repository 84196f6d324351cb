use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    plan::{
        Category, EvaluationType, Frequency, PlanDraft, Priority, ReminderSettings, SelectedDay,
        TaskType,
    },
    scheduler::ScheduleRequest,
    submission::SubmissionGate,
    time_of_day::ClockTime,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Category,
    EvaluationType,
    Definition,
    Frequency,
    Schedule,
}

impl WizardStep {
    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Category => Some(WizardStep::EvaluationType),
            WizardStep::EvaluationType => Some(WizardStep::Definition),
            WizardStep::Definition => Some(WizardStep::Frequency),
            WizardStep::Frequency => Some(WizardStep::Schedule),
            WizardStep::Schedule => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Category => None,
            WizardStep::EvaluationType => Some(WizardStep::Category),
            WizardStep::Definition => Some(WizardStep::EvaluationType),
            WizardStep::Frequency => Some(WizardStep::Definition),
            WizardStep::Schedule => Some(WizardStep::Frequency),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Please choose a category")]
    MissingCategory,

    #[error("Please choose how the plan is evaluated")]
    MissingEvaluationType,

    #[error("Please describe the plan")]
    MissingHabit,

    #[error("Please choose a frequency")]
    MissingFrequency,

    #[error("Please select at least one day")]
    NoDaysSelected,

    #[error("Day {0} is not a day of the month")]
    InvalidDayOfMonth(u8),

    #[error("Please choose a start date")]
    MissingStartDate,

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("The wizard is not finished yet ({0:?})")]
    Incomplete(WizardStep),

    #[error("The plan is already being submitted")]
    SubmissionInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    SelectCategory(Category),
    SelectTaskType(TaskType),
    SelectEvaluationType(EvaluationType),
    SetHabit(String),
    SetDescription(String),
    SelectFrequency(Frequency),
    ToggleDay(SelectedDay),
    SetFlexible(bool),
    SetDates {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    SetPriority(Priority),
    SetStartTime(ClockTime),
    SetEndTime(ClockTime),
    ClearEndTime,
    SetPomodoro(u8),
    SetReminder(ReminderSettings),
    Next,
    Back,
    SubmitStarted,
    SubmitFinished,
}

/// View state of the plan creation wizard. Only `apply` changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWizard {
    step: WizardStep,
    category: Option<Category>,
    task_type: TaskType,
    evaluation_type: Option<EvaluationType>,
    habit: String,
    description: String,
    frequency: Option<Frequency>,
    selected_days: Vec<SelectedDay>,
    is_flexible: bool,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    priority: Priority,
    start_time: Option<ClockTime>,
    end_time: Option<ClockTime>,
    pomodoro: u8,
    reminder: ReminderSettings,
    #[serde(default)]
    submitting: bool,
}

impl Default for PlanWizard {
    fn default() -> Self {
        Self {
            step: WizardStep::default(),
            category: None,
            task_type: TaskType::Habit,
            evaluation_type: None,
            habit: String::new(),
            description: String::new(),
            frequency: None,
            selected_days: Vec::new(),
            is_flexible: false,
            start_date: None,
            end_date: None,
            priority: Priority::default(),
            start_time: None,
            end_time: None,
            pomodoro: 0,
            reminder: ReminderSettings::default(),
            submitting: false,
        }
    }
}

impl PlanWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn start_time(&self) -> Option<ClockTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<ClockTime> {
        self.end_time
    }

    pub fn selected_days(&self) -> &[SelectedDay] {
        &self.selected_days
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The submit control is disabled while this wizard or anything else
    /// holding the gate has a submission outstanding.
    pub fn submit_disabled(&self, gate: &SubmissionGate) -> bool {
        self.submitting || gate.is_in_flight()
    }

    pub fn apply(&mut self, action: WizardAction) -> Result<(), WizardError> {
        match action {
            WizardAction::SelectCategory(category) => self.category = Some(category),
            WizardAction::SelectTaskType(task_type) => {
                self.task_type = task_type;
                if task_type.is_one_off() {
                    self.frequency = None;
                    self.selected_days.clear();
                }
            }
            WizardAction::SelectEvaluationType(evaluation_type) => {
                self.evaluation_type = Some(evaluation_type)
            }
            WizardAction::SetHabit(habit) => self.habit = habit,
            WizardAction::SetDescription(description) => self.description = description,
            WizardAction::SelectFrequency(frequency) => {
                if self.frequency != Some(frequency) {
                    self.selected_days.clear();
                }
                self.frequency = Some(frequency);
            }
            WizardAction::ToggleDay(day) => {
                if let SelectedDay::DayOfMonth(day @ (0 | 32..)) = day {
                    return Err(WizardError::InvalidDayOfMonth(day));
                }
                if let Some(position) = self.selected_days.iter().position(|d| *d == day) {
                    self.selected_days.remove(position);
                } else {
                    self.selected_days.push(day);
                }
            }
            WizardAction::SetFlexible(is_flexible) => self.is_flexible = is_flexible,
            WizardAction::SetDates { start, end } => {
                if let Some(end) = end.filter(|end| *end < start) {
                    return Err(WizardError::EndBeforeStart { start, end });
                }
                self.start_date = Some(start);
                self.end_date = end;
            }
            WizardAction::SetPriority(priority) => self.priority = priority,
            WizardAction::SetStartTime(time) => self.start_time = Some(time),
            WizardAction::SetEndTime(time) => self.end_time = Some(time),
            WizardAction::ClearEndTime => self.end_time = None,
            WizardAction::SetPomodoro(count) => self.pomodoro = count,
            WizardAction::SetReminder(reminder) => self.reminder = reminder,
            WizardAction::Next => {
                self.validate(self.step)?;
                if let Some(next) = self.step.next() {
                    self.step = next;
                }
            }
            WizardAction::Back => {
                if let Some(previous) = self.step.previous() {
                    self.step = previous;
                }
            }
            WizardAction::SubmitStarted => {
                if self.submitting {
                    return Err(WizardError::SubmissionInFlight);
                }
                self.submitting = true;
            }
            WizardAction::SubmitFinished => self.submitting = false,
        }

        Ok(())
    }

    fn validate(&self, step: WizardStep) -> Result<(), WizardError> {
        match step {
            WizardStep::Category if self.category.is_none() => Err(WizardError::MissingCategory),
            WizardStep::EvaluationType if self.evaluation_type.is_none() => {
                Err(WizardError::MissingEvaluationType)
            }
            WizardStep::Definition if self.habit.trim().is_empty() => {
                Err(WizardError::MissingHabit)
            }
            WizardStep::Frequency => self.validate_frequency(),
            WizardStep::Schedule if self.start_date.is_none() => {
                Err(WizardError::MissingStartDate)
            }
            _ => Ok(()),
        }
    }

    fn validate_frequency(&self) -> Result<(), WizardError> {
        if self.task_type.is_one_off() {
            return Ok(());
        }

        match self.frequency {
            None => Err(WizardError::MissingFrequency),
            Some(frequency) if frequency.needs_selected_days() && self.selected_days.is_empty() => {
                Err(WizardError::NoDaysSelected)
            }
            Some(_) => Ok(()),
        }
    }

    /// Builds the submission for a wizard on its last step. A missing start
    /// time is left for the scheduler to reject.
    pub fn to_request(&self) -> Result<ScheduleRequest, WizardError> {
        if self.step != WizardStep::Schedule {
            return Err(WizardError::Incomplete(self.step));
        }
        for step in [
            WizardStep::Category,
            WizardStep::EvaluationType,
            WizardStep::Definition,
            WizardStep::Frequency,
            WizardStep::Schedule,
        ] {
            self.validate(step)?;
        }

        let (Some(category), Some(evaluation_type), Some(date)) =
            (self.category.clone(), self.evaluation_type, self.start_date)
        else {
            return Err(WizardError::Incomplete(self.step));
        };

        let plan = PlanDraft {
            category,
            task_type: self.task_type,
            evaluation_type,
            habit: self.habit.trim().to_string(),
            description: self.description.trim().to_string(),
            frequency: self.frequency,
            selected_days: self.selected_days.clone(),
            is_flexible: self.is_flexible,
            end_date: self.end_date,
            priority: self.priority,
            pomodoro: self.pomodoro,
            reminder: self.reminder,
        };

        Ok(ScheduleRequest {
            date,
            start: self.start_time,
            end: self.end_time,
            plan,
        })
    }
}
