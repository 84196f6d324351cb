pub mod appsettings;
pub mod block;
pub mod plan;
pub mod planning;
pub mod scheduler;
pub mod submission;
pub mod time_of_day;
pub mod wizard;

pub use block::TimeBlock;
pub use plan::{ExistingPlan, NewPlan, PlanDraft, PlanId};
pub use planning::{HttpPlanningService, InMemoryPlanningService, PlanningError, PlanningService};
pub use scheduler::{BlockScheduler, Conflict, ScheduleRequest, SubmitError, SubmittedPlan};
pub use submission::SubmissionGate;
pub use time_of_day::{ClockTime, Meridiem, TimeOfDay};
pub use wizard::{PlanWizard, WizardAction, WizardStep};
