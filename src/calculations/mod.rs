pub mod backward_pass;

use crate::calendar::{CalendarError, WorkCalendar};
use crate::config::ScheduleConfig;
use crate::task::Task;
use crate::task_validation::TaskValidationError;
use backward_pass::BackwardPass;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TaskValidationError),
    #[error("unschedulable configuration: {0}")]
    Unschedulable(#[from] CalendarError),
}

/// Assign start/end dates to every task by walking back from `deadline`.
///
/// Without a deadline every task loses its dates and `Ok(None)` is returned.
/// Dates are only written once the whole chain has been computed, so on error
/// `tasks` keeps whatever dates it had before the call.
pub fn schedule_all(
    deadline: Option<NaiveDate>,
    tasks: &mut [Task],
    calendar: &WorkCalendar,
) -> Result<Option<NaiveDate>, ScheduleError> {
    let Some(deadline) = deadline else {
        tasks.iter_mut().for_each(Task::clear_dates);
        return Ok(None);
    };
    if tasks.is_empty() {
        return Ok(None);
    }

    let spans = BackwardPass::new(tasks, calendar).execute(deadline)?;
    for (task, (start, end)) in tasks.iter_mut().zip(spans) {
        task.start_date = Some(start);
        task.end_date = Some(end);
    }
    Ok(tasks.first().and_then(|t| t.start_date))
}

/// Fresh annotated copy of `tasks` under `config`.
pub fn recompute(config: &ScheduleConfig, mut tasks: Vec<Task>) -> Result<Vec<Task>, ScheduleError> {
    let calendar = WorkCalendar::from_config(config);
    schedule_all(config.deadline, &mut tasks, &calendar)?;
    Ok(tasks)
}
