use super::ScheduleError;
use crate::calendar::WorkCalendar;
use crate::task::Task;
use crate::task_validation;
use chrono::NaiveDate;

pub struct BackwardPass<'a> {
    tasks: &'a [Task],
    calendar: &'a WorkCalendar,
}

impl<'a> BackwardPass<'a> {
    pub fn new(tasks: &'a [Task], calendar: &'a WorkCalendar) -> Self {
        Self { tasks, calendar }
    }

    /// Compute `(start, end)` for every task, returned in task order.
    ///
    /// The last task ends on the deadline (snapped back to a working day); each
    /// earlier task ends on the latest working day strictly before its
    /// successor starts.
    pub fn execute(&self, deadline: NaiveDate) -> Result<Vec<(NaiveDate, NaiveDate)>, ScheduleError> {
        task_validation::validate_task_collection(self.tasks)?;

        let mut spans = Vec::with_capacity(self.tasks.len());
        let mut cursor = self.calendar.last_working_day_on_or_before(deadline)?;

        for (idx, task) in self.tasks.iter().enumerate().rev() {
            let end = cursor;
            let start = self.calendar.find_prev_working(end, task.duration_days)?;
            log::trace!(
                "scheduled '{}' ({} days): {} .. {}",
                task.name,
                task.duration_days,
                start,
                end
            );
            spans.push((start, end));

            if idx > 0 {
                cursor = self.calendar.prev_working_day(start)?;
            }
        }

        spans.reverse();
        Ok(spans)
    }
}
