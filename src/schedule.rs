use crate::calculations::{self, ScheduleError};
use crate::calendar::WorkCalendar;
use crate::config::ScheduleConfig;
use crate::format::DateFormat;
use crate::holidays::{self, Holiday};
use crate::task::Task;
use crate::task_validation;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub task_count: usize,
    pub project_start: Option<NaiveDate>,
    pub project_finish: Option<NaiveDate>,
    pub working_days: i64,
    pub calendar_days: i64,
    pub holidays_in_span: usize,
}

impl PlanSummary {
    fn unscheduled(task_count: usize) -> Self {
        Self {
            task_count,
            project_start: None,
            project_finish: None,
            working_days: 0,
            calendar_days: 0,
            holidays_in_span: 0,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.project_start.is_some()
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        if let Some(date) = self.project_start {
            parts.push(format!("start={}", date));
        }
        if let Some(date) = self.project_finish {
            parts.push(format!("finish={}", date));
        }
        if self.is_scheduled() {
            parts.push(format!("working_days={}", self.working_days));
            parts.push(format!("calendar_days={}", self.calendar_days));
        }
        if self.holidays_in_span > 0 {
            parts.push(format!("holidays={}", self.holidays_in_span));
        }
        parts.join(", ")
    }
}

/// A planning session: the caller-owned config, task list and loaded holidays.
///
/// Every mutator recomputes all task dates before returning. A mutation whose
/// recomputation fails is rolled back.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    config: ScheduleConfig,
    tasks: Vec<Task>,
    holidays: Vec<Holiday>,
    date_format: DateFormat,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        let mut schedule = Self {
            config,
            ..Self::default()
        };
        schedule.refresh()?;
        Ok(schedule)
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::from_config(&self.config)
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.config.deadline
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn date_format(&self) -> DateFormat {
        self.date_format
    }

    pub fn project_start(&self) -> Option<NaiveDate> {
        self.tasks.first().and_then(|t| t.start_date)
    }

    /// Loaded holidays falling inside `[start, end]`, in date order.
    pub fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Holiday> {
        self.holidays
            .iter()
            .filter(|h| h.date >= start && h.date <= end)
            .collect()
    }

    pub fn dataframe(&self) -> PolarsResult<DataFrame> {
        Task::to_dataframe(&self.tasks)
    }

    pub fn set_date_format(&mut self, format: DateFormat) {
        self.date_format = format;
    }

    pub fn set_deadline(&mut self, deadline: NaiveDate) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule.config.deadline = Some(deadline);
            Ok(())
        })
    }

    pub fn clear_deadline(&mut self) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule.config.deadline = None;
            Ok(())
        })
    }

    pub fn set_exclude_holidays(&mut self, exclude: bool) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule.config.exclude_holidays = exclude;
            Ok(())
        })
    }

    pub fn set_skip_weekends(&mut self, skip: bool) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule.config.skip_weekends = skip;
            Ok(())
        })
    }

    pub fn set_max_lookback_days(&mut self, days: u32) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule.config.max_lookback_days = days;
            Ok(())
        })
    }

    /// Replace the loaded holidays and the exclusion set derived from them.
    pub fn load_holidays(&mut self, holidays: Vec<Holiday>) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule.config.holidays = holidays::holiday_set(&holidays);
            schedule.holidays = holidays;
            Ok(())
        })
    }

    /// Swap in a whole new config. The loaded holiday labels are kept only for
    /// dates the new config still contains.
    pub fn set_config(&mut self, config: ScheduleConfig) -> Result<PlanSummary, ScheduleError> {
        self.update_with(|schedule| {
            schedule
                .holidays
                .retain(|holiday| config.holidays.contains(&holiday.date));
            schedule.config = config;
            Ok(())
        })
    }

    /// Validate and append a task at the end of the chain (nearest the deadline).
    pub fn add_task(
        &mut self,
        name: &str,
        duration_days: i64,
    ) -> Result<PlanSummary, ScheduleError> {
        let task = Task::new(name.trim(), duration_days);
        task_validation::validate_task(self.tasks.len(), &task)?;
        self.update_with(|schedule| {
            schedule.tasks.push(task);
            Ok(())
        })
    }

    /// Replace the task list wholesale. Incoming dates are discarded and recomputed.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> Result<PlanSummary, ScheduleError> {
        let tasks: Vec<Task> = tasks
            .into_iter()
            .map(|task| Task::new(task.name.trim(), task.duration_days))
            .collect();
        task_validation::validate_task_collection(&tasks)?;
        self.update_with(|schedule| {
            schedule.tasks = tasks;
            Ok(())
        })
    }

    pub(crate) fn replace_plan(
        &mut self,
        deadline: Option<NaiveDate>,
        exclude_holidays: bool,
        tasks: Vec<Task>,
    ) {
        self.config.deadline = deadline;
        self.config.exclude_holidays = exclude_holidays;
        self.tasks = tasks;
    }

    /// Apply `mutator` to a copy of the session and keep it only if it schedules cleanly.
    pub(crate) fn update_with<F>(&mut self, mutator: F) -> Result<PlanSummary, ScheduleError>
    where
        F: FnOnce(&mut Schedule) -> Result<(), ScheduleError>,
    {
        let mut candidate = self.clone();
        mutator(&mut candidate)?;
        let summary = candidate.refresh()?;
        *self = candidate;
        Ok(summary)
    }

    /// Recompute every task's dates from the current config.
    pub fn refresh(&mut self) -> Result<PlanSummary, ScheduleError> {
        log::debug!(
            "Refreshing schedule: {} tasks, deadline {:?}",
            self.tasks.len(),
            self.config.deadline
        );
        let calendar = self.calendar();
        let project_start =
            calculations::schedule_all(self.config.deadline, &mut self.tasks, &calendar)?;

        let Some(project_start) = project_start else {
            return Ok(PlanSummary::unscheduled(self.tasks.len()));
        };
        let project_finish = self
            .tasks
            .last()
            .and_then(|t| t.end_date)
            .unwrap_or(project_start);

        let holidays_in_span = if calendar.excludes_holidays() {
            self.config
                .holidays
                .range(project_start..=project_finish)
                .count()
        } else {
            0
        };

        Ok(PlanSummary {
            task_count: self.tasks.len(),
            project_start: Some(project_start),
            project_finish: Some(project_finish),
            working_days: self.tasks.iter().map(|t| t.duration_days).sum(),
            calendar_days: (project_finish - project_start).num_days() + 1,
            holidays_in_span,
        })
    }
}
