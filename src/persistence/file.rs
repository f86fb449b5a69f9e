use super::{PersistenceError, PersistenceResult};
use crate::format::{DateFormat, parse_plan_date, plan_date};
use crate::schedule::{PlanSummary, Schedule};
use crate::task::Task;
use crate::task_validation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Exported plan record. Dates inside `tasks` are informational only; an
/// import always recomputes them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    #[serde(default, with = "plan_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub date_format: DateFormat,
    #[serde(default)]
    pub exclude_holidays: bool,
}

pub fn export_plan(schedule: &Schedule) -> PlanSnapshot {
    PlanSnapshot {
        deadline: schedule.deadline(),
        tasks: schedule.tasks().to_vec(),
        date_format: schedule.date_format(),
        exclude_holidays: schedule.config().exclude_holidays,
    }
}

/// Load `snapshot` into the session, keeping the session's holiday set.
pub fn import_plan(schedule: &mut Schedule, snapshot: PlanSnapshot) -> PersistenceResult<PlanSummary> {
    let tasks: Vec<Task> = snapshot
        .tasks
        .into_iter()
        .map(|task| Task::new(task.name.trim(), task.duration_days))
        .collect();
    task_validation::validate_task_collection(&tasks)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;

    let task_count = tasks.len();
    let summary = schedule.update_with(|session| {
        session.replace_plan(snapshot.deadline, snapshot.exclude_holidays, tasks);
        session.set_date_format(snapshot.date_format);
        Ok(())
    })?;
    log::info!("Imported plan with {} tasks", task_count);
    Ok(summary)
}

pub fn plan_to_json_string(schedule: &Schedule) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(&export_plan(schedule))?)
}

pub fn plan_from_json_str(content: &str) -> PersistenceResult<PlanSnapshot> {
    Ok(serde_json::from_str(content)?)
}

pub fn save_plan_to_json<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &export_plan(schedule))?;
    log::info!("Saved plan to {}", path.as_ref().display());
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(
    schedule: &mut Schedule,
    path: P,
) -> PersistenceResult<PlanSummary> {
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    import_plan(schedule, snapshot)
}

const PLAN_ROW: &str = "plan";
const TASK_ROW: &str = "task";

#[derive(Default, Serialize, Deserialize)]
struct PlanCsvRecord {
    kind: String,
    name: String,
    duration: String,
    start_date: String,
    end_date: String,
    deadline: String,
    date_format: String,
    exclude_holidays: String,
}

impl PlanCsvRecord {
    fn plan_row(snapshot: &PlanSnapshot) -> Self {
        Self {
            kind: PLAN_ROW.to_string(),
            deadline: format_date(snapshot.deadline),
            date_format: snapshot.date_format.as_str().to_string(),
            exclude_holidays: snapshot.exclude_holidays.to_string(),
            ..Self::default()
        }
    }

    fn task_row(task: &Task) -> Self {
        Self {
            kind: TASK_ROW.to_string(),
            name: task.name.clone(),
            duration: task.duration_days.to_string(),
            start_date: format_date(task.start_date),
            end_date: format_date(task.end_date),
            ..Self::default()
        }
    }

    fn into_task(self) -> PersistenceResult<Task> {
        let duration_days = self.duration.trim().parse::<i64>().map_err(|e| {
            PersistenceError::InvalidData(format!("invalid duration '{}': {e}", self.duration))
        })?;
        let mut task = Task::new(self.name, duration_days);
        task.start_date = parse_date(&self.start_date)?;
        task.end_date = parse_date(&self.end_date)?;
        Ok(task)
    }
}

pub fn save_plan_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let snapshot = export_plan(schedule);
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(PlanCsvRecord::plan_row(&snapshot))?;
    for task in &snapshot.tasks {
        writer.serialize(PlanCsvRecord::task_row(task))?;
    }
    writer.flush()?;
    log::info!("Saved plan to {}", path.as_ref().display());
    Ok(())
}

pub fn load_plan_from_csv<P: AsRef<Path>>(
    schedule: &mut Schedule,
    path: P,
) -> PersistenceResult<PlanSummary> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut snapshot = PlanSnapshot::default();
    let mut seen_plan_row = false;
    for record in reader.deserialize::<PlanCsvRecord>() {
        let record = record?;
        match record.kind.trim() {
            PLAN_ROW => {
                if seen_plan_row {
                    return Err(PersistenceError::InvalidData(
                        "CSV file contained multiple plan rows".into(),
                    ));
                }
                seen_plan_row = true;
                snapshot.deadline = parse_date(&record.deadline)?;
                snapshot.date_format = DateFormat::from(record.date_format);
                snapshot.exclude_holidays = parse_bool(&record.exclude_holidays)?;
            }
            TASK_ROW => snapshot.tasks.push(record.into_task()?),
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "unknown row kind '{other}'"
                )));
            }
        }
    }
    import_plan(schedule, snapshot)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_plan_date(input)
        .map(Some)
        .map_err(PersistenceError::InvalidData)
}

fn parse_bool(input: &str) -> PersistenceResult<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_json_uses_original_field_names() {
        let json = r#"{
            "deadline": "2025-06-20T00:00:00.000Z",
            "tasks": [{"name": "Design", "duration": 3, "startDate": null}],
            "dateFormat": "dd MMM yyyy",
            "excludeHolidays": true
        }"#;
        let snapshot = plan_from_json_str(json).unwrap();
        assert_eq!(snapshot.deadline, NaiveDate::from_ymd_opt(2025, 6, 20));
        assert_eq!(snapshot.tasks, vec![Task::new("Design", 3)]);
        assert_eq!(snapshot.date_format, DateFormat::DayMonthNameYear);
        assert!(snapshot.exclude_holidays);
    }

    #[test]
    fn missing_fields_default() {
        let snapshot = plan_from_json_str("{}").unwrap();
        assert_eq!(snapshot, PlanSnapshot::default());
    }

    #[test]
    fn csv_booleans_are_strict() {
        assert!(!parse_bool("").unwrap());
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("yes").is_err());
    }
}
