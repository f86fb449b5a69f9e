use chrono::NaiveDate;
use deadline_planner::{
    DateFormat, Holiday, PersistenceError, PlanSnapshot, Schedule, Task, export_plan,
    import_plan, load_plan_from_csv, load_plan_from_json, plan_from_json_str,
    plan_to_json_string, save_plan_to_csv, save_plan_to_json,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_holidays() -> Vec<Holiday> {
    vec![
        Holiday::new(d(2025, 6, 19), "Juneteenth"),
        Holiday::new(d(2025, 7, 4), "Independence Day"),
    ]
}

fn build_sample_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.load_holidays(sample_holidays()).unwrap();
    schedule.set_exclude_holidays(true).unwrap();
    schedule.set_deadline(d(2025, 7, 7)).unwrap();
    schedule.add_task("Design", 5).unwrap();
    schedule.add_task("Build", 8).unwrap();
    schedule.add_task("Verify", 3).unwrap();
    schedule.set_date_format(DateFormat::MonthDayYear);
    schedule
}

fn fresh_session_with_holidays() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.load_holidays(sample_holidays()).unwrap();
    schedule
}

#[test]
fn json_round_trip_reproduces_dates() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_plan_to_json(&schedule, file.path()).unwrap();

    let mut loaded = fresh_session_with_holidays();
    let summary = load_plan_from_json(&mut loaded, file.path()).unwrap();

    assert_eq!(loaded.tasks(), schedule.tasks());
    assert_eq!(loaded.deadline(), Some(d(2025, 7, 7)));
    assert!(loaded.config().exclude_holidays);
    assert_eq!(loaded.date_format(), DateFormat::MonthDayYear);
    assert_eq!(summary.project_start, schedule.project_start());
}

#[test]
fn csv_round_trip_reproduces_dates() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_plan_to_csv(&schedule, file.path()).unwrap();

    let mut loaded = fresh_session_with_holidays();
    load_plan_from_csv(&mut loaded, file.path()).unwrap();

    assert_eq!(loaded.tasks(), schedule.tasks());
    assert_eq!(loaded.deadline(), schedule.deadline());
    assert_eq!(loaded.date_format(), DateFormat::MonthDayYear);
}

#[test]
fn import_recomputes_instead_of_trusting_file_dates() {
    let mut stale = Task::new("Design", 3);
    stale.start_date = Some(d(2025, 1, 6));
    stale.end_date = Some(d(2025, 1, 8));
    let snapshot = PlanSnapshot {
        deadline: Some(d(2025, 6, 20)),
        tasks: vec![stale],
        date_format: DateFormat::IsoDate,
        exclude_holidays: true,
    };

    let mut schedule = fresh_session_with_holidays();
    import_plan(&mut schedule, snapshot).unwrap();

    // Juneteenth is excluded, so three working days end on Friday and start Tuesday.
    assert_eq!(schedule.tasks()[0].start_date, Some(d(2025, 6, 17)));
    assert_eq!(schedule.tasks()[0].end_date, Some(d(2025, 6, 20)));
}

#[test]
fn import_keeps_the_session_holiday_set() {
    let schedule = build_sample_schedule();
    let json = plan_to_json_string(&schedule).unwrap();

    let mut without_holidays = Schedule::new();
    import_plan(&mut without_holidays, plan_from_json_str(&json).unwrap()).unwrap();
    assert!(without_holidays.holidays().is_empty());
    assert_ne!(without_holidays.tasks(), schedule.tasks());

    let mut with_holidays = fresh_session_with_holidays();
    import_plan(&mut with_holidays, plan_from_json_str(&json).unwrap()).unwrap();
    assert_eq!(with_holidays.tasks(), schedule.tasks());
}

#[test]
fn import_replaces_tasks_wholesale() {
    let mut schedule = build_sample_schedule();
    let snapshot = PlanSnapshot {
        deadline: Some(d(2025, 6, 20)),
        tasks: vec![Task::new("Only", 1)],
        ..PlanSnapshot::default()
    };
    import_plan(&mut schedule, snapshot).unwrap();

    assert_eq!(schedule.tasks().len(), 1);
    assert_eq!(schedule.tasks()[0].name, "Only");
    assert!(!schedule.config().exclude_holidays);
    assert_eq!(schedule.holidays().len(), 2);
}

#[test]
fn invalid_import_leaves_session_untouched() {
    let mut schedule = build_sample_schedule();
    let before = schedule.tasks().to_vec();
    let snapshot = PlanSnapshot {
        deadline: Some(d(2025, 6, 20)),
        tasks: vec![Task::new("Design", 2), Task::new("Broken", 0)],
        ..PlanSnapshot::default()
    };

    let err = import_plan(&mut schedule, snapshot).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert_eq!(schedule.tasks(), before.as_slice());
    assert_eq!(schedule.deadline(), Some(d(2025, 7, 7)));
}

#[test]
fn plan_without_deadline_imports_unscheduled() {
    let json = r#"{"tasks":[{"name":"Design","duration":2},{"name":"Build","duration":4}],"dateFormat":"yyyy-MM-dd","excludeHolidays":false}"#;
    let mut schedule = Schedule::new();
    let summary = import_plan(&mut schedule, plan_from_json_str(json).unwrap()).unwrap();

    assert!(!summary.is_scheduled());
    assert_eq!(summary.task_count, 2);
    assert!(schedule.tasks().iter().all(|t| !t.is_scheduled()));
}

#[test]
fn export_snapshot_mirrors_session() {
    let schedule = build_sample_schedule();
    let snapshot = export_plan(&schedule);
    assert_eq!(snapshot.deadline, schedule.deadline());
    assert_eq!(snapshot.tasks, schedule.tasks());
    assert!(snapshot.exclude_holidays);

    let json = plan_to_json_string(&schedule).unwrap();
    assert!(json.contains("\"excludeHolidays\": true"));
    assert!(json.contains("\"dateFormat\": \"MM/dd/yyyy\""));
    assert!(json.contains("\"startDate\""));
}

#[test]
fn loading_missing_file_reports_io_error() {
    let mut schedule = Schedule::new();
    let err = load_plan_from_json(&mut schedule, "/nonexistent/plan.json").unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}
