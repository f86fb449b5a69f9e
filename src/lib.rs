pub mod calculations;
pub mod calendar;
pub mod config;
pub mod format;
pub mod holidays;
pub mod persistence;
pub mod schedule;
pub mod task;
pub(crate) mod task_validation;

pub use calculations::{ScheduleError, recompute, schedule_all};
pub use calendar::{CalendarError, WorkCalendar};
pub use config::{ConfigError, DEFAULT_MAX_LOOKBACK_DAYS, ScheduleConfig};
pub use format::{DateFormat, parse_plan_date};
pub use holidays::{
    Holiday, HolidayFeedError, holiday_set, load_holiday_feed, load_holiday_feed_or_empty,
    parse_holiday_feed,
};
pub use persistence::{
    PersistenceError, PlanSnapshot, export_plan, import_plan, load_plan_from_csv,
    load_plan_from_json, plan_from_json_str, plan_to_json_string, save_plan_to_csv,
    save_plan_to_json,
};
pub use schedule::{PlanSummary, Schedule};
pub use task::Task;
pub use task_validation::TaskValidationError;
