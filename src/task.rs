use crate::format::plan_date;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One step of a sequential plan. Order in the owning list is the dependency order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_days: i64,
    #[serde(default, with = "plan_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "plan_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(name: impl Into<String>, duration_days: i64) -> Self {
        Self {
            name: name.into(),
            duration_days,
            start_date: None,
            end_date: None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    pub(crate) fn clear_dates(&mut self) {
        self.start_date = None;
        self.end_date = None;
    }

    /// Tabular view of an ordered task list, one row per task.
    pub fn to_dataframe(tasks: &[Task]) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        let starts: Vec<Option<NaiveDate>> = tasks.iter().map(|t| t.start_date).collect();
        let ends: Vec<Option<NaiveDate>> = tasks.iter().map(|t| t.end_date).collect();
        let durations: Vec<i64> = tasks.iter().map(|t| t.duration_days).collect();

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("name"), names).into_column(),
            Self::series_from_dates("start_date", &starts)?.into_column(),
            Self::series_from_dates("end_date", &ends)?.into_column(),
            Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
        ];
        DataFrame::new(columns)
    }

    fn series_from_dates(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Series> {
        let data: Vec<Option<i32>> = dates.iter().map(|d| d.map(Self::date_to_i32)).collect();
        Series::new(name.into(), data).cast(&DataType::Date)
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        // NaiveDate::default() is 1970-01-01, the polars Date epoch
        (date - NaiveDate::default()).num_days() as i32
    }
}
