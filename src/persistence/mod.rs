use crate::calculations::ScheduleError;
use csv::Error as CsvError;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("csv error: {0}")]
    Csv(#[from] CsvError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub mod file;

pub use file::{
    PlanSnapshot, export_plan, import_plan, load_plan_from_csv, load_plan_from_json,
    plan_from_json_str, plan_to_json_string, save_plan_to_csv, save_plan_to_json,
};
