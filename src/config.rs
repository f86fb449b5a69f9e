use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 3650;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Inputs that decide which days count as working days, plus the deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub deadline: Option<NaiveDate>,
    pub skip_weekends: bool,
    pub exclude_holidays: bool,
    pub holidays: BTreeSet<NaiveDate>,
    /// Longest run of consecutive non-working days a backward walk may cross.
    pub max_lookback_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            deadline: None,
            skip_weekends: true,
            exclude_holidays: false,
            holidays: BTreeSet::new(),
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
        }
    }
}

impl ScheduleConfig {
    pub fn with_deadline(deadline: NaiveDate) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lookback_days == 0 {
            return Err(ConfigError::Invalid(
                "max_lookback_days must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: ScheduleConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
