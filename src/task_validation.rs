use crate::task::Task;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_task(position: usize, task: &Task) -> Result<(), TaskValidationError> {
    if task.name.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task #{} requires a non-empty name",
            position + 1
        )));
    }

    if task.duration_days < 1 {
        return Err(TaskValidationError::new(format!(
            "task #{} '{}' has duration {} (must be at least 1 working day)",
            position + 1,
            task.name,
            task.duration_days
        )));
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    for (position, task) in tasks.iter().enumerate() {
        validate_task(position, task)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names_and_short_durations() {
        assert!(validate_task(0, &Task::new("Design", 1)).is_ok());

        let err = validate_task(1, &Task::new("   ", 2)).unwrap_err();
        assert_eq!(err.to_string(), "task #2 requires a non-empty name");

        let err = validate_task(0, &Task::new("Build", 0)).unwrap_err();
        assert!(err.to_string().contains("duration 0"));
        assert!(validate_task(0, &Task::new("Build", -4)).is_err());
    }

    #[test]
    fn collection_reports_first_invalid_task() {
        let tasks = vec![
            Task::new("Design", 2),
            Task::new("Build", 0),
            Task::new("", 1),
        ];
        let err = validate_task_collection(&tasks).unwrap_err();
        assert!(err.to_string().starts_with("task #2 'Build'"));
    }
}
