//! Assignment payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RequiredField, WorkflowError};

/// Who should do the work and by when
///
/// Both fields are optional here so form state can be passed straight
/// through; [`Assignment::validate`] reports everything that is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Analyst (tests) or divisional head (samples, orders)
    pub assignee: Option<String>,
    /// Due date
    pub due_date: Option<NaiveDate>,
}

impl Assignment {
    /// Complete assignment
    #[must_use]
    pub fn new(assignee: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            assignee: Some(assignee.into()),
            due_date: Some(due_date),
        }
    }

    /// Check both fields, trimming the assignee
    ///
    /// # Errors
    /// Returns [`WorkflowError::Validation`] listing every missing field.
    pub fn validate(&self, target: &str) -> Result<(String, NaiveDate), WorkflowError> {
        let assignee = self
            .assignee
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        match (assignee, self.due_date) {
            (Some(assignee), Some(due)) => Ok((assignee.to_string(), due)),
            (assignee, due) => {
                let mut missing = Vec::with_capacity(2);
                if assignee.is_none() {
                    missing.push(RequiredField::Assignee);
                }
                if due.is_none() {
                    missing.push(RequiredField::DueDate);
                }
                Err(WorkflowError::Validation {
                    id: target.to_string(),
                    missing,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_missing_field() {
        let err = Assignment::default().validate("T-1").unwrap_err();
        assert_eq!(
            err.missing_fields(),
            &[RequiredField::Assignee, RequiredField::DueDate]
        );
    }

    #[test]
    fn blank_assignee_counts_as_missing() {
        let assignment = Assignment {
            assignee: Some("   ".into()),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        let err = assignment.validate("T-1").unwrap_err();
        assert_eq!(err.missing_fields(), &[RequiredField::Assignee]);
    }

    #[test]
    fn trims_assignee() {
        let due = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let (who, when) = Assignment::new("  Priya ", due).validate("T-1").unwrap();
        assert_eq!(who, "Priya");
        assert_eq!(when, due);
    }
}
