//! Initiative model - the schedulable unit of work.

use crate::id::{InitiativeId, ProjectId};
use crate::Time;
use serde::{Deserialize, Serialize};

/// An initiative is a schedulable work item with planned dates and a duration.
///
/// The engine receives initiatives as a read-only snapshot and never mutates
/// them; ownership of the records stays with the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Initiative {
    /// Unique identifier
    pub id: InitiativeId,

    /// Owning project
    pub project_id: ProjectId,

    /// Initiative name
    pub name: String,

    /// Detailed description
    pub description: String,

    /// Lifecycle tag (e.g. "active", "blocked", "done"). Free-form and
    /// opaque to the dependency engine.
    pub status: String,

    /// Planned start date
    pub planned_start: Option<Time>,

    /// Planned end date
    pub planned_end: Option<Time>,

    /// Explicit duration in days. When absent, the duration is derived
    /// from the planned dates.
    pub duration_days: Option<u32>,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl Initiative {
    /// Create a new initiative with no dates and zero duration.
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: InitiativeId::new(),
            project_id,
            name: name.into(),
            description: String::new(),
            status: "active".to_string(),
            planned_start: None,
            planned_end: None,
            duration_days: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the planned start and end dates.
    pub fn with_dates(mut self, start: Time, end: Time) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    /// Set an explicit duration in days.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// Set the lifecycle tag.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Effective duration in whole days.
    ///
    /// The explicit `duration_days` field wins; otherwise the duration is
    /// derived from the planned dates. Negative spans and missing data
    /// count as zero, so the initiative still participates in topology
    /// without inflating any path.
    pub fn duration_days(&self) -> u32 {
        if let Some(days) = self.duration_days {
            return days;
        }

        match (self.planned_start, self.planned_end) {
            (Some(start), Some(end)) => {
                let days = end.signed_duration_since(start).num_days();
                u32::try_from(days).unwrap_or(0)
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> Time {
        Utc.with_ymd_and_hms(2026, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn explicit_duration_wins_over_dates() {
        let init = Initiative::new(ProjectId::new(), "migrate billing")
            .with_dates(day(1), day(20))
            .with_duration(5);
        assert_eq!(init.duration_days(), 5);
    }

    #[test]
    fn duration_derived_from_dates() {
        let init = Initiative::new(ProjectId::new(), "rollout").with_dates(day(3), day(10));
        assert_eq!(init.duration_days(), 7);
    }

    #[test]
    fn missing_data_counts_as_zero() {
        let init = Initiative::new(ProjectId::new(), "unsized");
        assert_eq!(init.duration_days(), 0);

        // End before start clamps to zero rather than going negative.
        let backwards = Initiative::new(ProjectId::new(), "backwards").with_dates(day(10), day(3));
        assert_eq!(backwards.duration_days(), 0);
    }
}
