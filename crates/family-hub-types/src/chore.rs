// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chore lifecycle status, also used as the `status` filter of `GET /api/chores`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoreStatus {
    Pending,
    Completed,
    Overdue,
    /// Any status this build does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl ChoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chore record as returned by `GET /api/chores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chore {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "AssignedToUserID", default)]
    pub assigned_to_user_id: Option<String>,

    /// RFC3339 timestamp, e.g. "2025-02-15T00:00:00Z"
    #[serde(rename = "DueDate", default)]
    pub due_date: Option<String>,

    /// Wall-clock time of day, e.g. "18:00"
    #[serde(rename = "DueTime", default)]
    pub due_time: Option<String>,

    #[serde(rename = "Status", default)]
    pub status: ChoreStatus,
}

impl Chore {
    /// Calendar date part of `due_date`.
    ///
    /// Only the leading `YYYY-MM-DD` is looked at, the time and offset are
    /// ignored. Returns `None` when the date is missing or malformed.
    pub fn due_date_naive(&self) -> Option<NaiveDate> {
        let raw = self.due_date.as_deref()?;
        let date_part = raw.get(..10)?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date_naive() == Some(date)
    }

    /// Assignee id, treating an empty string like no assignee
    pub fn assignee_id(&self) -> Option<&str> {
        self.assigned_to_user_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chore_due(due_date: Option<&str>) -> Chore {
        Chore {
            id: "c-1".to_owned(),
            name: "Dishes".to_owned(),
            assigned_to_user_id: None,
            due_date: due_date.map(str::to_owned),
            due_time: None,
            status: ChoreStatus::Pending,
        }
    }

    #[test]
    fn test_deserialize_go_marshalled_chore() {
        let json = r#"{
            "ID": "c-9",
            "Name": "Take out trash",
            "Description": "",
            "CreatedByUserID": "u-1",
            "CategoryID": null,
            "AssignedToUserID": "u-2",
            "LastAssignedIndex": 0,
            "EligibleAssignees": ["u-2"],
            "DueDate": "2025-02-15T00:00:00Z",
            "DueTime": "18:00",
            "RecurrenceType": "weekly",
            "Status": "overdue"
        }"#;

        let chore: Chore = serde_json::from_str(json).unwrap();
        assert_eq!(chore.id, "c-9");
        assert_eq!(chore.assignee_id(), Some("u-2"));
        assert_eq!(chore.due_time.as_deref(), Some("18:00"));
        assert_eq!(chore.status, ChoreStatus::Overdue);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let chore: Chore =
            serde_json::from_str(r#"{"ID": "c-1", "Status": "snoozed"}"#).unwrap();
        assert_eq!(chore.status, ChoreStatus::Unknown);
        assert!(chore.assigned_to_user_id.is_none());
    }

    #[test]
    fn test_due_date_parsing() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();

        assert_eq!(
            chore_due(Some("2025-02-15T00:00:00Z")).due_date_naive(),
            Some(date)
        );
        assert_eq!(chore_due(Some("2025-02-15")).due_date_naive(), Some(date));
        assert!(chore_due(Some("2025-02-15T23:59:59+02:00")).is_due_on(date));
    }

    #[test]
    fn test_malformed_due_dates_are_never_due() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();

        for raw in [None, Some(""), Some("2025-02"), Some("not-a-date-at-all"), Some("2025-13-45T00:00:00Z")] {
            assert!(!chore_due(raw).is_due_on(date), "{raw:?} should not be due");
        }
    }

    #[test]
    fn test_empty_assignee_is_none() {
        let mut chore = chore_due(None);
        chore.assigned_to_user_id = Some(String::new());
        assert_eq!(chore.assignee_id(), None);
    }

    #[test]
    fn test_status_query_values() {
        assert_eq!(ChoreStatus::Pending.as_str(), "pending");
        assert_eq!(ChoreStatus::Overdue.to_string(), "overdue");
    }
}
