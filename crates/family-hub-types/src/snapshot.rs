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

use crate::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slim chore record exposed in sensor attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreSummary {
    pub name: String,
    /// Assigned user's display name, or "Unassigned"
    pub assignee: String,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
}

/// Chores attributed to a single user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChores {
    pub name: String,
    pub due_today: Vec<ChoreSummary>,
    pub overdue: Vec<ChoreSummary>,
}

impl UserChores {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of open chores: due today plus overdue
    pub fn total(&self) -> usize {
        self.due_today.len() + self.overdue.len()
    }
}

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Users keyed by id
    pub users: BTreeMap<String, User>,
    pub chores_due_today: Vec<ChoreSummary>,
    pub chores_overdue: Vec<ChoreSummary>,
    /// Per-user breakdown keyed by user id; every known user has an entry
    pub chores_by_user: BTreeMap<String, UserChores>,
    pub refreshed_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn user_chores(&self, user_id: &str) -> Option<&UserChores> {
        self.chores_by_user.get(user_id)
    }
}
