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

//! Joins chores to users and partitions them into the snapshot buckets

use chrono::{NaiveDate, Utc};
use family_hub_types::{
    Chore, ChoreSummary, Snapshot, UNASSIGNED, UNKNOWN_USER, User, UserChores,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

fn display_name(user: &User) -> &str {
    if user.name.is_empty() {
        UNKNOWN_USER
    } else {
        &user.name
    }
}

/// Slim summary of a chore with the assignee resolved to a name
pub fn summarize(chore: &Chore, users: &BTreeMap<String, User>) -> ChoreSummary {
    let assignee = chore
        .assignee_id()
        .and_then(|id| users.get(id))
        .map_or(UNASSIGNED, display_name);

    ChoreSummary {
        name: chore.name.clone(),
        assignee: assignee.to_owned(),
        due_date: chore.due_date.clone(),
        due_time: chore.due_time.clone(),
    }
}

/// Build the snapshot for one refresh cycle.
///
/// `pending` is filtered down to chores due on `today`; `overdue` is taken
/// as-is. Chores whose assignee is not among `users` still show up in the
/// global lists but are not attributed to anyone.
pub fn build_snapshot(
    users: Vec<User>,
    pending: &[Chore],
    overdue: &[Chore],
    today: NaiveDate,
) -> Snapshot {
    let users: BTreeMap<String, User> = users
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect();

    let due_today: Vec<&Chore> = pending.iter().filter(|c| c.is_due_on(today)).collect();
    debug!(
        "📋 [AGGREGATE] {} users, {}/{} pending due {}, {} overdue",
        users.len(),
        due_today.len(),
        pending.len(),
        today,
        overdue.len()
    );

    let mut chores_by_user: BTreeMap<String, UserChores> = users
        .values()
        .map(|user| (user.id.clone(), UserChores::new(display_name(user))))
        .collect();

    for chore in &due_today {
        if let Some(entry) = chore.assignee_id().and_then(|id| chores_by_user.get_mut(id)) {
            entry.due_today.push(summarize(chore, &users));
        } else {
            trace!("Chore {} due today has no known assignee", chore.id);
        }
    }

    for chore in overdue {
        if let Some(entry) = chore.assignee_id().and_then(|id| chores_by_user.get_mut(id)) {
            entry.overdue.push(summarize(chore, &users));
        } else {
            trace!("Overdue chore {} has no known assignee", chore.id);
        }
    }

    let chores_due_today = due_today.iter().map(|c| summarize(c, &users)).collect();
    let chores_overdue = overdue.iter().map(|c| summarize(c, &users)).collect();

    Snapshot {
        users,
        chores_due_today,
        chores_overdue,
        chores_by_user,
        refreshed_at: Utc::now(),
    }
}
