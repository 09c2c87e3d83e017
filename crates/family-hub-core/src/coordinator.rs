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

use crate::aggregate::build_snapshot;
use crate::errors::{RefreshError, RefreshResult};
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use family_hub_api::ChoreSource;
use family_hub_types::{ChoreStatus, Snapshot};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Default)]
struct CoordinatorState {
    data: Option<Arc<Snapshot>>,
    last_update_success: bool,
}

/// Polls a [`ChoreSource`] and keeps the latest [`Snapshot`]
///
/// The coordinator does not schedule itself; the caller invokes
/// [`Coordinator::refresh`] on whatever interval it wants.
pub struct Coordinator {
    source: Arc<dyn ChoreSource>,
    timezone: Option<Tz>,
    state: RwLock<CoordinatorState>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Coordinator")
            .field("timezone", &self.timezone)
            .field("has_data", &state.data.is_some())
            .field("last_update_success", &state.last_update_success)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(source: Arc<dyn ChoreSource>) -> Self {
        Self {
            source,
            timezone: None,
            state: RwLock::new(CoordinatorState::default()),
        }
    }

    /// Compute "today" in the given zone instead of the host's local zone
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }

    pub fn today(&self) -> NaiveDate {
        let now = Utc::now();
        match self.timezone {
            Some(tz) => now.with_timezone(&tz).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }

    /// Latest successful snapshot, kept across failed refreshes
    pub fn data(&self) -> Option<Arc<Snapshot>> {
        self.state.read().data.clone()
    }

    pub fn last_update_success(&self) -> bool {
        self.state.read().last_update_success
    }

    /// Run one refresh cycle using the current date
    pub async fn refresh(&self) -> RefreshResult<Arc<Snapshot>> {
        let today = self.today();
        self.refresh_for(today).await
    }

    /// Run one refresh cycle treating `today` as the current date.
    ///
    /// Users, pending chores and overdue chores are fetched in that order;
    /// the first failure aborts the cycle and leaves the previous snapshot
    /// in place.
    pub async fn refresh_for(&self, today: NaiveDate) -> RefreshResult<Arc<Snapshot>> {
        match self.fetch_and_build(today).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let mut state = self.state.write();
                state.data = Some(Arc::clone(&snapshot));
                state.last_update_success = true;
                info!(
                    "✅ [REFRESH] {} due today, {} overdue, {} users",
                    snapshot.chores_due_today.len(),
                    snapshot.chores_overdue.len(),
                    snapshot.users.len()
                );
                Ok(snapshot)
            }
            Err(e) => {
                self.state.write().last_update_success = false;
                match &e {
                    RefreshError::AuthFailed(_) => error!("❌ [REFRESH] {}", e),
                    RefreshError::UpdateFailed(_) => warn!("⚠️ [REFRESH] {}", e),
                }
                Err(e)
            }
        }
    }

    async fn fetch_and_build(&self, today: NaiveDate) -> RefreshResult<Snapshot> {
        let users = self.source.get_users().await?;
        let pending = self.source.get_chores(ChoreStatus::Pending).await?;
        let overdue = self.source.get_chores(ChoreStatus::Overdue).await?;

        Ok(build_snapshot(users, &pending, &overdue, today))
    }
}
