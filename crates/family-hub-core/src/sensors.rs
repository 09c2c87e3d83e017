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

//! Sensor descriptions derived from a snapshot

use family_hub_types::{DOMAIN, Snapshot};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorKind {
    DueToday,
    Overdue,
    User { user_id: String },
}

/// One observable value exposed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoreSensor {
    pub kind: SensorKind,
    pub unique_id: String,
    pub name: String,
    pub icon: &'static str,
}

/// Current value and attributes of a sensor
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub value: usize,
    pub attributes: Value,
}

impl ChoreSensor {
    pub fn due_today() -> Self {
        Self {
            kind: SensorKind::DueToday,
            unique_id: format!("{DOMAIN}_chores_due_today"),
            name: "Chores Due Today".to_owned(),
            icon: "mdi:clipboard-check-outline",
        }
    }

    pub fn overdue() -> Self {
        Self {
            kind: SensorKind::Overdue,
            unique_id: format!("{DOMAIN}_chores_overdue"),
            name: "Chores Overdue".to_owned(),
            icon: "mdi:clipboard-alert-outline",
        }
    }

    pub fn for_user(user_id: &str, user_name: &str) -> Self {
        Self {
            kind: SensorKind::User {
                user_id: user_id.to_owned(),
            },
            unique_id: format!("{DOMAIN}_{user_id}_chores"),
            name: format!("{user_name} Chores"),
            icon: "mdi:account-check-outline",
        }
    }

    pub fn native_value(&self, snapshot: &Snapshot) -> usize {
        match &self.kind {
            SensorKind::DueToday => snapshot.chores_due_today.len(),
            SensorKind::Overdue => snapshot.chores_overdue.len(),
            SensorKind::User { user_id } => snapshot
                .user_chores(user_id)
                .map_or(0, |chores| chores.total()),
        }
    }

    pub fn attributes(&self, snapshot: &Snapshot) -> Value {
        match &self.kind {
            SensorKind::DueToday => json!({ "chores": snapshot.chores_due_today }),
            SensorKind::Overdue => json!({ "chores": snapshot.chores_overdue }),
            // A user removed since setup reports empty lists
            SensorKind::User { user_id } => match snapshot.user_chores(user_id) {
                Some(chores) => json!({
                    "due_today": chores.due_today,
                    "overdue": chores.overdue,
                }),
                None => json!({ "due_today": [], "overdue": [] }),
            },
        }
    }

    pub fn reading(&self, snapshot: &Snapshot) -> SensorReading {
        SensorReading {
            value: self.native_value(snapshot),
            attributes: self.attributes(snapshot),
        }
    }
}

/// Sensors for a snapshot: the two global aggregates plus one per user.
///
/// Called once with the first successful snapshot; the set stays fixed for
/// the lifetime of the bridge.
pub fn setup_sensors(snapshot: &Snapshot) -> Vec<ChoreSensor> {
    let mut sensors = vec![ChoreSensor::due_today(), ChoreSensor::overdue()];
    sensors.extend(
        snapshot
            .chores_by_user
            .iter()
            .map(|(user_id, chores)| ChoreSensor::for_user(user_id, &chores.name)),
    );
    sensors
}
