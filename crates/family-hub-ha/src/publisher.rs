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

//! Pushes chore sensors into Home Assistant's state machine

use crate::client::HomeAssistantClient;
use family_hub_core::ChoreSensor;
use family_hub_types::{DOMAIN, Snapshot};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// State reported while the hub cannot be reached
pub const UNAVAILABLE: &str = "unavailable";

/// Lowercase ASCII slug with single underscores, like HA's `slugify`
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Entity id HA would derive for the sensor on the hub device
pub fn entity_id_for(sensor: &ChoreSensor) -> String {
    format!("sensor.{}", slugify(&format!("{DOMAIN} {}", sensor.name)))
}

#[derive(Debug, Clone)]
struct PublishedSensor {
    sensor: ChoreSensor,
    entity_id: String,
}

impl PublishedSensor {
    fn base_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert(
            "friendly_name".to_owned(),
            Value::String(format!("Family Hub {}", self.sensor.name)),
        );
        attributes.insert("icon".to_owned(), Value::String(self.sensor.icon.to_owned()));
        attributes.insert(
            "unique_id".to_owned(),
            Value::String(self.sensor.unique_id.clone()),
        );
        attributes
    }
}

/// Fixed set of sensors bound to their HA entity ids
#[derive(Debug)]
pub struct SensorPublisher {
    client: HomeAssistantClient,
    sensors: Vec<PublishedSensor>,
}

impl SensorPublisher {
    /// Bind sensors to entity ids; colliding ids get `_2`, `_3`, ... appended
    pub fn new(client: HomeAssistantClient, sensors: Vec<ChoreSensor>) -> Self {
        let mut taken = HashSet::new();
        let sensors = sensors
            .into_iter()
            .map(|sensor| {
                let base = entity_id_for(&sensor);
                let mut entity_id = base.clone();
                let mut suffix = 2;
                while !taken.insert(entity_id.clone()) {
                    entity_id = format!("{base}_{suffix}");
                    suffix += 1;
                }
                debug!("Sensor {} -> {}", sensor.unique_id, entity_id);
                PublishedSensor { sensor, entity_id }
            })
            .collect();

        Self { client, sensors }
    }

    pub fn entity_ids(&self) -> Vec<&str> {
        self.sensors.iter().map(|s| s.entity_id.as_str()).collect()
    }

    /// Publish every sensor's reading for `snapshot`.
    ///
    /// Returns the number of sensors HA accepted; a failing sensor is logged
    /// and skipped.
    pub async fn publish(&self, snapshot: &Snapshot) -> usize {
        let mut published = 0;
        for entry in &self.sensors {
            let reading = entry.sensor.reading(snapshot);
            let mut attributes = entry.base_attributes();
            if let Value::Object(extra) = reading.attributes {
                attributes.extend(extra);
            }

            match self
                .client
                .set_state(
                    &entry.entity_id,
                    &reading.value.to_string(),
                    &Value::Object(attributes),
                )
                .await
            {
                Ok(()) => published += 1,
                Err(e) => warn!("⚠️ [HA STATE] Failed to publish {}: {}", entry.entity_id, e),
            }
        }

        info!(
            "📤 [HA STATE] Published {}/{} sensors",
            published,
            self.sensors.len()
        );
        published
    }

    /// Mark every sensor unavailable after a failed refresh
    pub async fn publish_unavailable(&self) -> usize {
        let mut published = 0;
        for entry in &self.sensors {
            let attributes = Value::Object(entry.base_attributes());
            match self
                .client
                .set_state(&entry.entity_id, UNAVAILABLE, &attributes)
                .await
            {
                Ok(()) => published += 1,
                Err(e) => warn!(
                    "⚠️ [HA STATE] Failed to mark {} unavailable: {}",
                    entry.entity_id, e
                ),
            }
        }
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use family_hub_types::{ChoreSummary, UserChores};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn snapshot() -> Snapshot {
        let summary = ChoreSummary {
            name: "Dishes".to_owned(),
            assignee: "Alice".to_owned(),
            due_date: Some("2025-02-15T00:00:00Z".to_owned()),
            due_time: None,
        };
        let mut by_user = BTreeMap::new();
        by_user.insert(
            "u-1".to_owned(),
            UserChores {
                name: "Alice".to_owned(),
                due_today: vec![summary.clone()],
                overdue: Vec::new(),
            },
        );
        Snapshot {
            users: BTreeMap::new(),
            chores_due_today: vec![summary],
            chores_overdue: Vec::new(),
            chores_by_user: by_user,
            refreshed_at: Utc::now(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("family_hub Chores Due Today"), "family_hub_chores_due_today");
        assert_eq!(slugify("  Mary-Jane's  Chores!"), "mary_jane_s_chores");
        assert_eq!(slugify("Zoë"), "zo");
    }

    #[test]
    fn test_entity_ids() {
        assert_eq!(
            entity_id_for(&ChoreSensor::due_today()),
            "sensor.family_hub_chores_due_today"
        );
        assert_eq!(
            entity_id_for(&ChoreSensor::overdue()),
            "sensor.family_hub_chores_overdue"
        );
        assert_eq!(
            entity_id_for(&ChoreSensor::for_user("u-1", "Alice")),
            "sensor.family_hub_alice_chores"
        );
    }

    #[test]
    fn test_colliding_names_get_suffix() {
        let client = HomeAssistantClient::new("http://ha.local", "t").unwrap();
        let publisher = SensorPublisher::new(
            client,
            vec![
                ChoreSensor::for_user("u-1", "Sam"),
                ChoreSensor::for_user("u-2", "Sam"),
                ChoreSensor::for_user("u-3", "Sam"),
            ],
        );

        assert_eq!(
            publisher.entity_ids(),
            vec![
                "sensor.family_hub_sam_chores",
                "sensor.family_hub_sam_chores_2",
                "sensor.family_hub_sam_chores_3",
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_sends_values_and_attributes() {
        let mut server = Server::new_async().await;
        let due = server
            .mock("POST", "/api/states/sensor.family_hub_chores_due_today")
            .match_body(Matcher::PartialJson(json!({
                "state": "1",
                "attributes": {
                    "friendly_name": "Family Hub Chores Due Today",
                    "icon": "mdi:clipboard-check-outline",
                    "chores": [{
                        "name": "Dishes",
                        "assignee": "Alice",
                        "due_date": "2025-02-15T00:00:00Z",
                        "due_time": null
                    }]
                }
            })))
            .with_status(201)
            .create_async()
            .await;
        let user = server
            .mock("POST", "/api/states/sensor.family_hub_alice_chores")
            .match_body(Matcher::PartialJson(json!({
                "state": "1",
                "attributes": {"overdue": []}
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "t").unwrap();
        let publisher = SensorPublisher::new(
            client,
            vec![
                ChoreSensor::due_today(),
                ChoreSensor::for_user("u-1", "Alice"),
            ],
        );

        assert_eq!(publisher.publish(&snapshot()).await, 2);
        due.assert_async().await;
        user.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_continues_after_failure() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("POST", "/api/states/sensor.family_hub_chores_due_today")
            .with_status(500)
            .create_async()
            .await;
        let ok = server
            .mock("POST", "/api/states/sensor.family_hub_chores_overdue")
            .with_status(200)
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "t").unwrap();
        let publisher = SensorPublisher::new(
            client,
            vec![ChoreSensor::due_today(), ChoreSensor::overdue()],
        );

        assert_eq!(publisher.publish(&snapshot()).await, 1);
        failing.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_unavailable() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/states/sensor.family_hub_chores_overdue")
            .match_body(Matcher::PartialJson(json!({"state": "unavailable"})))
            .with_status(200)
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "t").unwrap();
        let publisher = SensorPublisher::new(client, vec![ChoreSensor::overdue()]);

        assert_eq!(publisher.publish_unavailable().await, 1);
        mock.assert_async().await;
    }
}
