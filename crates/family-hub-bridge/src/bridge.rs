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

//! Setup, polling loop and one-shot commands

use crate::config::BridgeConfig;
use anyhow::{Context, Result};
use family_hub_api::{FamilyHubClient, FamilyHubError};
use family_hub_core::{Coordinator, RefreshError, RefreshResult, setup_sensors};
use family_hub_ha::{HomeAssistantClient, SensorPublisher};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Result of the setup-time connection check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionCheck {
    Ok,
    InvalidAuth,
    CannotConnect,
    Unknown,
}

impl ConnectionCheck {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidAuth => "invalid_auth",
            Self::CannotConnect => "cannot_connect",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn hub_client(config: &BridgeConfig) -> Result<FamilyHubClient> {
    FamilyHubClient::with_timeout(
        &config.family_hub.url,
        &config.family_hub.token,
        config.request_timeout(),
    )
    .context("Failed to create Family Hub client")
}

/// Validate URL and token by fetching the user list once
pub async fn check_connection(config: &BridgeConfig) -> ConnectionCheck {
    let client = match hub_client(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Unexpected error during connection check: {e:#}");
            return ConnectionCheck::Unknown;
        }
    };

    match client.validate_connection().await {
        Ok(()) => ConnectionCheck::Ok,
        Err(FamilyHubError::Auth(_)) => ConnectionCheck::InvalidAuth,
        Err(FamilyHubError::Connection(_)) => ConnectionCheck::CannotConnect,
        Err(e @ FamilyHubError::Config(_)) => {
            error!("Unexpected error during connection check: {e}");
            ConnectionCheck::Unknown
        }
    }
}

pub fn build_coordinator(config: &BridgeConfig) -> Result<Coordinator> {
    let coordinator = Coordinator::new(Arc::new(hub_client(config)?));
    Ok(match config.parsed_timezone()? {
        Some(tz) => coordinator.with_timezone(tz),
        None => coordinator,
    })
}

/// One scheduled refresh: publish the new snapshot, or mark every sensor
/// unavailable and hand the error back to the caller.
pub async fn run_cycle(
    coordinator: &Coordinator,
    publisher: &SensorPublisher,
) -> RefreshResult<usize> {
    match coordinator.refresh().await {
        Ok(snapshot) => Ok(publisher.publish(&snapshot).await),
        Err(e) => {
            publisher.publish_unavailable().await;
            Err(e)
        }
    }
}

/// Poll the hub and publish sensors until `shutdown` resolves.
///
/// The first refresh must succeed, since the sensor set is derived from it.
/// Afterwards connection problems only mark sensors unavailable, while a
/// rejected token stops the loop.
pub async fn run(config: &BridgeConfig, shutdown: impl Future<Output = ()>) -> Result<()> {
    let coordinator = build_coordinator(config)?;

    let snapshot = match coordinator.refresh().await {
        Ok(snapshot) => snapshot,
        Err(e @ RefreshError::AuthFailed(_)) => {
            return Err(e).context("Family Hub rejected the API token; update it and restart");
        }
        Err(e) => return Err(e).context("Family Hub is not ready"),
    };

    let ha = HomeAssistantClient::from_config(
        config.home_assistant.base_url.clone(),
        config.home_assistant.token.clone(),
    )
    .context("Failed to create Home Assistant client")?;
    if !ha.ping().await? {
        warn!("⚠️ Home Assistant at {} did not answer the health check", ha.base_url());
    }

    let publisher = SensorPublisher::new(ha, setup_sensors(&snapshot));
    info!("📋 Registered sensors: {}", publisher.entity_ids().join(", "));
    publisher.publish(&snapshot).await;

    let mut interval = tokio::time::interval(config.scan_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and the initial refresh is done
    interval.tick().await;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(());
            }
            _ = interval.tick() => {}
        }

        // A slow hub must not hold up shutdown
        let outcome = tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received, abandoning refresh");
                return Ok(());
            }
            outcome = run_cycle(&coordinator, &publisher) => outcome,
        };

        if let Err(e @ RefreshError::AuthFailed(_)) = outcome {
            return Err(e).context("Family Hub rejected the API token; polling stopped");
        }
    }
}

/// Single refresh rendered as pretty JSON
pub async fn snapshot_json(config: &BridgeConfig) -> Result<String> {
    let coordinator = build_coordinator(config)?;
    let snapshot = coordinator.refresh().await?;
    Ok(serde_json::to_string_pretty(&*snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FamilyHubConfig, HomeAssistantConfig};
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn config_for(url: String) -> BridgeConfig {
        BridgeConfig {
            family_hub: FamilyHubConfig {
                url,
                token: "t".to_owned(),
            },
            request_timeout_secs: 1,
            ..Default::default()
        }
    }

    fn polling_config(hub: &ServerGuard, ha: &ServerGuard) -> BridgeConfig {
        BridgeConfig {
            home_assistant: HomeAssistantConfig {
                base_url: Some(ha.url()),
                token: Some("ha".to_owned()),
            },
            scan_interval_secs: 1,
            ..config_for(hub.url())
        }
    }

    /// Hub with no users and no chores, so setup registers two sensors
    async fn mock_empty_hub(hub: &mut ServerGuard) -> (Mock, Mock) {
        let users = hub
            .mock("GET", "/api/users")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;
        let chores = hub
            .mock("GET", "/api/chores")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        (users, chores)
    }

    async fn mock_ha(ha: &mut ServerGuard) -> (Mock, Mock) {
        let ping = ha
            .mock("GET", "/api/")
            .with_status(200)
            .create_async()
            .await;
        let initial = ha
            .mock("POST", Matcher::Regex(r"^/api/states/sensor\.family_hub_.+$".to_owned()))
            .match_body(Matcher::PartialJson(json!({"state": "0"})))
            .with_status(201)
            .expect(2)
            .create_async()
            .await;
        (ping, initial)
    }

    async fn wait_until_matched(mock: &Mock) {
        while !mock.matched_async().await {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn test_check_connection_ok() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/users")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        assert_eq!(check_connection(&config_for(server.url())).await, ConnectionCheck::Ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_connection_invalid_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/users")
            .with_status(401)
            .create_async()
            .await;

        let outcome = check_connection(&config_for(server.url())).await;
        assert_eq!(outcome, ConnectionCheck::InvalidAuth);
        assert_eq!(outcome.to_string(), "invalid_auth");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_connection_cannot_connect() {
        let outcome = check_connection(&config_for("http://127.0.0.1:1".to_owned())).await;
        assert_eq!(outcome, ConnectionCheck::CannotConnect);
    }

    #[tokio::test]
    async fn test_run_fails_fast_on_rejected_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/users")
            .with_status(403)
            .create_async()
            .await;

        let result = run(&config_for(server.url()), std::future::pending()).await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RefreshError>(),
            Some(RefreshError::AuthFailed(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_fails_when_hub_not_ready() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/users")
            .with_status(503)
            .create_async()
            .await;

        let err = run(&config_for(server.url()), std::future::pending())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Family Hub is not ready");
        assert!(matches!(
            err.downcast_ref::<RefreshError>(),
            Some(RefreshError::UpdateFailed(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_stops_when_token_is_revoked() {
        let mut hub = Server::new_async().await;
        let mut ha = Server::new_async().await;
        let (users, _chores) = mock_empty_hub(&mut hub).await;
        let (_ping, initial) = mock_ha(&mut ha).await;
        let unavailable = ha
            .mock("POST", Matcher::Regex(r"^/api/states/sensor\.family_hub_.+$".to_owned()))
            .match_body(Matcher::PartialJson(json!({"state": "unavailable"})))
            .with_status(200)
            .expect(2)
            .create_async()
            .await;
        let config = polling_config(&hub, &ha);

        let (result, rejected) = tokio::join!(
            tokio::time::timeout(
                Duration::from_secs(10),
                run(&config, std::future::pending()),
            ),
            async {
                wait_until_matched(&users).await;
                users.remove_async().await;
                hub.mock("GET", "/api/users")
                    .with_status(401)
                    .create_async()
                    .await
            }
        );

        let err = result.expect("polling loop kept running").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RefreshError>(),
            Some(RefreshError::AuthFailed(_))
        ));
        rejected.assert_async().await;
        initial.assert_async().await;
        unavailable.assert_async().await;
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_slow_refresh() {
        let mut hub = Server::new_async().await;
        let mut ha = Server::new_async().await;
        let (users, _chores) = mock_empty_hub(&mut hub).await;
        let (_ping, initial) = mock_ha(&mut ha).await;
        let config = BridgeConfig {
            request_timeout_secs: 30,
            ..polling_config(&hub, &ha)
        };

        let started = Instant::now();
        let (result, _slow) = tokio::join!(
            run(&config, tokio::time::sleep(Duration::from_millis(1500))),
            async {
                wait_until_matched(&users).await;
                users.remove_async().await;
                hub.mock("GET", "/api/users")
                    .with_status(200)
                    .with_body_from_request(|_| {
                        std::thread::sleep(Duration::from_secs(3));
                        b"[]".to_vec()
                    })
                    .create_async()
                    .await
            }
        );

        assert!(result.is_ok(), "{result:?}");
        assert!(started.elapsed() < Duration::from_millis(2500));
        initial.assert_async().await;
    }

    #[tokio::test]
    async fn test_snapshot_json() {
        let mut server = Server::new_async().await;
        let _users = server
            .mock("GET", "/api/users")
            .with_status(200)
            .with_body(r#"[{"ID": "u-1", "Name": "Alice"}]"#)
            .create_async()
            .await;
        let _chores = server
            .mock("GET", "/api/chores")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let json = snapshot_json(&config_for(server.url())).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["chores_by_user"]["u-1"]["name"], "Alice");
        assert_eq!(value["chores_due_today"], serde_json::json!([]));
    }
}
