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

use crate::errors::{FamilyHubError, FamilyHubResult};
use crate::source::ChoreSource;
use async_trait::async_trait;
use family_hub_types::{Chore, ChoreStatus, REQUEST_TIMEOUT, User};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Family Hub REST API client
#[derive(Clone)]
pub struct FamilyHubClient {
    base_url: String,
    token: String,
    client: Client,
}

impl fmt::Debug for FamilyHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl FamilyHubClient {
    /// Create a client with the default 10 second request timeout
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> FamilyHubResult<Self> {
        Self::with_timeout(base_url, token, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> FamilyHubResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            FamilyHubError::Config(format!("Failed to build HTTP client: {e}"))
        })?;

        let base_url = base_url.into().trim_end_matches('/').to_owned();
        debug!("Family Hub client for {} (timeout {:?})", base_url, timeout);

        Ok(Self {
            base_url,
            token: token.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get all users
    pub async fn get_users(&self) -> FamilyHubResult<Vec<User>> {
        self.request_list("/api/users", &[]).await
    }

    /// Get chores filtered by status
    pub async fn get_chores(&self, status: ChoreStatus) -> FamilyHubResult<Vec<Chore>> {
        self.request_list("/api/chores", &[("status", status.as_str())])
            .await
    }

    /// Check that the hub is reachable and accepts the token
    pub async fn validate_connection(&self) -> FamilyHubResult<()> {
        let users = self.get_users().await?;
        info!(
            "✅ [HUB] Connected to {} ({} users)",
            self.base_url,
            users.len()
        );
        Ok(())
    }

    /// List endpoints answer `null` instead of `[]` when nothing matches
    async fn request_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> FamilyHubResult<Vec<T>> {
        let items: Option<Vec<T>> = self.request(path, query).await?;
        Ok(items.unwrap_or_default())
    }

    /// Authenticated GET returning a decoded JSON body
    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> FamilyHubResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("🔍 [HUB QUERY] GET {} {:?}", path, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("❌ [HUB ERROR] Request to {} failed: {}", path, e);
                FamilyHubError::connecting(e)
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response.json::<T>().await.map_err(|e| {
                    error!("❌ [HUB ERROR] Invalid body from {}: {}", path, e);
                    FamilyHubError::connecting(e)
                })?;
                trace!("✅ [HUB RESULT] {}", path);
                Ok(body)
            }
            StatusCode::UNAUTHORIZED => {
                error!("❌ [HUB ERROR] Token rejected by {}", path);
                Err(FamilyHubError::Auth("Invalid API token".to_owned()))
            }
            StatusCode::FORBIDDEN => {
                error!("❌ [HUB ERROR] Access to {} forbidden", path);
                Err(FamilyHubError::Auth("Forbidden".to_owned()))
            }
            status => {
                error!("❌ [HUB ERROR] Status {} from {}", status, path);
                Err(FamilyHubError::Connection(format!(
                    "Unexpected status {} from {}",
                    status.as_u16(),
                    path
                )))
            }
        }
    }
}

#[async_trait]
impl ChoreSource for FamilyHubClient {
    async fn get_users(&self) -> FamilyHubResult<Vec<User>> {
        FamilyHubClient::get_users(self).await
    }

    async fn get_chores(&self, status: ChoreStatus) -> FamilyHubResult<Vec<Chore>> {
        FamilyHubClient::get_chores(self, status).await
    }
}
