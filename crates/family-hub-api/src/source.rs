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

use crate::errors::FamilyHubResult;
use async_trait::async_trait;
use family_hub_types::{Chore, ChoreStatus, User};

/// Abstraction over where users and chores come from
///
/// Implemented by [`crate::FamilyHubClient`]; the refresh coordinator only
/// depends on this trait.
#[async_trait]
pub trait ChoreSource: Send + Sync {
    async fn get_users(&self) -> FamilyHubResult<Vec<User>>;

    async fn get_chores(&self, status: ChoreStatus) -> FamilyHubResult<Vec<Chore>>;
}
