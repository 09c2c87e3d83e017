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

use family_hub_api::FamilyHubError;
use thiserror::Error;

/// Outcome of a failed refresh cycle
#[derive(Error, Debug)]
pub enum RefreshError {
    /// Terminal: polling must stop until the token is replaced
    #[error("Family Hub rejected the credentials: {0}")]
    AuthFailed(#[source] FamilyHubError),

    /// Transient: the next scheduled refresh may succeed
    #[error("Update failed: {0}")]
    UpdateFailed(String),
}

impl From<FamilyHubError> for RefreshError {
    fn from(err: FamilyHubError) -> Self {
        if err.is_auth() {
            Self::AuthFailed(err)
        } else {
            Self::UpdateFailed(err.to_string())
        }
    }
}

pub type RefreshResult<T> = Result<T, RefreshError>;
