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

use std::fmt::Display;
use thiserror::Error;

/// Family Hub API error types
#[derive(Error, Debug)]
pub enum FamilyHubError {
    /// The hub rejected the token (401) or its permissions (403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Anything else: unreachable host, timeout, unexpected status, bad body
    #[error("{0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FamilyHubError {
    pub(crate) fn connecting(err: impl Display) -> Self {
        Self::Connection(format!("Error connecting to Family Hub: {err}"))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

pub type FamilyHubResult<T> = Result<T, FamilyHubError>;
