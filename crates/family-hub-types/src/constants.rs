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

use std::time::Duration;

/// Integration domain, used as the prefix of every sensor unique id
pub const DOMAIN: &str = "family_hub";

/// How often the hub is polled unless configured otherwise
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Total timeout for a single hub request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Assignee label for chores without a (known) assignee
pub const UNASSIGNED: &str = "Unassigned";

/// Display name for users that came back without a name
pub const UNKNOWN_USER: &str = "Unknown";
