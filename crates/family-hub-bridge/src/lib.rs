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

//! Family Hub bridge - polls the hub and mirrors chore sensors into Home Assistant

pub mod bridge;
pub mod cli;
pub mod config;

pub use bridge::{
    ConnectionCheck, build_coordinator, check_connection, run, run_cycle, snapshot_json,
};
pub use config::BridgeConfig;
