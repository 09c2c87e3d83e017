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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "family-hub-bridge")]
#[command(author, version, about = "Mirror Family Hub chores into Home Assistant sensors")]
#[command(
    long_about = "Polls a Family Hub instance for users and chores and publishes\n\
    due-today, overdue and per-user chore counts as Home Assistant sensors.\n\
    \nExamples:\n  \
    family-hub-bridge                       # Poll and publish until Ctrl-C\n  \
    family-hub-bridge validate              # Check URL and token\n  \
    family-hub-bridge snapshot -c hub.toml  # Print one refresh as JSON"
)]
pub struct Cli {
    /// Config file (TOML, or JSON when the extension is .json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Poll the hub and publish sensors until interrupted (default)
    Run,
    /// Check that the hub is reachable and accepts the token
    Validate,
    /// Run a single refresh and print the snapshot as JSON
    Snapshot,
}
