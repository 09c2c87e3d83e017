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

use anyhow::Result;
use clap::Parser;
use family_hub_bridge::cli::{Cli, Command};
use family_hub_bridge::{BridgeConfig, ConnectionCheck, check_connection, run, snapshot_json};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Respects RUST_LOG, defaults to info
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = BridgeConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!("🚀 Starting Family Hub bridge");
            info!("   Hub: {}", config.family_hub.url);
            info!("   Scan interval: {}s", config.scan_interval_secs);
            info!(
                "   Timezone: {}",
                config.timezone.as_deref().unwrap_or("host local")
            );

            run(&config, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            })
            .await
        }
        Command::Validate => {
            let outcome = check_connection(&config).await;
            println!("{outcome}");
            if outcome == ConnectionCheck::Ok {
                Ok(())
            } else {
                anyhow::bail!("Connection check failed: {outcome}")
            }
        }
        Command::Snapshot => {
            println!("{}", snapshot_json(&config).await?);
            Ok(())
        }
    }
}
