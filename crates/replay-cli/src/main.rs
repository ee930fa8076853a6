// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use replay_cli::config::ReplayerConfig;
use replay_cli::{Cli, Commands, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ReplayerConfig::load(cli.config.as_deref())?;
    cli.logging.clone().with_config_defaults(&config.logging()).init("replayer")?;
    tracing::debug!(?config, "configuration resolved");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Commands::Events(args) => args.run(&mut out),
        Commands::Show(args) => args.run(&mut out),
        Commands::Play(args) => args.run(&config.playback, &mut out),
    }
}
