// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error};
use std::process::ExitCode;
use vcuda_client::cli::Cli;
use vcuda_client::config::Config;
use vcuda_client::transport::GrpcConnector;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = simple_logger::init_with_level(cli.log_level) {
        eprintln!("failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }
    debug!(
        "vcuda-client starting (version {})",
        env!("CARGO_PKG_VERSION")
    );

    let code = match try_main(Config::from(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    };
    log::logger().flush();
    code
}

fn try_main(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;

    let connector = GrpcConnector::new(config.dial.clone());
    runtime
        .block_on(vcuda_client::run(&config, &connector))
        .map_err(|e| {
            let stage = e.stage();
            anyhow::Error::new(e).context(format!("{stage} failed"))
        })
}
