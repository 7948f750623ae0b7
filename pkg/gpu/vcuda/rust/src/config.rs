// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::cli::Cli;
use crate::errors::Error;
use crate::transport::DialOptions;
use std::path::PathBuf;
use std::time::Duration;

/// Everything one registration needs, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: String,
    pub bus_id: String,
    pub pod_uid: String,
    pub container_name: String,
    pub container_id: String,
    pub cgroup_path: PathBuf,
    pub dial: DialOptions,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            addr: cli.addr,
            bus_id: cli.bus_id,
            pod_uid: cli.pod_uid,
            container_name: cli.cont_name,
            container_id: cli.cont_id,
            cgroup_path: cli.cgroup_path,
            dial: DialOptions {
                connect_timeout: cli.connect_timeout.map(Duration::from_secs),
                timeout: cli.timeout.map(Duration::from_secs),
                ..DialOptions::default()
            },
        }
    }
}

impl Config {
    /// Check the caller supplied a target and some way to name the container.
    /// The pod UID is checked on the assembled request instead, since
    /// self-identification replaces it.
    pub fn validate(&self) -> Result<(), Error> {
        if self.addr.is_empty() {
            return Err(Error::MissingArgument { what: "addr" });
        }
        if self.container_name.is_empty() && self.container_id.is_empty() {
            return Err(Error::MissingArgument {
                what: "cont-name or cont-id",
            });
        }
        Ok(())
    }
}
