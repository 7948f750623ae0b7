// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::cgroup::DEFAULT_CGROUP_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Registers the calling container as the owner of a virtual GPU device.
#[derive(Parser, Debug)]
#[command(name = "vcuda-client", version)]
pub struct Cli {
    /// RPC address location for dial (unix socket path or http(s):// URL)
    #[arg(long, default_value = "")]
    pub addr: String,

    /// GPU card bus id of caller
    #[arg(long = "bus-id", default_value = "")]
    pub bus_id: String,

    /// Pod UID of caller
    #[arg(long = "pod-uid", default_value = "")]
    pub pod_uid: String,

    /// Container name of caller
    #[arg(long = "cont-name", default_value = "")]
    pub cont_name: String,

    /// Container id of caller
    #[arg(long = "cont-id", default_value = "")]
    pub cont_id: String,

    /// Seconds to wait for the connection to the manager
    #[arg(long = "connect-timeout", value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Seconds to wait for the manager's answer
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: log::Level,

    #[arg(long = "cgroup-path", default_value = DEFAULT_CGROUP_PATH, hide = true)]
    pub cgroup_path: PathBuf,
}
