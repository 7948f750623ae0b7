// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Client that registers the calling container as the owner of a virtual GPU
//! device with the node's device manager.

pub mod api;
pub mod cgroup;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod request;
pub mod transport;

use crate::client::Connector;
use crate::config::Config;
use crate::errors::Error;
use log::debug;

/// Identify the container, build the request and register it.
pub async fn run<C: Connector>(config: &Config, connector: &C) -> Result<(), Error> {
    config.validate()?;

    let identity = cgroup::identify(&config.cgroup_path);
    if identity.is_empty() {
        debug!("no identity found in {}", config.cgroup_path.display());
    } else {
        debug!("cgroup identity: {identity:?}");
    }
    if !config.pod_uid.is_empty() && config.pod_uid != identity.pod_uid {
        debug!(
            "pod uid {:?} from flags replaced by {:?} from {}",
            config.pod_uid,
            identity.pod_uid,
            config.cgroup_path.display()
        );
    }

    let request = request::assemble(
        &config.bus_id,
        &config.pod_uid,
        &config.container_name,
        &identity,
    );
    client::register(connector, &config.addr, request).await
}
