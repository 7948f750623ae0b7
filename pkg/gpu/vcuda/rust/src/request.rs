// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::api::VDeviceRequest;
use crate::cgroup::Identity;
use crate::errors::Error;

/// Identification sent to the device manager. `container_name` and
/// `container_id` are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub bus_id: String,
    pub pod_uid: String,
    pub container_name: String,
    pub container_id: String,
}

/// Combine caller-supplied values with the container's self-identification.
///
/// The identity's pod UID always wins, even when it is empty: the caller's pod
/// UID is discarded rather than used as a fallback. A container ID found in
/// the cgroup replaces the caller's container name.
pub fn assemble(
    bus_id: &str,
    _caller_pod_uid: &str,
    caller_container_name: &str,
    identity: &Identity,
) -> RegistrationRequest {
    let (container_name, container_id) = if identity.container_id.is_empty() {
        (caller_container_name.to_string(), String::new())
    } else {
        (String::new(), identity.container_id.clone())
    };

    RegistrationRequest {
        bus_id: bus_id.to_string(),
        pod_uid: identity.pod_uid.clone(),
        container_name,
        container_id,
    }
}

impl RegistrationRequest {
    /// Checks the manager needs before a connection is attempted.
    pub fn validate(&self) -> Result<(), Error> {
        if self.pod_uid.is_empty() {
            return Err(Error::MissingArgument { what: "pod uid" });
        }
        if self.container_name.is_empty() && self.container_id.is_empty() {
            return Err(Error::MissingArgument {
                what: "container name or container id",
            });
        }
        Ok(())
    }
}

impl From<RegistrationRequest> for VDeviceRequest {
    fn from(req: RegistrationRequest) -> Self {
        VDeviceRequest {
            bus_id: req.bus_id,
            pod_uid: req.pod_uid,
            container_name: req.container_name,
            container_id: req.container_id,
        }
    }
}
