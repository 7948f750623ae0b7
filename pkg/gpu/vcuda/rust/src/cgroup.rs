// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Self-identification of the calling container from its cgroup membership.
//!
//! `/proc/self/cgroup` holds one `hierarchy-id:controllers:path` record per
//! line. On cgroup v1 hosts managed by systemd, the `name=systemd` record's
//! path embeds the pod UID and the container ID, e.g.
//!
//! ```text
//! 1:name=systemd:/system.slice/containerd.service/kubepods-pod3afbda42_dabf_482d_962e_77bada079c54.slice:cri-containerd:68ac51f4...
//! ```

use log::debug;
use std::path::Path;

pub const DEFAULT_CGROUP_PATH: &str = "/proc/self/cgroup";

const SYSTEMD_CONTROLLER: &str = "name=systemd";

/// Pod UID and container ID of the current process. Empty fields mean the
/// value could not be found, which is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub pod_uid: String,
    pub container_id: String,
}

impl Identity {
    pub fn is_empty(&self) -> bool {
        self.pod_uid.is_empty() && self.container_id.is_empty()
    }
}

/// A naming scheme used by an orchestrator/runtime pair for the systemd
/// cgroup record. Returns `None` when the record does not follow the scheme.
pub trait CgroupConvention {
    fn parse(&self, record: &str) -> Option<Identity>;
}

/// Kubernetes pods under the systemd cgroup driver, with containerd as the
/// runtime: `...kubepods-pod<uid>.slice:cri-containerd:<container id>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubepodsContainerd;

impl CgroupConvention for KubepodsContainerd {
    fn parse(&self, record: &str) -> Option<Identity> {
        let (_, rest) = record.split_once("-pod")?;
        let (pod_uid, container_id) = rest.split_once(".slice:cri-containerd:")?;
        Some(Identity {
            pod_uid: normalize(pod_uid),
            container_id: container_id.to_string(),
        })
    }
}

/// Systemd slice names can't contain dashes, so the kubelet writes the pod
/// UUID with underscores.
pub fn normalize(id: &str) -> String {
    id.replace('_', "-")
}

/// Identify the container owning the current process using the default
/// convention.
pub fn identify(path: impl AsRef<Path>) -> Identity {
    identify_with(path, &KubepodsContainerd)
}

pub fn identify_with(path: impl AsRef<Path>, convention: &dyn CgroupConvention) -> Identity {
    let path = path.as_ref();
    // Stray non-UTF-8 bytes elsewhere in the file must not hide the record.
    let contents = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!("cannot read {}: {e}", path.display());
            return Identity::default();
        }
    };

    let Some(record) = contents
        .split('\n')
        .find(|line| line.contains(SYSTEMD_CONTROLLER))
    else {
        debug!("no {SYSTEMD_CONTROLLER} record in {}", path.display());
        return Identity::default();
    };

    convention.parse(record).unwrap_or_else(|| {
        debug!("unrecognized {SYSTEMD_CONTROLLER} record: {record}");
        Identity::default()
    })
}
