// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! One-shot registration against the device manager.
//!
//! The flow is linear: the request is validated, a single connection is
//! opened, `RegisterVDevice` is called once, and the connection is dropped.
//! Any failure ends the flow; nothing is retried.

use crate::api::VDeviceRequest;
use crate::errors::{BoxError, Error};
use crate::request::RegistrationRequest;
use log::{debug, info};

/// Opens connections to the device manager.
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Connection: DeviceManager;

    async fn connect(&self, addr: &str) -> Result<Self::Connection, BoxError>;
}

/// An open connection to the device manager.
#[allow(async_fn_in_trait)]
pub trait DeviceManager {
    async fn register_vdevice(&mut self, request: VDeviceRequest) -> Result<(), tonic::Status>;
}

/// Register `request` with the manager at `addr`.
///
/// Nothing is dialed unless `addr` and the request pass validation.
pub async fn register<C: Connector>(
    connector: &C,
    addr: &str,
    request: RegistrationRequest,
) -> Result<(), Error> {
    if addr.is_empty() {
        return Err(Error::MissingArgument { what: "addr" });
    }
    request.validate()?;
    debug!("request validated: {request:?}");

    let mut conn = connector.connect(addr).await.map_err(|source| Error::Dial {
        addr: addr.to_string(),
        source,
    })?;
    debug!("connected to {addr}");

    let bus_id = request.bus_id.clone();
    conn.register_vdevice(request.into())
        .await
        .map_err(|source| Error::Registration { source })?;
    info!("registered vdevice {bus_id} with {addr}");
    Ok(())
}
