// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::api::VDeviceRequest;
use crate::api::vcuda_service_client::VcudaServiceClient;
use crate::client::{Connector, DeviceManager};
use crate::errors::BoxError;
use hyper_util::rt::TokioIo;
use log::debug;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

#[cfg(unix)]
use tokio::net::UnixStream;

// Only used as the HTTP/2 authority when talking over a unix socket.
const UNIX_AUTHORITY: &str = "http://[::]:50051";

const DEFAULT_TCP_KEEPALIVE: Duration = Duration::from_secs(60);

/// Connection settings handed to the gRPC channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialOptions {
    pub connect_timeout: Option<Duration>,
    /// Per-request deadline. `None` waits for the manager indefinitely.
    pub timeout: Option<Duration>,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for DialOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            timeout: None,
            tcp_keepalive: Some(DEFAULT_TCP_KEEPALIVE),
        }
    }
}

/// Where the device manager listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Tcp(String),
    Unix(String),
}

impl Target {
    pub fn parse(addr: &str) -> Self {
        if addr.starts_with("http://") || addr.starts_with("https://") {
            Target::Tcp(addr.to_string())
        } else {
            let path = addr.strip_prefix("unix://").unwrap_or(addr);
            Target::Unix(path.to_string())
        }
    }
}

/// Dials the device manager over gRPC.
#[derive(Debug, Clone, Default)]
pub struct GrpcConnector {
    options: DialOptions,
}

impl GrpcConnector {
    pub fn new(options: DialOptions) -> Self {
        Self { options }
    }

    fn endpoint(&self, uri: String) -> Result<Endpoint, BoxError> {
        let mut endpoint = Endpoint::from_shared(uri)?
            .tcp_keepalive(self.options.tcp_keepalive)
            .tcp_nodelay(true);
        if let Some(connect_timeout) = self.options.connect_timeout {
            endpoint = endpoint.connect_timeout(connect_timeout);
        }
        if let Some(timeout) = self.options.timeout {
            endpoint = endpoint.timeout(timeout);
        }
        Ok(endpoint)
    }

    async fn channel(&self, addr: &str) -> Result<Channel, BoxError> {
        match Target::parse(addr) {
            Target::Tcp(uri) => {
                debug!("dialing tcp endpoint {uri}");
                Ok(self.endpoint(uri)?.connect().await?)
            }
            #[cfg(unix)]
            Target::Unix(socket_path) => {
                debug!("dialing unix socket {socket_path}");
                let channel = self
                    .endpoint(UNIX_AUTHORITY.to_string())?
                    .connect_with_connector(service_fn(move |_: Uri| {
                        let socket_path = socket_path.clone();
                        async move {
                            Ok::<_, std::io::Error>(TokioIo::new(
                                UnixStream::connect(socket_path).await?,
                            ))
                        }
                    }))
                    .await?;
                Ok(channel)
            }
            #[cfg(not(unix))]
            Target::Unix(socket_path) => Err(format!(
                "unix sockets are not supported on this platform: {socket_path}"
            )
            .into()),
        }
    }
}

impl Connector for GrpcConnector {
    type Connection = VcudaServiceClient<Channel>;

    async fn connect(&self, addr: &str) -> Result<Self::Connection, BoxError> {
        Ok(VcudaServiceClient::new(self.channel(addr).await?))
    }
}

impl DeviceManager for VcudaServiceClient<Channel> {
    async fn register_vdevice(&mut self, request: VDeviceRequest) -> Result<(), tonic::Status> {
        self.register_v_device(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse() {
        assert_eq!(
            Target::parse("/var/run/gpu-manager/vcuda.sock"),
            Target::Unix("/var/run/gpu-manager/vcuda.sock".into())
        );
        assert_eq!(
            Target::parse("unix:///tmp/vcuda.sock"),
            Target::Unix("/tmp/vcuda.sock".into())
        );
        assert_eq!(
            Target::parse("http://127.0.0.1:5678"),
            Target::Tcp("http://127.0.0.1:5678".into())
        );
        assert_eq!(
            Target::parse("https://manager:443"),
            Target::Tcp("https://manager:443".into())
        );
        assert_eq!(Target::parse("vcuda.sock"), Target::Unix("vcuda.sock".into()));
    }

    #[test]
    fn test_default_options() {
        let options = DialOptions::default();
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.timeout, None);
        assert_eq!(options.tcp_keepalive, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_endpoint_rejects_invalid_uri() {
        let connector = GrpcConnector::default();
        assert!(connector.endpoint("http://bad host".to_string()).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_missing_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("vcuda.sock");
        let connector = GrpcConnector::new(DialOptions {
            connect_timeout: Some(Duration::from_secs(1)),
            ..DialOptions::default()
        });
        let result = connector.connect(socket.to_str().unwrap()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connect_refused_tcp() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let connector = GrpcConnector::new(DialOptions {
            connect_timeout: Some(Duration::from_secs(1)),
            ..DialOptions::default()
        });
        let result = connector.connect(&format!("http://127.0.0.1:{port}")).await;
        assert!(result.is_err());
    }

    #[cfg(unix)]
    mod manager {
        use crate::api::{VDeviceRequest, VDeviceResponse};
        use std::convert::Infallible;
        use std::future::{Future, Ready, ready};
        use std::pin::Pin;
        use std::sync::{Arc, Mutex};
        use std::task::{Context, Poll};
        use tonic::codegen::{Body, StdError, http};

        /// In-process device manager answering `RegisterVDevice` with `reply`.
        #[derive(Clone, Default)]
        pub struct Manager {
            pub paths: Arc<Mutex<Vec<String>>>,
            pub received: Arc<Mutex<Vec<VDeviceRequest>>>,
            pub reply: Option<tonic::Status>,
        }

        impl tonic::server::UnaryService<VDeviceRequest> for Manager {
            type Response = VDeviceResponse;
            type Future = Ready<Result<tonic::Response<VDeviceResponse>, tonic::Status>>;

            fn call(&mut self, request: tonic::Request<VDeviceRequest>) -> Self::Future {
                self.received.lock().unwrap().push(request.into_inner());
                ready(match &self.reply {
                    Some(status) => Err(status.clone()),
                    None => Ok(tonic::Response::new(VDeviceResponse {})),
                })
            }
        }

        impl<B> tower::Service<http::Request<B>> for Manager
        where
            B: Body + Send + 'static,
            B::Error: Into<StdError> + Send + 'static,
        {
            type Response = http::Response<tonic::body::Body>;
            type Error = Infallible;
            type Future =
                Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send + 'static>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: http::Request<B>) -> Self::Future {
                self.paths.lock().unwrap().push(req.uri().path().to_string());
                let service = self.clone();
                Box::pin(async move {
                    let codec = tonic_prost::ProstCodec::<VDeviceResponse, VDeviceRequest>::default();
                    let mut grpc = tonic::server::Grpc::new(codec);
                    Ok(grpc.unary(service, req).await)
                })
            }
        }

        impl tonic::server::NamedService for Manager {
            const NAME: &'static str = "vcuda.VCUDAService";
        }
    }

    /// Serve a `Manager` on a unix socket in a fresh tempdir. The tempdir must
    /// outlive the test.
    #[cfg(unix)]
    fn serve(reply: Option<tonic::Status>) -> (tempfile::TempDir, String, manager::Manager) {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("vcuda.sock");
        let listener = tokio::net::UnixListener::bind(&socket).unwrap();
        let manager = manager::Manager {
            reply,
            ..manager::Manager::default()
        };
        let service = manager.clone();
        tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(service)
                .serve_with_incoming(tokio_stream::wrappers::UnixListenerStream::new(listener))
                .await
                .unwrap();
        });
        (dir, socket.to_str().unwrap().to_string(), manager)
    }

    #[cfg(unix)]
    fn registration() -> crate::request::RegistrationRequest {
        crate::request::RegistrationRequest {
            bus_id: "0000:01:00.0".into(),
            pod_uid: "3afbda42-dabf-482d-962e-77bada079c54".into(),
            container_name: String::new(),
            container_id: "68ac51f4".into(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_register_over_unix_socket() {
        let (_dir, socket, manager) = serve(None);

        crate::client::register(&GrpcConnector::default(), &socket, registration())
            .await
            .unwrap();

        assert_eq!(
            *manager.paths.lock().unwrap(),
            vec!["/vcuda.VCUDAService/RegisterVDevice"]
        );
        assert_eq!(
            *manager.received.lock().unwrap(),
            vec![VDeviceRequest {
                bus_id: "0000:01:00.0".into(),
                pod_uid: "3afbda42-dabf-482d-962e-77bada079c54".into(),
                container_name: String::new(),
                container_id: "68ac51f4".into(),
            }]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_register_rejected_over_unix_socket() {
        let (_dir, socket, manager) =
            serve(Some(tonic::Status::failed_precondition("device busy")));

        let err = crate::client::register(&GrpcConnector::default(), &socket, registration())
            .await
            .unwrap_err();

        match err {
            crate::errors::Error::Registration { source } => {
                assert_eq!(source.code(), tonic::Code::FailedPrecondition);
                assert_eq!(source.message(), "device busy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(manager.received.lock().unwrap().len(), 1);
    }
}
