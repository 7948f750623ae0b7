// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Wire types and client stub for the `vcuda.VCUDAService` gRPC service.
//!
//! Kept in sync by hand with `proto/vcuda.proto`: the service has a single
//! unary method, so the crate does not need `protoc` at build time.

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct VDeviceRequest {
    #[prost(string, tag = "1")]
    pub bus_id: String,
    #[prost(string, tag = "2")]
    pub pod_uid: String,
    #[prost(string, tag = "3")]
    pub container_name: String,
    #[prost(string, tag = "4")]
    pub container_id: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, prost::Message)]
pub struct VDeviceResponse {}

pub mod vcuda_service_client {
    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::codegen::{Body, Bytes, GrpcMethod, StdError};

    const SERVICE: &str = "vcuda.VCUDAService";
    const REGISTER_V_DEVICE: &str = "/vcuda.VCUDAService/RegisterVDevice";

    #[derive(Debug, Clone)]
    pub struct VcudaServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> VcudaServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            Self {
                inner: tonic::client::Grpc::new(inner),
            }
        }

        pub async fn register_v_device(
            &mut self,
            request: impl tonic::IntoRequest<super::VDeviceRequest>,
        ) -> Result<tonic::Response<super::VDeviceResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = PathAndQuery::from_static(REGISTER_V_DEVICE);
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new(SERVICE, "RegisterVDevice"));
            self.inner.unary(req, path, codec).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_request_field_tags() {
        let req = VDeviceRequest {
            bus_id: "a".into(),
            pod_uid: "b".into(),
            container_name: String::new(),
            container_id: "d".into(),
        };
        // proto3 omits empty strings; each present field is tag<<3|2, len, byte.
        assert_eq!(
            req.encode_to_vec(),
            vec![0x0a, 1, b'a', 0x12, 1, b'b', 0x22, 1, b'd']
        );
    }

    #[test]
    fn test_empty_response_decodes() {
        assert_eq!(
            VDeviceResponse::decode(&[][..]).unwrap(),
            VDeviceResponse {}
        );
    }
}
