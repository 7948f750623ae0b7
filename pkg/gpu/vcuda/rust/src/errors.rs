// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// A required piece of identification is empty. Raised before any dial.
    #[error("argument is empty: {what}")]
    MissingArgument { what: &'static str },

    #[error("can't dial {addr}")]
    Dial {
        addr: String,
        #[source]
        source: BoxError,
    },

    #[error("fail to get response from manager")]
    Registration {
        #[source]
        source: tonic::Status,
    },
}

impl Error {
    /// Stage of the registration flow that failed, for the top-level log line.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::MissingArgument { .. } => "validate",
            Error::Dial { .. } => "dial",
            Error::Registration { .. } => "register",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_registration_error_keeps_status() {
        let err = Error::Registration {
            source: tonic::Status::not_found("no such device"),
        };
        assert_eq!(err.stage(), "register");
        let source = err.source().unwrap();
        assert!(source.to_string().contains("no such device"));
    }

    #[test]
    fn test_missing_argument_message() {
        let err = Error::MissingArgument { what: "pod uid" };
        assert_eq!(err.to_string(), "argument is empty: pod uid");
        assert!(err.source().is_none());
    }
}
