// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types surfaced by the SDK.
//!
//! There are three disjoint kinds of failure: the transport could not carry
//! the call ([`TransportError`]), a wire value did not have the expected
//! shape ([`CodecError`]), or the server refused the call
//! ([`ServerError`]). Each layer only produces its own kind; the others pass
//! through untouched.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::api_errors;
use crate::refs::TaskRef;
use crate::value::Value;
use crate::xml::XmlError;

/// Top-level error returned by every SDK entry point.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Server(#[from] ServerError),

    /// The session was never logged in, or has been logged out.
    #[error("session is not logged in")]
    NotLoggedIn,

    /// An asynchronous task ended in the `cancelled` state.
    #[error("task {task} was cancelled")]
    TaskCancelled { task: TaskRef },
}

impl Error {
    /// Returns the server error, if this is one.
    pub fn as_server(&self) -> Option<&ServerError> {
        match self {
            Error::Server(e) => Some(e),
            _ => None,
        }
    }

    /// True when the server returned the error code `code`.
    pub fn is_server_code(&self, code: &str) -> bool {
        self.as_server().is_some_and(|e| e.is(code))
    }
}

/// Failure to carry a call to the server and back.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("call to {method} timed out after {after:?}")]
    Timeout { method: String, after: Duration },

    #[error("server answered with HTTP status {status}")]
    Status { status: u16 },

    #[error("malformed XML-RPC message: {0}")]
    Protocol(#[from] XmlError),

    #[error("redirected more than once; last master reported was {master}")]
    TooManyRedirects { master: String },

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid CA certificate: {0}")]
    Certificate(#[source] reqwest::Error),
}

/// A wire value did not match the shape the schema expects.
///
/// The label names where in the call the offending value sat, e.g.
/// `VM.get_record -> VMRecord.memory_static_max`.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{label}: {kind}")]
pub struct CodecError {
    pub label: String,
    pub kind: CodecErrorKind,
}

impl CodecError {
    pub fn new(label: &str, kind: CodecErrorKind) -> Self {
        Self { label: label.to_string(), kind }
    }

    pub(crate) fn mismatch(
        label: &str,
        expected: &'static str,
        found: &Value,
    ) -> Self {
        Self::new(
            label,
            CodecErrorKind::TypeMismatch { expected, found: found.type_name() },
        )
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CodecErrorKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },

    #[error("integer {0} is outside the signed 64-bit range")]
    IntegerOutOfRange(String),

    #[error("{0:?} is not a decimal integer")]
    InvalidInteger(String),

    #[error("{0:?} is not a floating point number")]
    InvalidFloat(String),

    #[error("{0} cannot be represented as an XML-RPC double")]
    NonFiniteFloat(f64),

    #[error("{0:?} is not an ISO-8601 timestamp")]
    InvalidTimestamp(String),

    #[error("expected nil, found {0}")]
    UnexpectedResult(String),

    #[error("unrecognised label {0:?}")]
    UnknownLabel(String),

    #[error("malformed serialized value: {0}")]
    MalformedValue(String),
}

/// A structured error returned by the server.
///
/// `code` is the symbolic error code (e.g. `VM_BAD_POWER_STATE`) and
/// `params` its parameters, verbatim and in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerError {
    pub code: String,
    pub params: Vec<String>,
    /// The numeric XML-RPC `faultCode`, when the error arrived as a fault.
    pub fault_code: Option<i64>,
}

impl ServerError {
    pub fn new<S: Into<String>>(code: S, params: Vec<String>) -> Self {
        Self { code: code.into(), params, fault_code: None }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    /// Builds an error from a tagged string list: the code followed by its
    /// parameters. This is the shape of both `ErrorDescription` and a
    /// task's `error_info`.
    pub fn from_error_info<I, S>(info: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut info = info.into_iter().map(Into::into);
        let code = info
            .next()
            .unwrap_or_else(|| api_errors::INTERNAL_ERROR.to_string());
        Self::new(code, info.collect())
    }

    /// Interprets a tagged error list carried as a wire value. Non-string
    /// elements are rendered rather than rejected so that no part of the
    /// server's report is lost.
    fn from_description(description: &Value) -> Self {
        match description {
            Value::Array(items) => {
                Self::from_error_info(items.iter().map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }))
            }
            Value::String(code) => Self::new(code.clone(), Vec::new()),
            other => Self::new(
                api_errors::INTERNAL_ERROR,
                vec![format!("unrecognised error description: {other}")],
            ),
        }
    }

    /// Maps an XML-RPC `<fault>` payload.
    pub fn from_fault(fault: &Value) -> Self {
        let Some(members) = fault.as_struct() else {
            return Self::from_description(fault);
        };
        let mut error = match members.get("faultString") {
            Some(description) => Self::from_description(description),
            None => Self::new(api_errors::INTERNAL_ERROR, Vec::new()),
        };
        error.fault_code = match members.get("faultCode") {
            Some(Value::Int(code)) => Some(*code),
            Some(Value::String(code)) => code.trim().parse().ok(),
            _ => None,
        };
        error
    }

    /// Maps the `ErrorDescription` of a `Status: Failure` envelope.
    pub fn from_status_envelope(description: Option<&Value>) -> Self {
        match description {
            Some(description) => Self::from_description(description),
            None => Self::new(api_errors::INTERNAL_ERROR, Vec::new()),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server error {}", self.code)?;
        if !self.params.is_empty() {
            write!(f, " [{}]", self.params.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fault_with_tagged_array() {
        let fault: Value = [
            ("faultCode".to_string(), Value::Int(1)),
            (
                "faultString".to_string(),
                Value::from(vec![
                    "VM_BAD_POWER_STATE",
                    "OpaqueRef:vm1",
                    "halted",
                    "running",
                ]),
            ),
        ]
        .into_iter()
        .collect();
        let err = ServerError::from_fault(&fault);
        assert_eq!(err.code(), "VM_BAD_POWER_STATE");
        assert_eq!(err.params(), ["OpaqueRef:vm1", "halted", "running"]);
        assert_eq!(err.fault_code, Some(1));
        assert_eq!(
            err.to_string(),
            "server error VM_BAD_POWER_STATE [OpaqueRef:vm1, halted, running]"
        );
    }

    #[test]
    fn fault_with_plain_string() {
        let fault: Value = [
            ("faultCode".to_string(), Value::from("-1")),
            ("faultString".to_string(), Value::from("SESSION_INVALID")),
        ]
        .into_iter()
        .collect();
        let err = ServerError::from_fault(&fault);
        assert!(err.is(api_errors::SESSION_INVALID));
        assert!(err.params().is_empty());
        assert_eq!(err.fault_code, Some(-1));
    }

    #[test]
    fn empty_error_info_is_internal_error() {
        let err = ServerError::from_error_info(Vec::<String>::new());
        assert_eq!(err.code(), api_errors::INTERNAL_ERROR);
    }

    #[test]
    fn non_string_parameters_are_kept() {
        let err = ServerError::from_status_envelope(Some(&Value::Array(vec![
            Value::from("MEMORY_CONSTRAINT_VIOLATION"),
            Value::Int(42),
        ])));
        assert_eq!(err.params(), ["42"]);
    }
}
