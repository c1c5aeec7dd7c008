// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delivery of a single XML-RPC call.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, StatusCode};

use crate::endpoint::Endpoint;
use crate::error::{Error, ServerError, TransportError};
use crate::value::Value;
use crate::xml::{self, MethodResponse};

/// Carries one call to an endpoint and returns the server's result.
///
/// Implementations must be usable from many tasks at once. Server faults
/// come back as [`Error::Server`]; anything that kept the call from
/// completing is an [`Error::Transport`].
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(
        &self,
        endpoint: &Endpoint,
        method: &str,
        params: &[Value],
        timeout: Option<Duration>,
    ) -> Result<Value, Error>;
}

/// How server certificates are validated.
#[derive(Clone, Debug, Default)]
pub enum TlsPolicy {
    /// Validate against the built-in web PKI roots.
    #[default]
    Strict,
    /// Validate against exactly the given roots.
    CustomRoots(Vec<Certificate>),
    /// Accept any certificate. Only for development against hosts with
    /// self-signed certificates.
    Insecure,
}

/// Turns a decoded `methodResponse` into the call's result.
///
/// Besides plain XML-RPC faults, the management API may wrap its answer in
/// a status envelope, `{Status: "Success", Value: v}` or
/// `{Status: "Failure", ErrorDescription: [code, params..]}`; both are
/// unwrapped here so callers only ever see the value or a [`ServerError`].
/// A struct with any other member set is a result in its own right, even
/// if one of its keys is `Status`.
pub fn response_value(response: MethodResponse) -> Result<Value, Error> {
    match response {
        MethodResponse::Fault(fault) => {
            Err(ServerError::from_fault(&fault).into())
        }
        MethodResponse::Success(Value::Struct(mut members))
            if members.len() == 2 =>
        {
            let status = members.get("Status").and_then(Value::as_str);
            match status {
                Some("Success") if members.contains_key("Value") => {
                    Ok(members.remove("Value").unwrap_or(Value::Nil))
                }
                Some("Failure") if members.contains_key("ErrorDescription") => {
                    Err(ServerError::from_status_envelope(
                        members.get("ErrorDescription"),
                    )
                    .into())
                }
                _ => Ok(Value::Struct(members)),
            }
        }
        MethodResponse::Success(value) => Ok(value),
    }
}

/// XML-RPC over HTTP(S) using a pooled `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(tls: &TlsPolicy) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        match tls {
            TlsPolicy::Strict => {}
            TlsPolicy::CustomRoots(roots) => {
                builder = builder.tls_built_in_root_certs(false);
                for root in roots {
                    builder = builder.add_root_certificate(root.clone());
                }
            }
            TlsPolicy::Insecure => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }
        let client = builder.build().map_err(|e| match tls {
            TlsPolicy::CustomRoots(_) => TransportError::Certificate(e),
            _ => TransportError::Http(e),
        })?;
        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. one configured with a proxy.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn map_error(
        method: &str,
        timeout: Option<Duration>,
        e: reqwest::Error,
    ) -> TransportError {
        match timeout {
            Some(after) if e.is_timeout() => {
                TransportError::Timeout { method: method.to_string(), after }
            }
            _ => TransportError::Http(e),
        }
    }
}

#[async_trait::async_trait]
impl RpcTransport for HttpTransport {
    async fn call(
        &self,
        endpoint: &Endpoint,
        method: &str,
        params: &[Value],
        timeout: Option<Duration>,
    ) -> Result<Value, Error> {
        let body = xml::encode_call(method, params);
        let mut request = self
            .client
            .post(endpoint.url())
            .header(CONTENT_TYPE, "text/xml")
            .body(body);
        if let Some(timeout) = timeout {
            // An expired request is aborted and its connection dropped
            // rather than returned to the pool.
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::map_error(method, timeout, e))?;
        if response.status() != StatusCode::OK {
            return Err(TransportError::Status {
                status: response.status().as_u16(),
            }
            .into());
        }
        let text = response
            .text()
            .await
            .map_err(|e| Self::map_error(method, timeout, e))?;
        let parsed = xml::parse_response(&text).map_err(TransportError::from)?;
        response_value(parsed)
    }
}

/// A call observed by [`MockTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub method: String,
    pub params: Vec<Value>,
    /// The deadline the call was issued with.
    pub timeout: Option<Duration>,
}

type Handler =
    dyn Fn(&RecordedCall) -> Result<Value, Error> + Send + Sync + 'static;

/// An in-memory transport that answers every call through a closure and
/// records what it was asked.
///
/// This is primarily intended for testing code built on the SDK without a
/// live server.
#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedCall) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self { handler: Arc::new(handler), calls: Arc::default() }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl RpcTransport for MockTransport {
    async fn call(
        &self,
        endpoint: &Endpoint,
        method: &str,
        params: &[Value],
        timeout: Option<Duration>,
    ) -> Result<Value, Error> {
        let call = RecordedCall {
            endpoint: endpoint.clone(),
            method: method.to_string(),
            params: params.to_vec(),
            timeout,
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }
        (self.handler)(&call)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn envelope(members: Vec<(&str, Value)>) -> MethodResponse {
        MethodResponse::Success(
            members.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        )
    }

    #[test]
    fn status_envelope_success_is_unwrapped() {
        let v = response_value(envelope(vec![
            ("Status", Value::from("Success")),
            ("Value", Value::from("OpaqueRef:abc123")),
        ]))
        .unwrap();
        assert_eq!(v, Value::from("OpaqueRef:abc123"));

        let v = response_value(envelope(vec![
            ("Status", Value::from("Success")),
            ("Value", Value::Nil),
        ]))
        .unwrap();
        assert!(v.is_nil());
    }

    #[test]
    fn maps_with_a_status_key_are_not_envelopes() {
        for members in [
            vec![("Status", Value::from("Success"))],
            vec![("Status", "Success".into()), ("owner", "alice".into())],
            vec![("Status", "Failure".into()), ("Value", "x".into())],
            vec![
                ("Status", "Success".into()),
                ("Value", "x".into()),
                ("owner", "alice".into()),
            ],
        ] {
            let expected: Value = members
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            let out = response_value(envelope(members)).unwrap();
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn status_envelope_failure_is_a_server_error() {
        let err = response_value(envelope(vec![
            ("Status", Value::from("Failure")),
            (
                "ErrorDescription",
                Value::from(vec!["HOST_IS_SLAVE", "hostB.example"]),
            ),
        ]))
        .unwrap_err();
        let server = err.as_server().unwrap();
        assert_eq!(server.code(), "HOST_IS_SLAVE");
        assert_eq!(server.params(), ["hostB.example"]);
    }

    #[test]
    fn plain_values_pass_through() {
        let record = envelope(vec![("Status", Value::from("running"))]);
        assert!(response_value(record).unwrap().as_struct().is_some());
        assert_eq!(
            response_value(MethodResponse::Success(Value::Int(1))).unwrap(),
            Value::Int(1)
        );
    }

    #[tokio::test]
    async fn mock_records_calls() {
        let mock = MockTransport::new(|call| {
            Ok(Value::from(format!("{} {}", call.method, call.params.len())))
        });
        let ep = Endpoint::https("hostA.example");
        let out = mock
            .call(&ep, "VM.get_all", &[Value::from("OpaqueRef:s")], None)
            .await
            .unwrap();
        assert_eq!(out, Value::from("VM.get_all 1"));
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].endpoint, ep);
        assert_eq!(calls[0].params, vec![Value::from("OpaqueRef:s")]);
    }

    #[test]
    fn custom_roots_and_insecure_clients_build() {
        HttpTransport::new(&TlsPolicy::Strict).unwrap();
        HttpTransport::new(&TlsPolicy::CustomRoots(Vec::new())).unwrap();
        HttpTransport::new(&TlsPolicy::Insecure).unwrap();
    }
}
