// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call dispatch against the pool's active endpoint, including master
//! redirection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use slog::{debug, warn, Logger};

use crate::api_errors;
use crate::config::ClientOpts;
use crate::endpoint::Endpoint;
use crate::error::{Error, TransportError};
use crate::transport::{HttpTransport, RpcTransport};
use crate::value::Value;

/// A transport bound to a pool.
///
/// The active endpoint starts as the configured one and moves when a host
/// reports that it is not the master. Calls already in flight keep the
/// endpoint they captured; only calls started after the swap see the new
/// one.
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    endpoint: RwLock<Arc<Endpoint>>,
    /// Bumped on every redirect, so sessions can tell whether the master
    /// moved since they logged in.
    generation: AtomicU64,
    timeout: Option<Duration>,
    log: Logger,
}

impl RpcClient {
    /// Builds a client that speaks HTTP(S) with the configured TLS policy.
    pub fn new(opts: ClientOpts) -> Result<Self, Error> {
        let transport = HttpTransport::new(&opts.tls)?;
        Ok(Self::with_transport(Arc::new(transport), opts))
    }

    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        opts: ClientOpts,
    ) -> Self {
        let log = opts.log.new(slog::o!("component" => "xenapi-client"));
        Self {
            transport,
            endpoint: RwLock::new(Arc::new(opts.endpoint)),
            generation: AtomicU64::new(0),
            timeout: opts.timeout,
            log,
        }
    }

    pub fn endpoint(&self) -> Arc<Endpoint> {
        let guard = self.endpoint.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn log(&self) -> &Logger {
        &self.log
    }

    /// Issues `method` with fully encoded `params` using the client's
    /// default deadline.
    pub async fn call(
        &self,
        method: &str,
        params: &[Value],
    ) -> Result<Value, Error> {
        self.call_with_timeout(method, params, self.timeout).await
    }

    /// Issues `method`, following at most one master redirect.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: &[Value],
        timeout: Option<Duration>,
    ) -> Result<Value, Error> {
        let endpoint = self.endpoint();
        let first = self.dispatch(&endpoint, method, params, timeout).await;
        let master = match first {
            Err(Error::Server(e)) if e.is(api_errors::HOST_IS_SLAVE) => {
                match e.params().first() {
                    Some(master) if !master.is_empty() => master.clone(),
                    _ => return Err(Error::Server(e)),
                }
            }
            other => return other,
        };

        let target = self.redirect(&endpoint, &master);
        match self.dispatch(&target, method, params, timeout).await {
            Err(Error::Server(e)) if e.is(api_errors::HOST_IS_SLAVE) => {
                Err(TransportError::TooManyRedirects {
                    master: e.params().first().cloned().unwrap_or(master),
                }
                .into())
            }
            other => other,
        }
    }

    /// Issues `method` against exactly the current endpoint. A slave
    /// reporting its master is returned to the caller as a server error.
    pub async fn call_direct(
        &self,
        method: &str,
        params: &[Value],
        timeout: Option<Duration>,
    ) -> Result<Value, Error> {
        let endpoint = self.endpoint();
        self.dispatch(&endpoint, method, params, timeout).await
    }

    async fn dispatch(
        &self,
        endpoint: &Endpoint,
        method: &str,
        params: &[Value],
        timeout: Option<Duration>,
    ) -> Result<Value, Error> {
        let start = Instant::now();
        let call = self.transport.call(endpoint, method, params, timeout);
        let result = match timeout {
            Some(after) => match tokio::time::timeout(after, call).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout {
                    method: method.to_string(),
                    after,
                }
                .into()),
            },
            None => call.await,
        };
        debug!(self.log, "call";
            "method" => method,
            "endpoint" => %endpoint,
            "elapsed" => ?start.elapsed(),
            "ok" => result.is_ok(),
        );
        result
    }

    /// Points the client at the master reported by `from`. If another call
    /// already moved the endpoint, that swap is kept.
    fn redirect(&self, from: &Endpoint, master: &str) -> Arc<Endpoint> {
        let target = Arc::new(from.with_host(master));
        let mut guard =
            self.endpoint.write().unwrap_or_else(|e| e.into_inner());
        if **guard == *from {
            warn!(self.log, "redirected to pool master";
                "from" => %from.host,
                "to" => %target.host,
            );
            *guard = Arc::clone(&target);
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        target
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint())
            .field("generation", &self.generation())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ServerError;
    use crate::transport::MockTransport;
    use slog::Drain;

    fn test_logger() -> Logger {
        let dec =
            slog_term::PlainSyncDecorator::new(slog_term::TestStdoutWriter);
        let drain = slog_term::FullFormat::new(dec).build().fuse();
        Logger::root(drain, slog::o!("component" => "rpc-test"))
    }

    fn slave_of(master: &'static str, host: &'static str) -> MockTransport {
        MockTransport::new(move |call| {
            if call.endpoint.host == host {
                Err(ServerError::new(
                    api_errors::HOST_IS_SLAVE,
                    vec![master.to_string()],
                )
                .into())
            } else {
                Ok(Value::from(call.endpoint.host.as_str()))
            }
        })
    }

    #[tokio::test]
    async fn redirect_moves_the_endpoint_once() {
        let mock = slave_of("hostB.example", "hostA.example");
        let opts = ClientOpts::new(Endpoint::new("hostA.example", 8443, true))
            .with_log(test_logger());
        let client = RpcClient::with_transport(Arc::new(mock.clone()), opts);

        let out = client.call("pool.get_all", &[]).await.unwrap();
        assert_eq!(out, Value::from("hostB.example"));
        assert_eq!(client.endpoint().host, "hostB.example");
        assert_eq!(client.endpoint().port, 8443);
        assert_eq!(client.generation(), 1);

        // Subsequent calls go straight to the master.
        client.call("pool.get_all", &[]).await.unwrap();
        let hosts: Vec<_> =
            mock.calls().into_iter().map(|c| c.endpoint.host).collect();
        assert_eq!(hosts, ["hostA.example", "hostB.example", "hostB.example"]);
    }

    #[tokio::test]
    async fn second_redirect_is_an_error() {
        let mock = MockTransport::new(|call| {
            let next = format!("{}x", call.endpoint.host);
            Err(ServerError::new(api_errors::HOST_IS_SLAVE, vec![next]).into())
        });
        let client = RpcClient::with_transport(
            Arc::new(mock.clone()),
            ClientOpts::new(Endpoint::https("a")),
        );
        let err = client.call("VM.get_all", &[]).await.unwrap_err();
        match err {
            Error::Transport(TransportError::TooManyRedirects { master }) => {
                assert_eq!(master, "axx")
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn redirect_without_a_master_is_returned_verbatim() {
        let mock = MockTransport::new(|_| {
            Err(ServerError::new(api_errors::HOST_IS_SLAVE, vec![]).into())
        });
        let client = RpcClient::with_transport(
            Arc::new(mock),
            ClientOpts::new(Endpoint::https("a")),
        );
        let err = client.call("VM.get_all", &[]).await.unwrap_err();
        assert!(err.is_server_code(api_errors::HOST_IS_SLAVE));
    }

    #[tokio::test]
    async fn direct_calls_are_not_redirected() {
        let mock = slave_of("hostB.example", "hostA.example");
        let client = RpcClient::with_transport(
            Arc::new(mock),
            ClientOpts::new(Endpoint::https("hostA.example")),
        );
        let err = client
            .call_direct("session.slave_local_login_with_password", &[], None)
            .await
            .unwrap_err();
        assert!(err.is_server_code(api_errors::HOST_IS_SLAVE));
        assert_eq!(client.endpoint().host, "hostA.example");
        assert_eq!(client.generation(), 0);
    }
}
