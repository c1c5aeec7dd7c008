// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated sessions.
//!
//! A [`Session`] holds the session ref issued by the server and sends it as
//! the first argument of every call. Clones share the same login, so one
//! session can be used from many tasks at once.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use slog::{info, warn, Logger};

use crate::api_errors;
use crate::api_version::ApiVersion;
use crate::classes::{Host, Pool};
use crate::codec::{Codec, Timestamp, ToWire};
use crate::config::{ClientOpts, LoginConfig};
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::macros::define_record;
use crate::refs::{HostRef, SessionRef, SubjectRef, TaskRef, UserRef};
use crate::rpc::RpcClient;
use crate::transport::RpcTransport;
use crate::value::Value;

/// Version string sent at login when the caller has no better one.
pub const CLIENT_VERSION: &str = "1.0";

/// Originator sent at login when the caller has no better one.
pub const DEFAULT_ORIGINATOR: &str = "xenapi-client";

define_record! {
    /// A session as the server sees it.
    pub struct SessionRecord = "session" {
        pub uuid: String,
        pub this_host: HostRef,
        pub this_user: UserRef,
        pub last_active: Timestamp,
        /// True for intra-pool logins.
        pub pool: bool,
        pub other_config: BTreeMap<String, String>,
        pub is_local_superuser: bool,
        pub subject: SubjectRef,
        pub validation_time: Timestamp,
        pub auth_user_sid: String,
        pub auth_user_name: String,
        pub rbac_permissions: BTreeSet<String>,
        pub tasks: BTreeSet<TaskRef>,
        pub parent: SessionRef,
        pub originator: String,
        pub client_certificate: bool,
    }
}

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
    version: String,
    originator: String,
}

#[derive(Default)]
struct State {
    session_ref: Option<SessionRef>,
    /// Redirect generation of the client when this login happened.
    generation: u64,
    /// Kept for password logins only, to log in again after the pool
    /// master moves.
    credentials: Option<Credentials>,
    api_version: Option<ApiVersion>,
    xapi_version: Option<String>,
}

struct Inner {
    client: Arc<RpcClient>,
    state: RwLock<State>,
    relogin: tokio::sync::Mutex<()>,
}

/// An authenticated handle on a pool.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
    timeout: Option<Duration>,
}

impl Session {
    /// A session speaking HTTP(S) to the configured endpoint. It is not
    /// logged in yet.
    pub fn new(opts: ClientOpts) -> Result<Self, Error> {
        Ok(Self::from_client(Arc::new(RpcClient::new(opts)?)))
    }

    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        opts: ClientOpts,
    ) -> Self {
        Self::from_client(Arc::new(RpcClient::with_transport(transport, opts)))
    }

    /// A session sharing `client`, and therefore its active endpoint, with
    /// other sessions.
    pub fn from_client(client: Arc<RpcClient>) -> Self {
        let timeout = client.default_timeout();
        Self {
            inner: Arc::new(Inner {
                client,
                state: RwLock::new(State::default()),
                relogin: tokio::sync::Mutex::new(()),
            }),
            timeout,
        }
    }

    /// Adopts a session ref obtained elsewhere. Such a session is never
    /// logged in again transparently.
    pub fn resume(client: Arc<RpcClient>, session_ref: SessionRef) -> Self {
        let session = Self::from_client(client);
        {
            let mut state = session.write_state();
            state.generation = session.inner.client.generation();
            state.session_ref = Some(session_ref);
        }
        session
    }

    /// A handle on the same login whose calls use `timeout` as deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self { inner: Arc::clone(&self.inner), timeout: Some(timeout) }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn client(&self) -> &Arc<RpcClient> {
        &self.inner.client
    }

    pub fn endpoint(&self) -> Arc<Endpoint> {
        self.inner.client.endpoint()
    }

    pub fn log(&self) -> &Logger {
        self.inner.client.log()
    }

    pub fn session_ref(&self) -> Option<SessionRef> {
        self.read_state().session_ref.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.read_state().session_ref.is_some()
    }

    /// The API version found by [`Session::detect_api_version`], if it has
    /// run.
    pub fn api_version(&self) -> Option<ApiVersion> {
        self.read_state().api_version
    }

    /// The master's `xapi` software version, if detected.
    pub fn xapi_version(&self) -> Option<String> {
        self.read_state().xapi_version.clone()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Logs in with a user name and password. A non-master host answers
    /// with the master's address; the login then follows it once.
    pub async fn login_with_password(
        &self,
        username: &str,
        password: &str,
        version: &str,
        originator: &str,
    ) -> Result<SessionRef, Error> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
            version: version.to_string(),
            originator: originator.to_string(),
        };
        self.password_login(credentials).await
    }

    /// Logs in with the `[login]` table of a configuration file.
    pub async fn login_with_config(
        &self,
        login: &LoginConfig,
    ) -> Result<SessionRef, Error> {
        self.login_with_password(
            &login.username,
            &login.password,
            CLIENT_VERSION,
            login.originator.as_deref().unwrap_or(DEFAULT_ORIGINATOR),
        )
        .await
    }

    async fn password_login(
        &self,
        credentials: Credentials,
    ) -> Result<SessionRef, Error> {
        const METHOD: &str = "session.login_with_password";
        let params = vec![
            credentials.username.to_wire("session.login_with_password(uname)")?,
            credentials.password.to_wire("session.login_with_password(pwd)")?,
            credentials
                .version
                .to_wire("session.login_with_password(version)")?,
            credentials
                .originator
                .to_wire("session.login_with_password(originator)")?,
        ];
        let result = self
            .inner
            .client
            .call_with_timeout(METHOD, &params, self.timeout)
            .await?;
        let session_ref =
            SessionRef::decode("session.login_with_password -> ", &result)?;

        info!(self.log(), "logged in";
            "endpoint" => %self.endpoint(),
            "user" => &credentials.username,
            "originator" => &credentials.originator,
        );
        let mut state = self.write_state();
        state.session_ref = Some(session_ref.clone());
        state.generation = self.inner.client.generation();
        state.credentials = Some(credentials);
        Ok(session_ref)
    }

    /// Logs in to the host the session points at even when it is not the
    /// master. The resulting session is only good on that host, so it is
    /// never redirected.
    pub async fn slave_local_login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionRef, Error> {
        let params = vec![
            username.to_wire("session.slave_local_login_with_password(uname)")?,
            password.to_wire("session.slave_local_login_with_password(pwd)")?,
        ];
        let result = self
            .inner
            .client
            .call_direct(
                "session.slave_local_login_with_password",
                &params,
                self.timeout,
            )
            .await?;
        let session_ref = SessionRef::decode(
            "session.slave_local_login_with_password -> ",
            &result,
        )?;

        info!(self.log(), "logged in locally";
            "endpoint" => %self.endpoint(),
            "user" => username,
        );
        let mut state = self.write_state();
        state.session_ref = Some(session_ref.clone());
        state.generation = self.inner.client.generation();
        state.credentials = None;
        Ok(session_ref)
    }

    /// Ends the session. The handle is unusable afterwards even if the
    /// server reported an error.
    pub async fn logout(&self) -> Result<(), Error> {
        self.end("session.logout").await
    }

    /// Ends a session obtained with
    /// [`Session::slave_local_login_with_password`].
    pub async fn local_logout(&self) -> Result<(), Error> {
        self.end("session.local_logout").await
    }

    async fn end(&self, method: &'static str) -> Result<(), Error> {
        let session_ref = self.current()?.0;
        let result = self
            .inner
            .client
            .call_with_timeout(
                method,
                &[Value::String(session_ref.as_str().to_string())],
                self.timeout,
            )
            .await;
        {
            let mut state = self.write_state();
            state.session_ref = None;
            state.credentials = None;
        }
        info!(self.log(), "logged out"; "endpoint" => %self.endpoint());
        let label = if method == "session.logout" {
            "session.logout -> "
        } else {
            "session.local_logout -> "
        };
        Ok(<()>::decode(label, &result?)?)
    }

    fn current(&self) -> Result<(SessionRef, u64), Error> {
        let state = self.read_state();
        match &state.session_ref {
            Some(session_ref) => Ok((session_ref.clone(), state.generation)),
            None => Err(Error::NotLoggedIn),
        }
    }

    /// Issues `method` with the session ref prepended to `args`.
    ///
    /// If the call is rejected with `SESSION_INVALID` after the pool master
    /// moved since this session logged in, the session logs in again with
    /// its stored credentials and the call is retried once.
    pub async fn call(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, Error> {
        let (session_ref, generation) = self.current()?;
        let mut params = Vec::with_capacity(args.len() + 1);
        params.push(Value::String(session_ref.into_inner()));
        params.extend(args);

        let client = &self.inner.client;
        let result =
            client.call_with_timeout(method, &params, self.timeout).await;
        let retry = match &result {
            Err(e) => {
                e.is_server_code(api_errors::SESSION_INVALID)
                    && client.generation() != generation
                    && self.has_credentials()
            }
            Ok(_) => false,
        };
        if !retry {
            return result;
        }

        let session_ref = self.relogin(generation).await?;
        params[0] = Value::String(session_ref.into_inner());
        client.call_with_timeout(method, &params, self.timeout).await
    }

    fn has_credentials(&self) -> bool {
        self.read_state().credentials.is_some()
    }

    /// Issues `method` and decodes its result as `T`.
    pub(crate) async fn invoke<T: Codec>(
        &self,
        method: &str,
        args: Vec<Value>,
        result_label: &str,
    ) -> Result<T, Error> {
        let result = self.call(method, args).await?;
        Ok(T::decode(result_label, &result)?)
    }

    /// Logs in again unless another caller already did so since the login
    /// of `generation`.
    async fn relogin(&self, generation: u64) -> Result<SessionRef, Error> {
        let _guard = self.inner.relogin.lock().await;
        let credentials = {
            let state = self.read_state();
            if state.generation != generation {
                if let Some(session_ref) = &state.session_ref {
                    return Ok(session_ref.clone());
                }
            }
            state.credentials.clone().ok_or(Error::NotLoggedIn)?
        };
        warn!(
            self.log(),
            "session invalidated by master change, logging in again";
            "endpoint" => %self.endpoint(),
            "user" => &credentials.username,
        );
        self.password_login(credentials).await
    }

    /// Reads the pool master's version information and caches it on the
    /// session.
    pub async fn detect_api_version(&self) -> Result<ApiVersion, Error> {
        let pools = Pool::get_all(self).await?;
        let (version, xapi) = match pools.first() {
            Some(pool) => {
                let master = Pool::get_master(self, pool).await?;
                let host = Host::get_record(self, &master).await?;
                (
                    ApiVersion::from_major_minor(
                        host.api_version_major,
                        host.api_version_minor,
                    ),
                    host.software_version.get("xapi").cloned(),
                )
            }
            None => (ApiVersion::Unknown, None),
        };
        let mut state = self.write_state();
        state.api_version = Some(version);
        state.xapi_version = xapi;
        Ok(version)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        let args = vec![
            old_password.to_wire("session.change_password(old_pwd)")?,
            new_password.to_wire("session.change_password(new_pwd)")?,
        ];
        self.invoke::<()>(
            "session.change_password",
            args,
            "session.change_password -> ",
        )
        .await?;
        // Keep transparent re-login working with the new password.
        if let Some(credentials) = self.write_state().credentials.as_mut() {
            credentials.password = new_password.to_string();
        }
        Ok(())
    }

    pub async fn get_all_subject_identifiers(
        &self,
    ) -> Result<Vec<String>, Error> {
        self.invoke(
            "session.get_all_subject_identifiers",
            Vec::new(),
            "session.get_all_subject_identifiers -> ",
        )
        .await
    }

    pub async fn async_get_all_subject_identifiers(
        &self,
    ) -> Result<TaskRef, Error> {
        self.invoke(
            "Async.session.get_all_subject_identifiers",
            Vec::new(),
            "Async.session.get_all_subject_identifiers -> ",
        )
        .await
    }

    /// Logs out every session of a subject except this one.
    pub async fn logout_subject_identifier(
        &self,
        subject_identifier: &str,
    ) -> Result<(), Error> {
        let args = vec![subject_identifier
            .to_wire("session.logout_subject_identifier(subject_identifier)")?];
        self.invoke(
            "session.logout_subject_identifier",
            args,
            "session.logout_subject_identifier -> ",
        )
        .await
    }

    pub async fn async_logout_subject_identifier(
        &self,
        subject_identifier: &str,
    ) -> Result<TaskRef, Error> {
        let args = vec![subject_identifier.to_wire(
            "Async.session.logout_subject_identifier(subject_identifier)",
        )?];
        self.invoke(
            "Async.session.logout_subject_identifier",
            args,
            "Async.session.logout_subject_identifier -> ",
        )
        .await
    }
}

// Accessors of the session class. They take the session to inspect as an
// explicit argument, which need not be this one.
macro_rules! session_getters {
    ($($name:ident -> $ret:ty;)+) => {
        impl Session {
            $(
                pub async fn $name(
                    &self,
                    this: &SessionRef,
                ) -> Result<$ret, Error> {
                    let args = vec![this.to_wire(concat!(
                        "session.", stringify!($name), "(self)"
                    ))?];
                    self.invoke(
                        concat!("session.", stringify!($name)),
                        args,
                        concat!("session.", stringify!($name), " -> "),
                    )
                    .await
                }
            )+
        }
    };
}

session_getters! {
    get_record -> SessionRecord;
    get_uuid -> String;
    get_this_host -> HostRef;
    get_this_user -> UserRef;
    get_last_active -> Timestamp;
    get_pool -> bool;
    get_other_config -> BTreeMap<String, String>;
    get_is_local_superuser -> bool;
    get_subject -> SubjectRef;
    get_validation_time -> Timestamp;
    get_auth_user_sid -> String;
    get_auth_user_name -> String;
    get_rbac_permissions -> BTreeSet<String>;
    get_tasks -> BTreeSet<TaskRef>;
    get_parent -> SessionRef;
    get_originator -> String;
    get_client_certificate -> bool;
}

impl Session {
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<SessionRef, Error> {
        let args = vec![uuid.to_wire("session.get_by_uuid(uuid)")?];
        self.invoke("session.get_by_uuid", args, "session.get_by_uuid -> ")
            .await
    }

    pub async fn set_other_config(
        &self,
        this: &SessionRef,
        value: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let args = vec![
            this.to_wire("session.set_other_config(self)")?,
            value.to_wire("session.set_other_config(value)")?,
        ];
        self.invoke(
            "session.set_other_config",
            args,
            "session.set_other_config -> ",
        )
        .await
    }

    pub async fn add_to_other_config(
        &self,
        this: &SessionRef,
        key: &str,
        value: &str,
    ) -> Result<(), Error> {
        let args = vec![
            this.to_wire("session.add_to_other_config(self)")?,
            key.to_wire("session.add_to_other_config(key)")?,
            value.to_wire("session.add_to_other_config(value)")?,
        ];
        self.invoke(
            "session.add_to_other_config",
            args,
            "session.add_to_other_config -> ",
        )
        .await
    }

    pub async fn remove_from_other_config(
        &self,
        this: &SessionRef,
        key: &str,
    ) -> Result<(), Error> {
        let args = vec![
            this.to_wire("session.remove_from_other_config(self)")?,
            key.to_wire("session.remove_from_other_config(key)")?,
        ];
        self.invoke(
            "session.remove_from_other_config",
            args,
            "session.remove_from_other_config -> ",
        )
        .await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint())
            .field("session_ref", &state.session_ref)
            .field("api_version", &state.api_version)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ServerError;
    use crate::transport::MockTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session_with(mock: &MockTransport, host: &str) -> Session {
        Session::with_transport(
            Arc::new(mock.clone()),
            ClientOpts::new(Endpoint::https(host)),
        )
    }

    #[tokio::test]
    async fn calls_need_a_login() {
        let mock = MockTransport::new(|_| Ok(Value::Nil));
        let session = session_with(&mock, "hostA.example");
        let err = session.call("VM.get_all", Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotLoggedIn));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn login_and_logout() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s1".into()),
            _ => Ok(Value::from("")),
        });
        let session = session_with(&mock, "hostA.example");
        let r = session
            .login_with_password("root", "pw", CLIENT_VERSION, "test")
            .await
            .unwrap();
        assert_eq!(r.as_str(), "OpaqueRef:s1");
        assert!(session.is_logged_in());

        // Clones share the login.
        let clone = session.clone();
        clone.logout().await.unwrap();
        assert!(!session.is_logged_in());

        let calls = mock.calls();
        assert_eq!(
            calls[0].params,
            vec![
                Value::from("root"),
                Value::from("pw"),
                Value::from("1.0"),
                Value::from("test"),
            ]
        );
        assert_eq!(calls[1].method, "session.logout");
        assert_eq!(calls[1].params, vec![Value::from("OpaqueRef:s1")]);
    }

    #[tokio::test]
    async fn logout_forgets_the_ref_even_on_error() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s1".into()),
            _ => Err(ServerError::new(api_errors::SESSION_INVALID, vec![
                "OpaqueRef:s1".to_string(),
            ])
            .into()),
        });
        let session = session_with(&mock, "a");
        session.login_with_password("u", "p", "1.0", "o").await.unwrap();
        assert!(session.logout().await.is_err());
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn session_is_invalid_after_master_move_logs_in_again() {
        // hostA was the master when the session was created. It then
        // became a slave; the session ref is unknown to the new master.
        let logins = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&logins);
        let mock = MockTransport::new(move |call| {
            let host = call.endpoint.host.as_str();
            match (host, call.method.as_str()) {
                ("hostA.example", "session.login_with_password") => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("OpaqueRef:old".into())
                }
                ("hostA.example", _) => Err(ServerError::new(
                    api_errors::HOST_IS_SLAVE,
                    vec!["hostB.example".to_string()],
                )
                .into()),
                ("hostB.example", "session.login_with_password") => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("OpaqueRef:new".into())
                }
                (_, _) if call.params[0] == Value::from("OpaqueRef:new") => {
                    Ok(Value::from(vec!["OpaqueRef:vm1"]))
                }
                _ => Err(ServerError::new(
                    api_errors::SESSION_INVALID,
                    vec!["OpaqueRef:old".to_string()],
                )
                .into()),
            }
        });
        let session = session_with(&mock, "hostA.example");
        session.login_with_password("root", "pw", "1.0", "t").await.unwrap();

        let out = session.call("VM.get_all", Vec::new()).await.unwrap();
        assert_eq!(out, Value::from(vec!["OpaqueRef:vm1"]));
        assert_eq!(logins.load(Ordering::SeqCst), 2);
        assert_eq!(session.session_ref().unwrap().as_str(), "OpaqueRef:new");

        let methods: Vec<_> = mock
            .calls()
            .into_iter()
            .map(|c| format!("{} {}", c.endpoint.host, c.method))
            .collect();
        assert_eq!(
            methods,
            [
                "hostA.example session.login_with_password",
                "hostA.example VM.get_all",
                "hostB.example VM.get_all",
                "hostB.example session.login_with_password",
                "hostB.example VM.get_all",
            ]
        );
    }

    #[tokio::test]
    async fn session_invalid_without_master_move_is_returned() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            _ => Err(ServerError::new(api_errors::SESSION_INVALID, vec![
                "OpaqueRef:s".to_string(),
            ])
            .into()),
        });
        let session = session_with(&mock, "a");
        session.login_with_password("u", "p", "1.0", "o").await.unwrap();
        let err = session.call("VM.get_all", Vec::new()).await.unwrap_err();
        assert!(err.is_server_code(api_errors::SESSION_INVALID));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn slave_local_login_is_not_redirected() {
        let mock = MockTransport::new(|call| {
            match call.method.as_str() {
                "session.slave_local_login_with_password" => {
                    Ok("OpaqueRef:local".into())
                }
                _ => Ok(Value::from("")),
            }
        });
        let session = session_with(&mock, "slave.example");
        session
            .slave_local_login_with_password("root", "pw")
            .await
            .unwrap();
        session.local_logout().await.unwrap();
        let calls = mock.calls();
        assert_eq!(calls[0].params.len(), 2);
        assert_eq!(calls[1].method, "session.local_logout");
    }

    #[tokio::test]
    async fn session_getters_pass_the_inspected_session() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:me".into()),
            "session.get_record" => Ok([
                ("uuid".to_string(), Value::from("u-1")),
                ("originator".to_string(), Value::from("test")),
                ("rbac_permissions".to_string(), Value::from(vec!["vm.start"])),
                ("bogus".to_string(), Value::Int(0)),
            ]
            .into_iter()
            .collect()),
            _ => Ok(Value::Boolean(true)),
        });
        let session = session_with(&mock, "a");
        let me =
            session.login_with_password("u", "p", "1.0", "o").await.unwrap();

        let record = session.get_record(&me).await.unwrap();
        assert_eq!(record.uuid, "u-1");
        assert_eq!(record.originator, "test");
        assert_eq!(
            record.rbac_permissions,
            BTreeSet::from(["vm.start".to_string()])
        );
        assert!(record.this_host.is_null());
        assert!(session.get_is_local_superuser(&me).await.unwrap());

        let calls = mock.calls();
        assert_eq!(calls[1].method, "session.get_record");
        assert_eq!(
            calls[1].params,
            vec![Value::from("OpaqueRef:me"), Value::from("OpaqueRef:me")]
        );
    }

    #[tokio::test]
    async fn detect_api_version_reads_the_master() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "pool.get_all" => Ok(Value::from(vec!["OpaqueRef:pool"])),
            "pool.get_master" => Ok("OpaqueRef:master".into()),
            "host.get_record" => {
                let version: Value =
                    [("xapi".to_string(), Value::from("24.19.1"))]
                        .into_iter()
                        .collect();
                Ok([
                    ("API_version_major".to_string(), Value::from("2")),
                    ("API_version_minor".to_string(), Value::from("21")),
                    ("software_version".to_string(), version),
                ]
                .into_iter()
                .collect())
            }
            other => panic!("unexpected call {other}"),
        });
        let session = session_with(&mock, "a");
        assert_eq!(session.api_version(), None);
        session.login_with_password("u", "p", "1.0", "o").await.unwrap();
        let version = session.detect_api_version().await.unwrap();
        assert_eq!(version, ApiVersion::V2_21);
        assert_eq!(session.api_version(), Some(ApiVersion::V2_21));
        assert_eq!(session.xapi_version().as_deref(), Some("24.19.1"));
    }

    #[tokio::test]
    async fn change_password_updates_the_stored_credentials() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "session.change_password" => Ok(Value::Nil),
            other => panic!("unexpected call {other}"),
        });
        let session = session_with(&mock, "a");
        session.login_with_password("u", "old", "1.0", "o").await.unwrap();
        session.change_password("old", "new").await.unwrap();

        let calls = mock.calls();
        assert_eq!(
            calls[1].params,
            vec![Value::from("OpaqueRef:s"), "old".into(), "new".into()]
        );
        let state = session.read_state();
        let credentials = state.credentials.as_ref().unwrap();
        assert_eq!(credentials.password, "new");
    }

    /// Answers calls on hostA with a redirect to hostB, holding each answer
    /// until every caller has reached hostA.
    struct SlaveWithCallersInFlight {
        barrier: tokio::sync::Barrier,
        on_master: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RpcTransport for SlaveWithCallersInFlight {
        async fn call(
            &self,
            endpoint: &Endpoint,
            method: &str,
            _params: &[Value],
            _timeout: Option<Duration>,
        ) -> Result<Value, Error> {
            match (endpoint.host.as_str(), method) {
                (_, "session.login_with_password") => Ok("OpaqueRef:s".into()),
                ("hostA.example", _) => {
                    self.barrier.wait().await;
                    Err(ServerError::new(
                        api_errors::HOST_IS_SLAVE,
                        vec!["hostB.example".to_string()],
                    )
                    .into())
                }
                _ => {
                    self.on_master.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::from(vec!["OpaqueRef:vm1"]))
                }
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_redirect() {
        const CALLERS: usize = 8;
        let transport = Arc::new(SlaveWithCallersInFlight {
            barrier: tokio::sync::Barrier::new(CALLERS),
            on_master: AtomicUsize::new(0),
        });
        let session = Session::with_transport(
            transport.clone(),
            ClientOpts::new(Endpoint::https("hostA.example")),
        );
        session.login_with_password("u", "p", "1.0", "o").await.unwrap();

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let session = session.clone();
                tokio::spawn(async move {
                    session.call("VM.get_all", Vec::new()).await
                })
            })
            .collect();
        for handle in handles {
            let out = handle.await.unwrap().unwrap();
            assert_eq!(out, Value::from(vec!["OpaqueRef:vm1"]));
        }

        assert_eq!(session.client().generation(), 1);
        assert_eq!(session.endpoint().host, "hostB.example");
        assert_eq!(transport.on_master.load(Ordering::SeqCst), CALLERS);
        assert_eq!(session.session_ref().unwrap().as_str(), "OpaqueRef:s");
    }
}
