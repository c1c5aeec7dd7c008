// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change notifications for database objects.
//!
//! `event.from` is the long-poll alternative to polling objects one by one:
//! it blocks on the server until something in the named classes changes or
//! its own timeout expires, and returns a token to resume from.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::codec::{child_label, Codec, Timestamp};
use crate::error::{CodecError, Error};
use crate::macros::{define_enum, define_record, rpc_class};
use crate::session::Session;
use crate::value::Value;

/// Extra time granted to the transport beyond the server-side wait of
/// `event.from`, so a batch returned at the last moment still arrives.
pub const EVENT_FROM_GRACE: Duration = Duration::from_secs(30);

define_enum! {
    pub enum EventOperation {
        /// An object has been created
        Add = "add",
        /// An object has been deleted
        Del = "del",
        /// An object has been modified
        Mod = "mod",
    }
}

define_record! {
    pub struct EventRecord = "event" {
        /// An ID, monotonically increasing, and local to the current session
        pub id: i64,
        /// The time at which the event occurred
        pub timestamp: Timestamp,
        /// The name of the class of the object that changed
        pub class: String,
        /// The operation that was performed
        pub operation: EventOperation,
        /// A reference to the object that changed
        pub obj_ref: String = "ref",
        /// The uuid of the object that changed
        pub obj_uuid: String,
        /// The record of the object that was added, changed or deleted
        pub snapshot: Value,
    }
}

impl EventRecord {
    /// Decodes the snapshot as the record type of the changed class, e.g.
    /// `VmRecord` when `class` is `"vm"`.
    pub fn snapshot_as<T: Codec>(&self) -> Result<T, CodecError> {
        T::decode("eventRecord.snapshot", &self.snapshot)
    }
}

/// The answer of `event.from`: the events since the given token and the
/// token to pass next time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBatch {
    pub token: String,
    /// Number of live objects per class, for the classes asked about.
    pub valid_ref_counts: BTreeMap<String, i64>,
    pub events: Vec<EventRecord>,
}

impl Codec for EventBatch {
    fn encode(&self, label: &str) -> Result<Value, CodecError> {
        Ok([
            (
                "token".to_string(),
                self.token.encode(&child_label(label, "EventBatch.token"))?,
            ),
            (
                "valid_ref_counts".to_string(),
                self.valid_ref_counts.encode(&child_label(
                    label,
                    "EventBatch.valid_ref_counts",
                ))?,
            ),
            (
                "events".to_string(),
                self.events
                    .encode(&child_label(label, "EventBatch.events"))?,
            ),
        ]
        .into_iter()
        .collect())
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        let Some(members) = value.as_struct() else {
            return Err(CodecError::mismatch(label, "struct", value));
        };
        fn field<T: Codec>(
            members: &BTreeMap<String, Value>,
            label: &str,
            name: &str,
        ) -> Result<T, CodecError> {
            match members.get(name) {
                Some(v) => T::decode(
                    &child_label(label, &format!("EventBatch.{name}")),
                    v,
                ),
                None => Ok(T::zero()),
            }
        }
        Ok(Self {
            token: field(members, label, "token")?,
            valid_ref_counts: field(members, label, "valid_ref_counts")?,
            events: field(members, label, "events")?,
        })
    }

    fn zero() -> Self {
        Self::default()
    }
}

rpc_class! {
    /// Asynchronous event registration and handling.
    pub struct Event = "event";

    /// Registers this session with the event system for a set of given
    /// classes. Only for use together with `next`.
    task fn register(classes: &[String]) -> ();
    /// Removes this session's registration with the event system for a set
    /// of given classes.
    task fn unregister(classes: &[String]) -> ();
    /// Blocking call which returns a (possibly empty) batch of events. `from`
    /// supersedes it.
    fn next() -> Vec<EventRecord>;
    /// Blocking call which returns a new token and a (possibly empty) batch
    /// of events. The returned token can be used in subsequent calls.
    fn from(classes: &[String], token: &str, timeout: f64) -> EventBatch;
    /// Return the ID of the next event to be generated by the system
    fn get_current_id() -> i64;
    /// Injects an artificial event on the given object and returns the
    /// corresponding token, which later `from` tokens can be compared with.
    fn inject(class: &str, obj_ref: &str = "ref") -> String;
}

impl Event {
    /// Runs `event.from` with a server-side wait of `wait`.
    ///
    /// The call holds the connection for up to `wait`, which may exceed the
    /// session's per-call deadline; it is made on a handle whose deadline is
    /// `wait` plus [`EVENT_FROM_GRACE`].
    pub async fn next_batch(
        session: &Session,
        classes: &[String],
        token: &str,
        wait: Duration,
    ) -> Result<EventBatch, Error> {
        let session = session.with_timeout(wait + EVENT_FROM_GRACE);
        Event::from(&session, classes, token, wait.as_secs_f64()).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::classes::{VmPowerState, VmRecord};
    use crate::config::ClientOpts;
    use crate::endpoint::Endpoint;
    use crate::transport::MockTransport;
    use std::sync::Arc;

    fn batch() -> Value {
        let snapshot: Value = [
            ("uuid".to_string(), Value::from("u-1")),
            ("power_state".to_string(), Value::from("Running")),
        ]
        .into_iter()
        .collect();
        let event: Value = [
            ("id".to_string(), Value::from("17")),
            ("timestamp".to_string(), Value::from("20231114T22:13:20Z")),
            ("class".to_string(), Value::from("vm")),
            ("operation".to_string(), Value::from("mod")),
            ("ref".to_string(), Value::from("OpaqueRef:vm1")),
            ("obj_uuid".to_string(), Value::from("u-1")),
            ("snapshot".to_string(), snapshot),
        ]
        .into_iter()
        .collect();
        let counts: Value =
            [("vm".to_string(), Value::Int(3))].into_iter().collect();
        [
            ("token".to_string(), Value::from("000000000000017,0")),
            ("valid_ref_counts".to_string(), counts),
            ("events".to_string(), Value::Array(vec![event])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn batches_decode_with_typed_snapshots() {
        let batch = EventBatch::decode("event.from -> ", &batch()).unwrap();
        assert_eq!(batch.token, "000000000000017,0");
        assert_eq!(batch.valid_ref_counts["vm"], 3);

        let event = &batch.events[0];
        assert_eq!(event.id, 17);
        assert_eq!(event.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(event.operation, EventOperation::Mod);
        assert_eq!(event.obj_ref, "OpaqueRef:vm1");
        let vm: VmRecord = event.snapshot_as().unwrap();
        assert_eq!(vm.uuid, "u-1");
        assert_eq!(vm.power_state, VmPowerState::Running);

        let err = EventBatch::decode("event.from -> ", &Value::from("x"))
            .unwrap_err();
        assert_eq!(err.label, "event.from -> ");
    }

    #[tokio::test]
    async fn next_batch_sends_the_wait_and_lifts_the_deadline() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "event.from" => Ok(batch()),
            "event.inject" => Ok("000000000000018,0".into()),
            other => panic!("unexpected call {other}"),
        });
        let opts = ClientOpts::new(Endpoint::https("hostA.example"))
            .with_timeout(Duration::from_secs(5));
        let session = Session::with_transport(Arc::new(mock.clone()), opts);
        session.login_with_password("root", "pw", "1.0", "test").await.unwrap();

        let classes = vec!["vm".to_string()];
        let batch =
            Event::next_batch(&session, &classes, "", Duration::from_secs(60))
                .await
                .unwrap();
        assert_eq!(batch.events.len(), 1);
        assert_eq!(session.timeout(), Some(Duration::from_secs(5)));

        let token = Event::inject(&session, "vm", "OpaqueRef:vm1").await;
        assert!(token.unwrap() > batch.token);

        let calls = mock.calls();
        assert_eq!(calls[1].timeout, Some(Duration::from_secs(90)));
        assert_eq!(calls[2].timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            calls[1].params,
            vec![
                Value::from("OpaqueRef:s"),
                Value::from(vec!["vm"]),
                Value::from(""),
                Value::Double(60.0),
            ]
        );
        assert_eq!(
            calls[2].params[1..],
            [Value::from("vm"), Value::from("OpaqueRef:vm1")]
        );
    }
}
