// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server-side tracking of long-running operations.
//!
//! Every `async_` facade returns a [`TaskRef`]. The task's record says how
//! far the operation got; once it reaches a terminal state, its `result`
//! holds the serialized return value of the synchronous twin, or its
//! `error_info` the error the synchronous twin would have returned.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use slog::debug;

use crate::codec::{Codec, Timestamp};
use crate::error::{CodecError, CodecErrorKind, Error, ServerError};
use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{HostRef, TaskRef};
use crate::session::Session;
use crate::xml;

define_enum! {
    /// Operations that may be in flight on a task.
    pub enum TaskAllowedOperations {
        /// refers to the operation "cancel"
        Cancel = "cancel",
        /// refers to the operation "destroy"
        Destroy = "destroy",
    }
}

define_enum! {
    /// Lifecycle state of a task.
    pub enum TaskStatusType {
        /// task is in progress
        Pending = "pending",
        /// task was completed successfully
        Success = "success",
        /// task has failed
        Failure = "failure",
        /// task is being cancelled
        Cancelling = "cancelling",
        /// task has been cancelled
        Cancelled = "cancelled",
    }
}

define_record! {
    pub struct TaskRecord = "task" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<TaskAllowedOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, TaskAllowedOperations>,
        /// Time task was created
        pub created: Timestamp,
        /// Time task finished (i.e. succeeded or failed).
        pub finished: Timestamp,
        /// current status of the task
        pub status: TaskStatusType,
        /// the host on which the task is running
        pub resident_on: HostRef,
        /// This field contains the estimated fraction of the task which is
        /// complete.
        pub progress: f64,
        /// if the task has completed successfully, this field contains the type
        /// of the encoded result (i.e. name of the class whose reference is in
        /// the result field).
        pub kind: String = "type",
        /// if the task has completed successfully, this field contains the
        /// result value (either Void or an object reference).
        pub result: String,
        /// if the task has failed, this field contains the set of associated
        /// error strings.
        pub error_info: Vec<String>,
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// Ref pointing to the task this is a substask of.
        pub subtask_of: TaskRef,
        /// List pointing to all the substasks.
        pub subtasks: BTreeSet<TaskRef>,
        /// Function call trace for debugging.
        pub backtrace: String,
    }
}

rpc_class! {
    pub struct Task = "task";

    /// Get a record containing the current state of the given task.
    fn get_record(this: &TaskRef) -> TaskRecord;
    fn get_by_uuid(uuid: &str) -> TaskRef;
    fn get_by_name_label(label: &str) -> Vec<TaskRef>;
    fn get_uuid(this: &TaskRef) -> String;
    fn get_name_label(this: &TaskRef) -> String;
    fn get_name_description(this: &TaskRef) -> String;
    fn get_allowed_operations(this: &TaskRef)
        -> BTreeSet<TaskAllowedOperations>;
    fn get_current_operations(
        this: &TaskRef,
    ) -> BTreeMap<String, TaskAllowedOperations>;
    fn get_created(this: &TaskRef) -> Timestamp;
    fn get_finished(this: &TaskRef) -> Timestamp;
    fn get_status(this: &TaskRef) -> TaskStatusType;
    fn get_resident_on(this: &TaskRef) -> HostRef;
    fn get_progress(this: &TaskRef) -> f64;
    fn get_type(this: &TaskRef) -> String;
    fn get_result(this: &TaskRef) -> String;
    fn get_error_info(this: &TaskRef) -> Vec<String>;
    fn get_other_config(this: &TaskRef) -> BTreeMap<String, String>;
    fn get_subtask_of(this: &TaskRef) -> TaskRef;
    fn get_subtasks(this: &TaskRef) -> BTreeSet<TaskRef>;
    fn get_backtrace(this: &TaskRef) -> String;
    fn set_other_config(this: &TaskRef, value: &BTreeMap<String, String>) -> ();
    /// Add the given key-value pair to the other_config field of the given
    /// task.
    fn add_to_other_config(this: &TaskRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given task.
    fn remove_from_other_config(this: &TaskRef, key: &str) -> ();
    /// Create a new task object which must be manually destroyed.
    fn create(label: &str, description: &str) -> TaskRef;
    /// Destroy the task object
    fn destroy(this: &TaskRef) -> ();
    /// Request that a task be cancelled.
    task fn cancel(task: &TaskRef) -> ();
    /// Set the task status
    fn set_status(this: &TaskRef, value: &TaskStatusType) -> ();
    /// Set the task progress
    fn set_progress(this: &TaskRef, value: f64) -> ();
    /// Set the task result
    fn set_result(this: &TaskRef, value: &str) -> ();
    /// Set the task error info
    fn set_error_info(this: &TaskRef, value: &[String]) -> ();
    /// Return a list of all the tasks known to the system.
    fn get_all() -> Vec<TaskRef>;
    /// Return a map of task references to task records for all tasks known to
    /// the system.
    fn get_all_records() -> BTreeMap<TaskRef, TaskRecord>;
}

impl Task {
    /// Decodes the `result` field of a successful task as the return type
    /// of the operation that spawned it.
    ///
    /// The field holds a serialized `<value>` fragment; an empty field is
    /// the result of an operation returning nothing.
    pub fn decode_result<T: Codec>(
        label: &str,
        raw: &str,
    ) -> Result<T, Error> {
        let value = xml::parse_value(raw).map_err(|e| {
            let kind = CodecErrorKind::MalformedValue(e.to_string());
            CodecError::new(label, kind)
        })?;
        Ok(T::decode(label, &value)?)
    }

    /// Polls `task` once.
    ///
    /// Yields `Ok(None)` while the task is pending or being cancelled. A
    /// failed task surfaces as the same [`ServerError`] the synchronous
    /// call would have produced.
    pub async fn outcome<T: Codec>(
        session: &Session,
        task: &TaskRef,
        label: &str,
    ) -> Result<Option<T>, Error> {
        let status = Task::get_status(session, task).await?;
        debug!(session.log(), "task poll";
            "task" => %task,
            "status" => %status,
        );
        match status {
            TaskStatusType::Pending | TaskStatusType::Cancelling => Ok(None),
            TaskStatusType::Success => {
                let raw = Task::get_result(session, task).await?;
                Self::decode_result(label, &raw).map(Some)
            }
            TaskStatusType::Failure => {
                let info = Task::get_error_info(session, task).await?;
                Err(ServerError::from_error_info(info).into())
            }
            TaskStatusType::Cancelled => {
                Err(Error::TaskCancelled { task: task.clone() })
            }
            TaskStatusType::Unknown(status) => Err(CodecError::new(
                "task.get_status -> ",
                CodecErrorKind::UnknownLabel(status),
            )
            .into()),
        }
    }

    /// Polls `task` every `interval` until it reaches a terminal state.
    ///
    /// There is no overall deadline; wrap the future in
    /// `tokio::time::timeout` to bound it, and cancel the task on the
    /// server if the wait is abandoned.
    pub async fn wait_for<T: Codec>(
        session: &Session,
        task: &TaskRef,
        label: &str,
        interval: Duration,
    ) -> Result<T, Error> {
        loop {
            if let Some(value) = Self::outcome(session, task, label).await? {
                return Ok(value);
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientOpts;
    use crate::endpoint::Endpoint;
    use crate::refs::VmRef;
    use crate::transport::MockTransport;
    use crate::value::Value;

    /// Answers the polling calls for one task from a script of statuses.
    fn scripted_task(
        statuses: &'static [&'static str],
        result: &'static str,
        error_info: &'static [&'static str],
    ) -> (MockTransport, Arc<AtomicUsize>) {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polls);
        let mock = MockTransport::new(move |call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "task.get_status" => {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let last = statuses.len() - 1;
                Ok(Value::from(statuses[n.min(last)]))
            }
            "task.get_result" => Ok(Value::from(result)),
            "task.get_error_info" => Ok(Value::from(error_info.to_vec())),
            other => panic!("unexpected call {other}"),
        });
        (mock, polls)
    }

    async fn logged_in(mock: &MockTransport) -> Session {
        let session = Session::with_transport(
            Arc::new(mock.clone()),
            ClientOpts::new(Endpoint::https("hostA.example")),
        );
        session.login_with_password("root", "pw", "1.0", "test").await.unwrap();
        session
    }

    #[test]
    fn results_decode_from_value_fragments() {
        let vm: VmRef = Task::decode_result(
            "Async.VM.clone -> result",
            "<value>OpaqueRef:vm2</value>",
        )
        .unwrap();
        assert_eq!(vm, VmRef::from("OpaqueRef:vm2"));

        Task::decode_result::<()>("Async.VM.start -> result", "").unwrap();

        let err = Task::decode_result::<i64>(
            "Async.VM.maximise_memory -> result",
            "<value><boolean>1</boolean></value>",
        )
        .unwrap_err();
        match err {
            Error::Codec(e) => {
                assert_eq!(e.label, "Async.VM.maximise_memory -> result")
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = Task::decode_result::<VmRef>(
            "Async.VM.clone -> result",
            "<value><int>twelve</int></value>",
        )
        .unwrap_err();
        match err {
            Error::Codec(e) => {
                assert_eq!(e.label, "Async.VM.clone -> result");
                assert!(matches!(e.kind, CodecErrorKind::MalformedValue(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_polls_until_success() {
        let (mock, polls) = scripted_task(
            &["pending", "pending", "success"],
            "<value>OpaqueRef:vm2</value>",
            &[],
        );
        let session = logged_in(&mock).await;

        let task = TaskRef::from("OpaqueRef:task1");
        let vm: VmRef = Task::wait_for(
            &session,
            &task,
            "Async.VM.clone -> result",
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(vm.as_str(), "OpaqueRef:vm2");
        assert_eq!(polls.load(Ordering::SeqCst), 3);

        let calls = mock.calls();
        assert_eq!(
            calls[1].params,
            vec![Value::from("OpaqueRef:s"), Value::from("OpaqueRef:task1")]
        );
        assert_eq!(calls.last().unwrap().method, "task.get_result");
    }

    #[tokio::test]
    async fn failed_tasks_surface_server_errors() {
        let (mock, _) = scripted_task(
            &["failure"],
            "",
            &["VM_REQUIRES_SR", "OpaqueRef:vm1", "OpaqueRef:sr9"],
        );
        let session = logged_in(&mock).await;
        let err = Task::outcome::<()>(
            &session,
            &TaskRef::from("OpaqueRef:t"),
            "Async.VM.start -> result",
        )
        .await
        .unwrap_err();
        let server = err.as_server().unwrap();
        assert_eq!(server.code(), "VM_REQUIRES_SR");
        assert_eq!(server.params(), ["OpaqueRef:vm1", "OpaqueRef:sr9"]);
    }

    #[tokio::test]
    async fn cancellation_states() {
        let (mock, _) =
            scripted_task(&["cancelling", "cancelled", "paused"], "", &[]);
        let session = logged_in(&mock).await;
        let task = TaskRef::from("OpaqueRef:t");
        let label = "Async.VM.start -> result";

        let pending =
            Task::outcome::<()>(&session, &task, label).await.unwrap();
        assert!(pending.is_none());

        let err =
            Task::outcome::<()>(&session, &task, label).await.unwrap_err();
        match err {
            Error::TaskCancelled { task: cancelled } => {
                assert_eq!(cancelled, task)
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err =
            Task::outcome::<()>(&session, &task, label).await.unwrap_err();
        match err {
            Error::Codec(e) => assert_eq!(
                e.kind,
                CodecErrorKind::UnknownLabel("paused".to_string())
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn async_twins_use_the_async_namespace() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "Async.task.cancel" => Ok("OpaqueRef:t2".into()),
            "task.cancel" => Ok(Value::Nil),
            other => panic!("unexpected call {other}"),
        });
        let session = logged_in(&mock).await;
        let task = TaskRef::from("OpaqueRef:t1");

        Task::cancel(&session, &task).await.unwrap();
        let handle = Task::async_cancel(&session, &task).await.unwrap();
        assert_eq!(handle, TaskRef::from("OpaqueRef:t2"));

        let calls = mock.calls();
        assert_eq!(calls[1].method, "task.cancel");
        assert_eq!(calls[2].method, "Async.task.cancel");
        assert_eq!(calls[2].params, calls[1].params);
    }
}
