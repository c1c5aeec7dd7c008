// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end client behavior against a scripted in-memory server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use xenapi_client::api_errors;
use xenapi_client::error::CodecErrorKind;
use xenapi_client::transport::{MockTransport, RecordedCall};
use xenapi_client::{
    ClientOpts, Endpoint, Error, ServerError, Session, Task, TaskRef, Value,
    Vbd, Vdi, VdiRef, Vm, VmRef, VmPowerState,
};

fn session_on(mock: &MockTransport, host: &str) -> Session {
    Session::with_transport(
        Arc::new(mock.clone()),
        ClientOpts::new(Endpoint::https(host)),
    )
}

fn methods(calls: &[RecordedCall]) -> Vec<&str> {
    calls.iter().map(|c| c.method.as_str()).collect()
}

#[tokio::test]
async fn login_list_logout() {
    let mock = MockTransport::new(|call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:abc123".into()),
        "VM.get_all" => Ok(Value::from(vec!["OpaqueRef:vm1", "OpaqueRef:vm2"])),
        "session.logout" => Ok(Value::Nil),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");

    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();
    let vms = Vm::get_all(&session).await.unwrap();
    assert_eq!(
        vms,
        [VmRef::from("OpaqueRef:vm1"), VmRef::from("OpaqueRef:vm2")]
    );
    session.logout().await.unwrap();
    assert!(!session.is_logged_in());

    let calls = mock.calls();
    assert_eq!(
        methods(&calls),
        ["session.login_with_password", "VM.get_all", "session.logout"]
    );
    assert_eq!(
        calls[0].params,
        vec![
            Value::from("root"),
            Value::from("pw"),
            Value::from("0.1"),
            Value::from("test"),
        ]
    );
    assert_eq!(calls[1].params, vec![Value::from("OpaqueRef:abc123")]);
    assert_eq!(calls[2].params, vec![Value::from("OpaqueRef:abc123")]);
}

#[tokio::test]
async fn login_follows_the_master() {
    let mock = MockTransport::new(|call| match call.endpoint.host.as_str() {
        "hostA.example" => Err(ServerError::new(
            api_errors::HOST_IS_SLAVE,
            vec!["hostB.example".to_string()],
        )
        .into()),
        _ => Ok("OpaqueRef:abc123".into()),
    });
    let session = session_on(&mock, "hostA.example");

    let me = session.login_with_password("root", "pw", "0.1", "test").await;
    assert_eq!(me.unwrap().as_str(), "OpaqueRef:abc123");
    assert_eq!(session.endpoint().host, "hostB.example");

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].endpoint.host, "hostA.example");
    assert_eq!(calls[1].endpoint.host, "hostB.example");
    assert_eq!(calls[0].method, calls[1].method);
    assert_eq!(calls[0].params, calls[1].params);
}

#[tokio::test]
async fn server_errors_keep_their_parameters() {
    let mock = MockTransport::new(|call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "VM.start" => Err(ServerError::new(
            api_errors::VM_BAD_POWER_STATE,
            vec![
                "OpaqueRef:vm1".to_string(),
                "halted".to_string(),
                "running".to_string(),
            ],
        )
        .into()),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();

    let err = Vm::start(&session, &VmRef::from("OpaqueRef:vm1"), false, false)
        .await
        .unwrap_err();
    assert!(err.is_server_code(api_errors::VM_BAD_POWER_STATE));
    let server = err.as_server().unwrap();
    assert_eq!(server.params(), ["OpaqueRef:vm1", "halted", "running"]);

    // start_paused and force follow the VM ref, after the session.
    let start = &mock.calls()[1];
    assert_eq!(
        start.params,
        vec![
            Value::from("OpaqueRef:s"),
            Value::from("OpaqueRef:vm1"),
            Value::from(false),
            Value::from(false),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn async_shutdown_round_trip() {
    let polls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&polls);
    let mock = MockTransport::new(move |call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "Async.VM.clean_shutdown" => Ok("OpaqueRef:task1".into()),
        "task.get_status" => {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok("pending".into())
            } else {
                Ok("success".into())
            }
        }
        "task.get_result" => Ok("<value><nil/></value>".into()),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();

    let vm = VmRef::from("OpaqueRef:vm1");
    let task = Vm::async_clean_shutdown(&session, &vm).await.unwrap();
    assert_eq!(task, TaskRef::from("OpaqueRef:task1"));

    let () = Task::wait_for(
        &session,
        &task,
        "Async.VM.clean_shutdown -> result",
        Duration::from_millis(500),
    )
    .await
    .unwrap();
    assert_eq!(polls.load(Ordering::SeqCst), 2);
    assert_eq!(
        methods(&mock.calls()),
        [
            "session.login_with_password",
            "Async.VM.clean_shutdown",
            "task.get_status",
            "task.get_status",
            "task.get_result",
        ]
    );
}

#[tokio::test]
async fn async_failure_matches_sync_failure() {
    let info = ["VM_REQUIRES_SR", "OpaqueRef:vm1", "OpaqueRef:sr9"];
    let mock = MockTransport::new(move |call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "VM.start" => Err(ServerError::from_error_info(info).into()),
        "Async.VM.start" => Ok("OpaqueRef:task1".into()),
        "task.get_status" => Ok("failure".into()),
        "task.get_error_info" => Ok(Value::from(info.to_vec())),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();
    let vm = VmRef::from("OpaqueRef:vm1");

    let sync_err = Vm::start(&session, &vm, false, false).await.unwrap_err();
    let task = Vm::async_start(&session, &vm, false, false).await.unwrap();
    let async_err = Task::wait_for::<()>(
        &session,
        &task,
        "Async.VM.start -> result",
        Duration::from_millis(10),
    )
    .await
    .unwrap_err();

    let (sync_err, async_err) =
        (sync_err.as_server().unwrap(), async_err.as_server().unwrap());
    assert_eq!(sync_err, async_err);
    assert_eq!(async_err.code(), api_errors::VM_REQUIRES_SR);
    assert_eq!(async_err.params(), ["OpaqueRef:vm1", "OpaqueRef:sr9"]);
}

#[tokio::test]
async fn oversized_integers_are_rejected() {
    let mock = MockTransport::new(|call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "VM.get_record" => Ok([
            ("power_state".to_string(), Value::from("Halted")),
            (
                "memory_static_max".to_string(),
                Value::from("18446744073709551615"),
            ),
        ]
        .into_iter()
        .collect()),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();

    let err = Vm::get_record(&session, &VmRef::from("OpaqueRef:vm1"))
        .await
        .unwrap_err();
    let Error::Codec(err) = err else {
        panic!("expected a codec error, got {err:?}");
    };
    assert!(err.label.ends_with("VMRecord.memory_static_max"), "{}", err.label);
    assert_eq!(
        err.kind,
        CodecErrorKind::IntegerOutOfRange("18446744073709551615".to_string())
    );
}

#[tokio::test]
async fn oversized_native_integers_are_rejected_by_field() {
    let record = xenapi_client::xml::parse_value(
        "<value><struct>\
         <member><name>power_state</name><value>Halted</value></member>\
         <member><name>memory_static_max</name>\
         <value><i8>18446744073709551615</i8></value></member>\
         </struct></value>",
    )
    .unwrap();
    let mock = MockTransport::new(move |call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "VM.get_record" => Ok(record.clone()),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();

    let err = Vm::get_record(&session, &VmRef::from("OpaqueRef:vm1"))
        .await
        .unwrap_err();
    let Error::Codec(err) = err else {
        panic!("expected a codec error, got {err:?}");
    };
    assert_eq!(err.label, "VM.get_record -> VMRecord.memory_static_max");
    assert_eq!(
        err.kind,
        CodecErrorKind::IntegerOutOfRange("18446744073709551615".to_string())
    );
}

#[tokio::test]
async fn wire_names_and_argument_order() {
    let mock = MockTransport::new(|call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "VM.get_power_state" => Ok("Paused".into()),
        "VDI.copy" | "Async.VDI.copy" => Ok("OpaqueRef:copy".into()),
        "VBD.get_VDI" => Ok("OpaqueRef:vdi".into()),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();

    let state = Vm::get_power_state(&session, &VmRef::from("OpaqueRef:vm1"))
        .await
        .unwrap();
    assert_eq!(state, VmPowerState::Paused);

    let vdi = VdiRef::from("OpaqueRef:vdi");
    let sr = "OpaqueRef:sr".into();
    Vdi::copy3(&session, &vdi, &sr).await.unwrap();
    Vdi::async_copy3(&session, &vdi, &sr).await.unwrap();
    let got = Vbd::get_vdi(&session, &"OpaqueRef:vbd".into()).await.unwrap();
    assert_eq!(got, vdi);

    let calls = mock.calls();
    assert_eq!(
        methods(&calls[1..]),
        ["VM.get_power_state", "VDI.copy", "Async.VDI.copy", "VBD.get_VDI"]
    );
    for call in &calls[1..] {
        assert_eq!(call.params[0], Value::from("OpaqueRef:s"));
    }
    assert_eq!(
        calls[2].params[1..],
        [Value::from("OpaqueRef:vdi"), Value::from("OpaqueRef:sr")]
    );
}

#[tokio::test]
async fn calls_after_logout_are_refused() {
    let mock = MockTransport::new(|call| match call.method.as_str() {
        "session.login_with_password" => Ok("OpaqueRef:s".into()),
        "session.logout" => Ok(Value::Nil),
        other => panic!("unexpected call {other}"),
    });
    let session = session_on(&mock, "hostA.example");
    session.login_with_password("root", "pw", "0.1", "test").await.unwrap();
    session.logout().await.unwrap();

    let err = Vm::get_all(&session).await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn));
    assert_eq!(mock.call_count(), 2);
}
