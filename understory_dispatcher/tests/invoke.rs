// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for marshaling work onto an owner thread with `understory_dispatcher`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use understory_dispatcher::{
    Dispatcher, DispatcherBuilder, DispatcherThread, InvokeError, InvokeOptions, Priority,
};

fn spawn_owner(name: &str) -> DispatcherThread {
    DispatcherBuilder::new().name(name).spawn().unwrap()
}

/// Blocks the owner thread until the returned sender is used or dropped.
fn block_owner(dispatcher: &Dispatcher) -> crossbeam_channel::Sender<()> {
    let (started_tx, started_rx) = crossbeam_channel::bounded(1);
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(1);
    dispatcher
        .begin_invoke(Priority::Send, move || {
            started_tx.send(()).unwrap();
            let _ = release_rx.recv();
        })
        .unwrap();
    started_rx.recv().unwrap();
    release_tx
}

fn wait_for_pending(dispatcher: &Dispatcher, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while dispatcher.pending() != count {
        assert!(Instant::now() < deadline, "work never reached the queue");
        thread::sleep(Duration::from_millis(1));
    }
}

#[derive(Debug, PartialEq)]
enum CustomError {
    Rejected(u32),
    Dispatch(InvokeError),
}

impl From<InvokeError> for CustomError {
    fn from(err: InvokeError) -> Self {
        Self::Dispatch(err)
    }
}

#[test]
fn marshaled_call_runs_on_owner_thread() {
    let owner = spawn_owner("owner");
    let dispatcher = owner.dispatcher();
    assert!(!dispatcher.check_access());
    assert_eq!(dispatcher.verify_access(), Err(InvokeError::WrongThread));

    let (thread_id, had_access) = dispatcher
        .invoke({
            let dispatcher = dispatcher.clone();
            move || (thread::current().id(), dispatcher.check_access())
        })
        .unwrap();
    assert_eq!(thread_id, dispatcher.owner_thread());
    assert_ne!(thread_id, thread::current().id());
    assert!(had_access);
}

#[test]
fn nested_invoke_on_owner_does_not_deadlock() {
    let owner = spawn_owner("nested");
    let dispatcher = owner.dispatcher().clone();

    let inner = dispatcher.clone();
    let result = dispatcher.invoke(move || {
        let again = inner.clone();
        inner
            .invoke(move || again.invoke(|| 3).unwrap() + 4)
            .unwrap()
    });
    assert_eq!(result, Ok(7));
}

#[test]
fn errors_from_marshaled_work_keep_their_identity() {
    let owner = spawn_owner("errors");
    let result: Result<u8, CustomError> =
        owner.dispatcher().try_invoke(|| Err(CustomError::Rejected(17)));
    assert_eq!(result, Err(CustomError::Rejected(17)));

    let ok: Result<u8, CustomError> = owner.dispatcher().try_invoke(|| Ok(5));
    assert_eq!(ok, Ok(5));
}

#[test]
fn marshaling_failures_convert_into_caller_error() {
    let owner = spawn_owner("convert");
    let dispatcher = owner.dispatcher().clone();
    owner.join().unwrap();

    let result: Result<u8, CustomError> = dispatcher.try_invoke(|| Ok(1));
    assert_eq!(result, Err(CustomError::Dispatch(InvokeError::Shutdown)));
}

#[test]
fn panics_resume_on_caller_with_original_payload() {
    let owner = spawn_owner("panics");
    let dispatcher = owner.dispatcher().clone();

    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        dispatcher.invoke(|| -> u8 { panic::panic_any(String::from("slider exploded")) })
    }));
    let payload = caught.expect_err("panic should reach the caller");
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("slider exploded")
    );

    // The owner loop survived.
    assert_eq!(dispatcher.invoke(|| "still running"), Ok("still running"));
}

#[test]
fn panic_in_posted_work_does_not_stop_the_loop() {
    let owner = spawn_owner("posted");
    let dispatcher = owner.dispatcher();
    dispatcher
        .begin_invoke(Priority::Normal, || panic!("posted work failed"))
        .unwrap();
    assert_eq!(dispatcher.invoke(|| 1), Ok(1));
}

#[test]
fn timeout_is_bounded_and_abandons_work() {
    let owner = spawn_owner("timeout");
    let dispatcher = owner.dispatcher().clone();
    let release = block_owner(&dispatcher);

    let ran = Arc::new(AtomicBool::new(false));
    let timeout = Duration::from_millis(50);
    let start = Instant::now();
    let result = dispatcher.invoke_with(InvokeOptions::new().timeout(timeout), {
        let ran = Arc::clone(&ran);
        move || ran.store(true, Ordering::SeqCst)
    });
    let waited = start.elapsed();

    assert_eq!(result, Err(InvokeError::Timeout { timeout }));
    assert!(result.unwrap_err().is_timeout());
    assert!(waited >= timeout);
    assert!(waited < Duration::from_secs(2), "timeout overshot: {waited:?}");

    release.send(()).unwrap();
    // Same band as the abandoned call, so this runs after it was skipped.
    dispatcher.invoke(|| ()).unwrap();
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn default_timeout_applies() {
    let owner = DispatcherBuilder::new()
        .default_timeout(Duration::from_millis(30))
        .spawn()
        .unwrap();
    let dispatcher = owner.dispatcher();
    assert_eq!(dispatcher.default_timeout(), Some(Duration::from_millis(30)));

    let release = block_owner(dispatcher);
    let result = dispatcher.invoke(|| ());
    assert_eq!(
        result,
        Err(InvokeError::Timeout {
            timeout: Duration::from_millis(30)
        })
    );
    drop(release);
}

#[test]
fn priority_bands_order_queued_work() {
    let owner = spawn_owner("priority");
    let dispatcher = owner.dispatcher().clone();
    let release = block_owner(&dispatcher);

    let log = Arc::new(Mutex::new(Vec::new()));
    for (priority, name) in [
        (Priority::Background, "background"),
        (Priority::Normal, "normal-1"),
        (Priority::Input, "input"),
        (Priority::Send, "send"),
        (Priority::Normal, "normal-2"),
    ] {
        let log = Arc::clone(&log);
        dispatcher
            .begin_invoke(priority, move || log.lock().push(name))
            .unwrap();
    }

    release.send(()).unwrap();
    // Background runs last, so once this returns everything has run.
    dispatcher
        .invoke_with(InvokeOptions::new().priority(Priority::Background), || ())
        .unwrap();
    assert_eq!(
        *log.lock(),
        vec!["send", "normal-1", "normal-2", "input", "background"]
    );
}

#[test]
fn shutdown_fails_pending_callers() {
    let owner = spawn_owner("shutdown");
    let dispatcher = owner.dispatcher().clone();
    let release = block_owner(&dispatcher);

    let caller = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || dispatcher.invoke(|| 1))
    };
    wait_for_pending(&dispatcher, 1);

    dispatcher.shutdown();
    assert_eq!(caller.join().unwrap(), Err(InvokeError::Shutdown));

    drop(release);
    owner.join().unwrap();
}

#[test]
fn calls_after_shutdown_fail_fast() {
    let owner = spawn_owner("after");
    let dispatcher = owner.dispatcher().clone();
    owner.join().unwrap();

    assert!(dispatcher.has_shut_down());
    assert_eq!(dispatcher.invoke(|| 1), Err(InvokeError::Shutdown));
    assert_eq!(
        dispatcher.begin_invoke(Priority::Normal, || {}),
        Err(InvokeError::Shutdown)
    );
}

#[test]
fn inline_calls_still_run_after_shutdown() {
    let event_loop = DispatcherBuilder::new().build_for_current_thread();
    let dispatcher = event_loop.dispatcher();
    dispatcher.shutdown();
    assert_eq!(dispatcher.invoke(|| "inline"), Ok("inline"));
}

#[test]
fn current_thread_loop_serves_other_threads() {
    let event_loop = DispatcherBuilder::new().build_for_current_thread();
    let dispatcher = event_loop.dispatcher().clone();

    let caller = thread::spawn(move || dispatcher.invoke(|| thread::current().id()));
    let deadline = Instant::now() + Duration::from_secs(5);
    while !caller.is_finished() {
        assert!(Instant::now() < deadline, "caller never completed");
        event_loop.pump_until(Instant::now() + Duration::from_millis(10));
    }
    assert_eq!(caller.join().unwrap(), Ok(thread::current().id()));
}
