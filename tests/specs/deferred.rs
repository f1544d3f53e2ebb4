//! Deferred (pushed) event buffer behavior

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn pushed_payloads_flush_in_order() {
    let dispatcher = dispatcher();
    let seen: Arc<Mutex<Vec<u64>>> = Arc::default();

    let seen_in_listener = Arc::clone(&seen);
    dispatcher
        .listen(
            "metrics.sample",
            vec![Listener::callable(move |payload| {
                seen_in_listener
                    .lock()
                    .unwrap()
                    .push(payload[0].as_u64().unwrap());
                Ok(Value::Null)
            })],
        )
        .unwrap();

    dispatcher.push("metrics.sample", vec![json!(1)]);
    dispatcher.push("metrics.sample", vec![json!(2)]);
    dispatcher.push("metrics.sample", vec![json!(3)]);
    assert!(seen.lock().unwrap().is_empty());

    dispatcher.flush("metrics.sample").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn a_second_flush_invokes_nothing() {
    let dispatcher = dispatcher();
    let counter = Arc::new(AtomicUsize::new(0));

    dispatcher
        .listen("metrics.sample", vec![counting(&counter)])
        .unwrap();

    dispatcher.push("metrics.sample", vec![json!(1), json!(2)]);
    dispatcher.flush("metrics.sample").unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    dispatcher.flush("metrics.sample").unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn flushing_an_event_that_was_never_pushed_is_ok() {
    let dispatcher = dispatcher();
    dispatcher.flush("never.pushed").unwrap();
}

#[test]
fn push_does_not_require_listeners() {
    let dispatcher = dispatcher();
    dispatcher.push("quiet.event", vec![json!(1)]);
    // No listeners registered: flushing dispatches to nobody
    dispatcher.flush("quiet.event").unwrap();
}

#[test]
fn a_failed_flush_drops_the_unprocessed_remainder() {
    let dispatcher = dispatcher();
    let seen: Arc<Mutex<Vec<u64>>> = Arc::default();

    let seen_in_listener = Arc::clone(&seen);
    dispatcher
        .listen(
            "metrics.sample",
            vec![Listener::callable(move |payload| {
                let value = payload[0].as_u64().unwrap();
                if value == 2 {
                    return Err(EventError::listener("bad sample"));
                }
                seen_in_listener.lock().unwrap().push(value);
                Ok(Value::Null)
            })],
        )
        .unwrap();

    dispatcher.push("metrics.sample", vec![json!(1), json!(2), json!(3)]);
    assert!(dispatcher.flush("metrics.sample").is_err());
    assert_eq!(*seen.lock().unwrap(), vec![1]);

    // Earlier dispatches are not rolled back, later items are gone
    dispatcher.flush("metrics.sample").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[test]
fn buffers_are_independent_per_event_name() {
    let dispatcher = dispatcher();
    let a = Arc::new(AtomicUsize::new(0));
    let b = Arc::new(AtomicUsize::new(0));

    dispatcher.listen("event.a", vec![counting(&a)]).unwrap();
    dispatcher.listen("event.b", vec![counting(&b)]).unwrap();

    dispatcher.push("event.a", vec![json!(1)]);
    dispatcher.push("event.b", vec![json!(1)]);

    dispatcher.flush("event.a").unwrap();
    assert_eq!(a.load(Ordering::SeqCst), 1);
    assert_eq!(b.load(Ordering::SeqCst), 0);
}
