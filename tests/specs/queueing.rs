//! Queue-or-sync execution policy

use crate::prelude::*;

#[test]
fn queueable_listeners_go_to_the_queue_exactly_once() {
    let (dispatcher, queue) = dispatcher_with_fake_queue();
    let handler = Arc::new(QueueableFixture::new(true));

    dispatcher
        .listen("user.created", vec![Listener::queueable(handler.clone())])
        .unwrap();
    dispatcher
        .dispatch("user.created", vec![json!("john")])
        .unwrap();

    assert!(!handler.called.load(Ordering::SeqCst));
    let submissions = queue.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].signature, "queued_listener:user.created");
    assert_eq!(submissions[0].event_name, "user.created");
}

#[test]
fn declining_listeners_run_on_the_calling_thread() {
    let (dispatcher, queue) = dispatcher_with_fake_queue();
    let handler = Arc::new(QueueableFixture::new(false));

    dispatcher
        .listen("user.updated", vec![Listener::queueable(handler.clone())])
        .unwrap();
    dispatcher
        .dispatch("user.updated", vec![json!("jane")])
        .unwrap();

    assert!(handler.called.load(Ordering::SeqCst));
    assert!(queue.submissions().is_empty());
}

#[test]
fn queued_listeners_contribute_no_response() {
    let (dispatcher, queue) = dispatcher_with_fake_queue();

    dispatcher
        .listen(
            "report.requested",
            vec![
                Listener::queueable(Arc::new(QueueableFixture::new(true))),
                Listener::callable(|_| Ok(json!("inline"))),
            ],
        )
        .unwrap();

    let responses = dispatcher.dispatch("report.requested", vec![]).unwrap();
    assert_eq!(responses, vec![json!("inline")]);
    assert_eq!(queue.submissions().len(), 1);
}

#[test]
fn the_queue_decision_uses_the_current_payload() {
    struct GatedBySize;

    impl Handler for GatedBySize {
        fn signature(&self) -> String {
            "gated_by_size".to_string()
        }

        fn handle(&self, _payload: &[Value]) -> Result<(), EventError> {
            Ok(())
        }
    }

    impl QueueableHandler for GatedBySize {
        fn should_queue(&self, event: Option<&Value>) -> bool {
            event.and_then(Value::as_u64).is_some_and(|size| size > 100)
        }
    }

    let (dispatcher, queue) = dispatcher_with_fake_queue();
    dispatcher
        .listen("export.requested", vec![Listener::queueable(Arc::new(GatedBySize))])
        .unwrap();

    dispatcher
        .dispatch("export.requested", vec![json!(10)])
        .unwrap();
    assert!(queue.submissions().is_empty());

    dispatcher
        .dispatch("export.requested", vec![json!(5000)])
        .unwrap();
    assert_eq!(queue.submissions().len(), 1);
}

#[test]
fn per_listener_queue_configuration_reaches_the_backend() {
    struct RoutedListener;

    impl Handler for RoutedListener {
        fn signature(&self) -> String {
            "routed_listener".to_string()
        }

        fn handle(&self, _payload: &[Value]) -> Result<(), EventError> {
            Ok(())
        }
    }

    impl QueueableHandler for RoutedListener {
        fn via_connection(&self) -> Option<String> {
            Some("redis".to_string())
        }

        fn via_queue(&self) -> Option<String> {
            Some("exports".to_string())
        }

        fn with_delay(&self) -> std::time::Duration {
            std::time::Duration::from_secs(30)
        }
    }

    let (dispatcher, queue) = dispatcher_with_fake_queue();
    dispatcher
        .listen("export.ready", vec![Listener::queueable(Arc::new(RoutedListener))])
        .unwrap();
    dispatcher.dispatch("export.ready", vec![]).unwrap();

    let submissions = queue.submissions();
    assert_eq!(submissions[0].connection.as_deref(), Some("redis"));
    assert_eq!(submissions[0].queue.as_deref(), Some("exports"));
    assert!(submissions[0].delayed);
}

#[test]
fn sync_queue_runs_queued_listeners_inline() {
    let dispatcher = dispatcher();
    let handler = Arc::new(QueueableFixture::new(true));

    dispatcher
        .listen("cache.warm", vec![Listener::queueable(handler.clone())])
        .unwrap();

    let responses = dispatcher.dispatch("cache.warm", vec![]).unwrap();
    // Still queued from the dispatcher's point of view: no response collected
    assert!(responses.is_empty());
    // But the sync driver executed it before returning
    assert!(handler.called.load(Ordering::SeqCst));
}
