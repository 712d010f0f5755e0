use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use serde_json::json;

use beckon::intent::{
    FanoutIntentDispatcher, InMemoryIntentRegistry, Intent, IntentDispatchPort,
    IntentRegistryPort, ListenerPort, NativeFunctionListener, error::listener_failure,
};

fn dispatcher_over(registry: Arc<InMemoryIntentRegistry>) -> FanoutIntentDispatcher {
    FanoutIntentDispatcher::new(registry, Duration::from_millis(200))
}

#[tokio::test]
async fn aggregate_has_one_entry_per_registered_listener() {
    let registry = Arc::new(InMemoryIntentRegistry::new());
    for seq in 0..5 {
        registry.register(
            "order.status",
            Arc::new(NativeFunctionListener::from_fn(move |_, _| async move {
                Ok(json!(seq))
            })),
        );
    }

    let dispatcher = dispatcher_over(Arc::clone(&registry));
    let aggregate = dispatcher
        .dispatch(&Intent::new("order.status"), &json!({"order": 42}))
        .await
        .expect("dispatch should not fault");

    assert_eq!(aggregate.outcomes.len(), 5);
    for (index, outcome) in aggregate.outcomes.iter().enumerate() {
        assert_eq!(
            *outcome,
            beckon::intent::DispatchOutcome::Fulfilled {
                value: json!(index)
            }
        );
    }
}

#[tokio::test]
async fn partial_failure_is_overall_success() {
    let registry = Arc::new(InMemoryIntentRegistry::new());
    registry.register(
        "x",
        Arc::new(NativeFunctionListener::from_fn(|_, _| async {
            Err(listener_failure("boom"))
        })),
    );
    registry.register(
        "x",
        Arc::new(NativeFunctionListener::from_fn(|_, _| async {
            Ok(json!("ok"))
        })),
    );

    let dispatcher = dispatcher_over(Arc::clone(&registry));
    let aggregate = dispatcher
        .dispatch(&Intent::new("x"), &json!({}))
        .await
        .expect("dispatch should not fault");

    assert_eq!(
        aggregate.outcomes,
        vec![
            beckon::intent::DispatchOutcome::Rejected {
                reason: "boom".to_string()
            },
            beckon::intent::DispatchOutcome::Fulfilled { value: json!("ok") },
        ]
    );
    assert!(aggregate.is_fulfilled());
}

#[tokio::test]
async fn total_failure_is_overall_failure_with_all_reasons() {
    let registry = Arc::new(InMemoryIntentRegistry::new());
    for seq in 0..3 {
        registry.register(
            "x",
            Arc::new(NativeFunctionListener::from_fn(move |_, _| async move {
                Err(listener_failure(format!("failure {seq}")))
            })),
        );
    }

    let dispatcher = dispatcher_over(Arc::clone(&registry));
    let aggregate = dispatcher
        .dispatch(&Intent::new("x"), &json!({}))
        .await
        .expect("dispatch should not fault");

    assert!(!aggregate.is_fulfilled());
    assert_eq!(
        aggregate.rejection_reasons(),
        vec!["failure 0", "failure 1", "failure 2"]
    );
}

#[tokio::test]
async fn same_listener_registered_twice_is_invoked_twice() {
    let registry = Arc::new(InMemoryIntentRegistry::new());
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);
    let listener: Arc<dyn ListenerPort> =
        Arc::new(NativeFunctionListener::from_fn(move |_, _| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(json!("counted"))
            }
        }));

    registry.register("greet", Arc::clone(&listener));
    registry.register("greet", listener);

    let dispatcher = dispatcher_over(Arc::clone(&registry));
    let aggregate = dispatcher
        .dispatch(&Intent::new("greet"), &json!({}))
        .await
        .expect("dispatch should not fault");

    assert_eq!(aggregate.outcomes.len(), 2);
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn listeners_receive_the_opaque_payload_unmodified() {
    let registry = Arc::new(InMemoryIntentRegistry::new());
    registry.register(
        "echo",
        Arc::new(NativeFunctionListener::from_fn(|_, payload| async move {
            Ok(payload)
        })),
    );

    let payload = json!({"nested": {"values": [1, 2, 3]}, "note": "opaque"});
    let dispatcher = dispatcher_over(Arc::clone(&registry));
    let aggregate = dispatcher
        .dispatch(&Intent::new("echo"), &payload)
        .await
        .expect("dispatch should not fault");

    assert_eq!(
        aggregate.outcomes,
        vec![beckon::intent::DispatchOutcome::Fulfilled { value: payload }]
    );
}

#[tokio::test]
async fn dispatch_does_not_mutate_the_registry() {
    let registry = Arc::new(InMemoryIntentRegistry::new());
    registry.register(
        "greet",
        Arc::new(NativeFunctionListener::from_fn(|_, _| async {
            Ok(json!("hi"))
        })),
    );
    let version_before = registry.version();

    let dispatcher = dispatcher_over(Arc::clone(&registry));
    dispatcher
        .dispatch(&Intent::new("greet"), &json!({}))
        .await
        .expect("dispatch should not fault");

    assert_eq!(registry.version(), version_before);
    assert_eq!(registry.listener_count("greet"), 1);
}
