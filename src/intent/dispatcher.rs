use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::future::{BoxFuture, join_all};
use serde_json::Value;

use crate::intent::{
    error::{IntentError, internal_error},
    ports::{IntentDispatchPort, IntentRegistryPort, ListenerPort},
    types::{AggregateResult, DispatchOutcome, Intent},
};

type NativeListenerHandler =
    dyn Fn(Intent, Value) -> BoxFuture<'static, Result<Value, IntentError>> + Send + Sync;

/// Adapts a plain async closure into a [`ListenerPort`], mostly for warm-up
/// wiring and tests.
pub struct NativeFunctionListener {
    handler: Arc<NativeListenerHandler>,
}

impl NativeFunctionListener {
    pub fn new(handler: Arc<NativeListenerHandler>) -> Self {
        Self { handler }
    }

    pub fn from_fn<F, Fut>(handler: F) -> Self
    where
        F: Fn(Intent, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, IntentError>> + Send + 'static,
    {
        let handler: Arc<NativeListenerHandler> =
            Arc::new(move |intent, payload| Box::pin(handler(intent, payload)));
        Self { handler }
    }
}

#[async_trait]
impl ListenerPort for NativeFunctionListener {
    async fn on_intent(&self, intent: &Intent, payload: &Value) -> Result<Value, IntentError> {
        (self.handler)(intent.clone(), payload.clone()).await
    }
}

/// Fan-out/fan-in dispatcher: starts every listener for the intent as its
/// own task, waits for all of them to settle, and reports per-listener
/// outcomes in registration order. Holds no mutable state of its own.
pub struct FanoutIntentDispatcher {
    registry: Arc<dyn IntentRegistryPort>,
    listener_timeout: Duration,
}

impl FanoutIntentDispatcher {
    pub fn new(registry: Arc<dyn IntentRegistryPort>, listener_timeout: Duration) -> Self {
        Self {
            registry,
            listener_timeout,
        }
    }
}

async fn settle_listener(
    listener: Arc<dyn ListenerPort>,
    intent: Intent,
    payload: Value,
    limit: Duration,
) -> DispatchOutcome {
    // The bounded wait keeps one hanging listener from stalling the whole
    // aggregate.
    match tokio::time::timeout(limit, listener.on_intent(&intent, &payload)).await {
        Ok(Ok(value)) => DispatchOutcome::Fulfilled { value },
        Ok(Err(err)) => DispatchOutcome::Rejected {
            reason: err.to_string(),
        },
        Err(_) => DispatchOutcome::Rejected {
            reason: format!("listener timed out after {}ms", limit.as_millis()),
        },
    }
}

#[async_trait]
impl IntentDispatchPort for FanoutIntentDispatcher {
    async fn dispatch(
        &self,
        intent: &Intent,
        payload: &Value,
    ) -> Result<AggregateResult, IntentError> {
        let listeners = self.registry.listeners(intent.as_str());
        tracing::debug!(
            target: "intent",
            intent = %intent,
            listener_count = listeners.len(),
            "dispatch_started"
        );

        let handles: Vec<_> = listeners
            .into_iter()
            .map(|listener| {
                tokio::spawn(settle_listener(
                    listener,
                    intent.clone(),
                    payload.clone(),
                    self.listener_timeout,
                ))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for joined in join_all(handles).await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_err) if join_err.is_panic() => {
                    tracing::warn!(target: "intent", intent = %intent, "listener_panicked");
                    outcomes.push(DispatchOutcome::Rejected {
                        reason: "listener panicked".to_string(),
                    });
                }
                Err(join_err) => {
                    return Err(internal_error(format!(
                        "listener task join failed: {join_err}"
                    )));
                }
            }
        }

        Ok(AggregateResult {
            intent: intent.clone(),
            outcomes,
        })
    }
}
