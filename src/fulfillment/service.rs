use std::sync::Arc;

use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    fulfillment::notifier::{
        FailureReason, FulfillmentEvent, FulfillmentNotifier, NO_LISTENERS_REASON,
    },
    intent::{
        AggregateResult, Intent,
        ports::{IntentDispatchPort, IntentRegistryPort},
    },
};

/// Per-request lifecycle. Every request terminates in `Responded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Received,
    Lookup,
    Unfulfillable,
    Dispatched,
    AllFailed,
    Succeeded,
    Notified,
    Responded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentResponse {
    pub status: u16,
    pub body: Value,
}

impl FulfillmentResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn bad_request(message: &str) -> Self {
        Self {
            status: 400,
            body: json!({ "error": message }),
        }
    }

    fn server_error(body: Value) -> Self {
        Self { status: 500, body }
    }
}

/// Drives one fulfillment request through lookup, dispatch and notification,
/// and maps the outcome to a response the webhook boundary can return as-is.
pub struct FulfillmentService {
    registry: Arc<dyn IntentRegistryPort>,
    dispatcher: Arc<dyn IntentDispatchPort>,
    notifier: FulfillmentNotifier,
}

impl FulfillmentService {
    pub fn new(
        registry: Arc<dyn IntentRegistryPort>,
        dispatcher: Arc<dyn IntentDispatchPort>,
        notifier: FulfillmentNotifier,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            notifier,
        }
    }

    pub fn notifier(&self) -> &FulfillmentNotifier {
        &self.notifier
    }

    pub async fn handle(&self, raw_intent: &str, payload: Value) -> FulfillmentResponse {
        let request_id = Uuid::now_v7();
        let intent = Intent::new(raw_intent);
        self.trace_phase(request_id, &intent, RequestPhase::Received);

        if intent.is_empty() {
            tracing::warn!(
                target: "fulfillment",
                request_id = %request_id,
                "intent_name_missing"
            );
            self.trace_phase(request_id, &intent, RequestPhase::Responded);
            return FulfillmentResponse::bad_request("intent name is missing or empty");
        }

        self.trace_phase(request_id, &intent, RequestPhase::Lookup);
        if self.registry.listener_count(intent.as_str()) == 0 {
            self.trace_phase(request_id, &intent, RequestPhase::Unfulfillable);
            return self.fail(
                request_id,
                intent,
                FailureReason::Unfulfillable {
                    message: NO_LISTENERS_REASON.to_string(),
                },
            );
        }

        self.trace_phase(request_id, &intent, RequestPhase::Dispatched);
        let aggregate = match self.dispatcher.dispatch(&intent, &payload).await {
            Ok(aggregate) => aggregate,
            Err(err) => {
                // A fault in the fan-out/join itself, not a listener
                // failure. Surface a generic internal error instead of
                // letting it escape.
                tracing::error!(
                    target: "fulfillment",
                    request_id = %request_id,
                    intent = %intent,
                    error = %err,
                    "dispatch_orchestration_fault"
                );
                self.trace_phase(request_id, &intent, RequestPhase::Responded);
                return FulfillmentResponse::server_error(json!({ "error": "internal error" }));
            }
        };

        if aggregate.is_fulfilled() {
            self.trace_phase(request_id, &intent, RequestPhase::Succeeded);
            self.succeed(request_id, aggregate)
        } else {
            self.trace_phase(request_id, &intent, RequestPhase::AllFailed);
            self.fail(
                request_id,
                intent,
                FailureReason::AllRejected {
                    outcomes: aggregate.outcomes,
                },
            )
        }
    }

    fn succeed(&self, request_id: Uuid, aggregate: AggregateResult) -> FulfillmentResponse {
        let intent = aggregate.intent.clone();
        self.notifier.publish(FulfillmentEvent::Success {
            intent: intent.clone(),
        });
        self.trace_phase(request_id, &intent, RequestPhase::Notified);
        self.trace_phase(request_id, &intent, RequestPhase::Responded);
        FulfillmentResponse::ok(json!(aggregate))
    }

    fn fail(
        &self,
        request_id: Uuid,
        intent: Intent,
        reason: FailureReason,
    ) -> FulfillmentResponse {
        let body = match &reason {
            FailureReason::Unfulfillable { message } => json!({ "error": message }),
            FailureReason::AllRejected { outcomes } => json!({
                "error": "all listeners rejected the intent",
                "outcomes": outcomes,
            }),
        };
        self.notifier.publish(FulfillmentEvent::Failure {
            intent: intent.clone(),
            reason,
        });
        self.trace_phase(request_id, &intent, RequestPhase::Notified);
        self.trace_phase(request_id, &intent, RequestPhase::Responded);
        FulfillmentResponse::server_error(body)
    }

    fn trace_phase(&self, request_id: Uuid, intent: &Intent, phase: RequestPhase) {
        tracing::debug!(
            target: "fulfillment",
            request_id = %request_id,
            intent = %intent,
            phase = ?phase,
            "request_phase"
        );
    }
}
