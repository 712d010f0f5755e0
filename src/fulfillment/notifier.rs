use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::intent::{DispatchOutcome, Intent};

/// Fixed reason carried by Tier-1 failures, when no listener is registered
/// for the requested intent.
pub const NO_LISTENERS_REASON: &str = "No listeners registered for this Intent.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureReason {
    Unfulfillable { message: String },
    AllRejected { outcomes: Vec<DispatchOutcome> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FulfillmentEvent {
    Success { intent: Intent },
    Failure { intent: Intent, reason: FailureReason },
}

/// In-process publish/subscribe signal for dispatch outcomes. Downstream
/// observers (fallback notification, diagnostics) subscribe; delivery is
/// best-effort and an event with no subscribers is dropped.
#[derive(Clone)]
pub struct FulfillmentNotifier {
    sender: broadcast::Sender<FulfillmentEvent>,
}

impl FulfillmentNotifier {
    pub fn new(capacity: usize) -> Self {
        // broadcast::channel panics on zero capacity; a zero in config must
        // not abort the host at warm-up.
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: FulfillmentEvent) {
        match &event {
            FulfillmentEvent::Success { intent } => {
                tracing::info!(target: "fulfillment", intent = %intent, "fulfillment_succeeded");
            }
            FulfillmentEvent::Failure { intent, .. } => {
                tracing::warn!(target: "fulfillment", intent = %intent, "fulfillment_failed");
            }
        }
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FulfillmentEvent> {
        self.sender.subscribe()
    }
}
