use std::sync::Arc;

use async_trait::async_trait;

use crate::intent::{
    error::IntentError,
    types::{AggregateResult, Intent, IntentCatalog},
};

/// A registered handler for one intent. Implementations are side-effecting
/// and may fail; the dispatcher captures each failure as a per-listener
/// outcome instead of letting it escape.
#[async_trait]
pub trait ListenerPort: Send + Sync {
    async fn on_intent(
        &self,
        intent: &Intent,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, IntentError>;
}

pub trait IntentRegistryPort: Send + Sync {
    /// Appends the listener to the intent's ordered list, creating the list
    /// if absent. Never replaces or deduplicates: registering the same
    /// listener twice yields two invocations on dispatch.
    fn register(&self, intent: &str, listener: Arc<dyn ListenerPort>);

    /// Snapshot of the listeners for the intent in registration order.
    /// Unregistered intents yield an empty vector, never an error.
    fn listeners(&self, intent: &str) -> Vec<Arc<dyn ListenerPort>>;

    fn listener_count(&self, intent: &str) -> usize;

    fn catalog_snapshot(&self) -> IntentCatalog;
}

#[async_trait]
pub trait IntentDispatchPort: Send + Sync {
    /// Fans the payload out to every listener registered for the intent and
    /// settles them all. `Err` signals a fault in the orchestration itself;
    /// listener failures surface as `Rejected` outcomes in the aggregate.
    async fn dispatch(
        &self,
        intent: &Intent,
        payload: &serde_json::Value,
    ) -> Result<AggregateResult, IntentError>;
}
