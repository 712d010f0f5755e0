pub mod notifier;
pub mod service;

pub use notifier::{FailureReason, FulfillmentEvent, FulfillmentNotifier, NO_LISTENERS_REASON};
pub use service::{FulfillmentResponse, FulfillmentService, RequestPhase};
