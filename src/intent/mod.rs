pub mod dispatcher;
pub mod error;
pub mod ports;
pub mod registry;
pub mod types;

pub use dispatcher::{FanoutIntentDispatcher, NativeFunctionListener};
pub use error::{IntentError, IntentErrorKind};
pub use ports::{IntentDispatchPort, IntentRegistryPort, ListenerPort};
pub use registry::InMemoryIntentRegistry;
pub use types::{AggregateResult, DispatchOutcome, Intent, IntentCatalog, IntentCatalogEntry};
