pub mod config;
pub mod fulfillment;
pub mod intent;
pub mod logging;
