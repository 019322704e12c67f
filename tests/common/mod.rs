// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{review_payload, review_payload_json};
#[allow(unused_imports)]
pub use helpers::{
    services_with, CountingStore, FailingStore, HangingStore, MidStreamFailureStore,
};
