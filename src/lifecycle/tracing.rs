//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber. Levels come from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info farm-orders      # one line per actor operation
//! RUST_LOG=debug farm-orders     # plus full request payloads
//! ```
//!
//! The compact format hides module paths; actor logs carry an `entity_type` field
//! (`Order`, `Ring`, ...) instead, and client methods open spans named after the
//! operation, so a submission reads as:
//!
//! ```text
//! INFO submit_order: Created entity_type="Customer" id=customer_1 size=1
//! INFO submit_order: Created entity_type="Order" id=order_1 size=1
//! INFO submit_order: Order submitted order_id=order_1 duplicate=false
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
