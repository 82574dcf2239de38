//! # Observability & Tracing
//!
//! Controllers log with structured fields, keyed by the `entity` label given to
//! [`PageController::with_name`](crate::PageController::with_name):
//!
//! ```text
//! INFO Controller started entity="products" page_size=20
//! DEBUG Fetch issued entity="products" seq=1 reason="mount" page=1 size=20 filters=1
//! INFO Fetch ok entity="products" seq=1 rows=20 total=57
//! DEBUG Discarding superseded response entity="products" seq=3 latest=4
//! WARN Fetch failed entity="products" seq=5 error="Transport error: connection refused"
//! ```
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle and results
//! RUST_LOG=debug cargo run    # every intent, fetch and discarded response
//! ```

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity labels carry the context
        .compact()
        .init();
}
