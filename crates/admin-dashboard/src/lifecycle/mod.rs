//! # Dashboard Lifecycle
//!
//! [`Dashboard`] is the conductor: it starts one [`TableStore`](crate::store::TableStore)
//! per table, seeds demo rows, opens list controllers and shuts everything down.
//!
//! ## Wiring a List
//!
//! `open_list` builds a [`PageController`](page_controller::PageController) with the
//! page's presets, a scoped [`ToastLog`](crate::notifier::ToastLog) and a
//! [`TenantScope`](crate::context::TenantScope), then spawns a small watcher that
//! calls `reload` on every session change.
//!
//! ## Graceful Shutdown
//!
//! 1. Cancel the shutdown token: each watcher disposes its controller and exits.
//! 2. Await the controller and watcher tasks.
//! 3. Drop the store clients; each store sees its channel close and stops.
//! 4. Await the store tasks.
//!
//! ## Tracing
//!
//! [`setup_tracing`] installs the compact subscriber filtered by `RUST_LOG`.

pub mod dashboard;
pub mod seed;

pub use dashboard::Dashboard;
pub use page_controller::tracing::setup_tracing;
