//! # Page Controller
//!
//! Server-side pagination, sorting, search and filtering for list screens, packaged
//! as a small actor.
//!
//! A list screen (products, users, orders, ...) needs the same plumbing every time:
//! keep page/size/sort/search/filter state, debounce the search box, merge the
//! user's filters with mandatory tenant scoping, call the backend, and make sure a
//! slow old response never overwrites a fast new one. This crate does that once.
//!
//! ## Architecture Overview
//!
//! 1. **Model** ([`PageRequest`], [`FilterPredicate`], [`Sorting`], [`FetchRequest`],
//!    [`FetchResponse`]): plain data. 0-based page indices inside, 1-based on the wire.
//! 2. **Runtime** ([`PageController`]): one Tokio task per table. It owns the
//!    [`ControllerState`], processes intents sequentially and publishes snapshots.
//! 3. **Interface** ([`GridHandle`]): a cloneable, type-safe client the view uses.
//!
//! Collaborators are traits: [`DataSource`] (the backend), [`ErrorNotifier`] (toasts)
//! and [`FilterScope`] (mandatory filters).
//!
//! ## State Machine
//!
//! ```text
//!  Idle ──mount/intent──▶ Loading ──ok──▶ Ready
//!                           │  ▲   └─err──▶ Errored
//!                           │  └──────── any intent that fetches
//!                           └─superseded response: ignored, no transition
//! ```
//!
//! ## Concurrency Model
//!
//! - Intents, fetch outcomes and the debounce deadline are multiplexed in one
//!   `select!` loop, so the state needs no locks.
//! - Each fetch runs in its own task with its own `CancellationToken`; issuing a
//!   new fetch cancels the previous one.
//! - Outcomes carry a sequence number; only the latest is applied.
//!
//! ## Testing
//!
//! See [`mock`] for hand-driven and canned data sources and a recording notifier.
//! Timing tests run under `#[tokio::test(start_paused = true)]`.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod handle;
pub mod message;
pub mod mock;
pub mod request;
pub mod response;
pub mod sort;
pub mod source;
pub mod state;
pub mod tracing;

// Re-export core types for convenience
pub use config::ControllerConfig;
pub use controller::PageController;
pub use debounce::Debouncer;
pub use error::{FetchError, GridError};
pub use filter::{
    dedup_predicates, merge_mandatory, search_predicate, FilterOperator, FilterPredicate,
    FilterScope, FilterValue, MandatoryFilters, NoScope, Scalar,
};
pub use handle::GridHandle;
pub use message::{FetchOutcome, Intent, Response};
pub use request::{last_page_index, page_count, FetchRequest, PageRequest};
pub use response::{FetchResponse, FetchResult, PageInfo};
pub use sort::{SortDirection, Sorting};
pub use source::{from_fn, DataSource, ErrorNotifier, FnSource, LogNotifier};
pub use state::{ControllerState, Phase};
pub use tokio_util::sync::CancellationToken;
