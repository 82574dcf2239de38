//! # Controller Messages
//!
//! Intents travel from a [`GridHandle`](crate::GridHandle) to the controller task over an
//! mpsc channel, each carrying a oneshot responder. The responder fires once the intent
//! has been applied to the state (and any fetch has been *issued*), not when the
//! fetch resolves; watch the state for that.
//!
//! [`FetchOutcome`] is the internal message a spawned fetch sends back.

use crate::error::{FetchError, GridError};
use crate::filter::FilterPredicate;
use crate::request::FetchRequest;
use crate::response::FetchResponse;
use crate::sort::Sorting;
use tokio::sync::oneshot;

/// Type alias for the one-shot acknowledgement channel.
pub type Response<T> = oneshot::Sender<Result<T, GridError>>;

/// A user-driven intent.
#[derive(Debug)]
pub enum Intent {
    /// Initial fetch when the view mounts. Ignored once a fetch has been issued.
    Mount { respond_to: Response<()> },
    SetPage {
        index: u32,
        respond_to: Response<()>,
    },
    SetPageSize {
        size: u32,
        respond_to: Response<()>,
    },
    /// `None` returns to the configured default sort.
    SetSort {
        sorting: Option<Sorting>,
        respond_to: Response<()>,
    },
    SetSearchTerm {
        text: String,
        respond_to: Response<()>,
    },
    SetFilters {
        filters: Vec<FilterPredicate>,
        respond_to: Response<()>,
    },
    /// Re-issue the current request unchanged.
    Refresh { respond_to: Response<()> },
    /// The mandatory scope changed: back to page 0 and fetch.
    Reload { respond_to: Response<()> },
    Dispose { respond_to: Response<()> },
}

/// Settled fetch, tagged with the sequence number it was issued under.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub seq: u64,
    pub request: FetchRequest,
    pub result: Result<FetchResponse<T>, FetchError>,
}
