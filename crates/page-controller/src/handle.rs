//! # Grid Handle
//!
//! The client half of a [`PageController`](crate::PageController). A view holds a
//! `GridHandle`, dispatches intents through it and reads [`ControllerState`]
//! snapshots. Cloning is cheap: a sender plus a watch receiver.

use crate::error::GridError;
use crate::filter::FilterPredicate;
use crate::message::{Intent, Response};
use crate::sort::{SortDirection, Sorting};
use crate::state::ControllerState;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::instrument;

#[derive(Clone)]
pub struct GridHandle<T> {
    sender: mpsc::Sender<Intent>,
    state: watch::Receiver<ControllerState<T>>,
}

impl<T: Clone> GridHandle<T> {
    pub fn new(sender: mpsc::Sender<Intent>, state: watch::Receiver<ControllerState<T>>) -> Self {
        Self { sender, state }
    }

    async fn dispatch(
        &self,
        intent: impl FnOnce(Response<()>) -> Intent,
    ) -> Result<(), GridError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(intent(respond_to))
            .await
            .map_err(|_| GridError::ControllerClosed)?;
        response.await.map_err(|_| GridError::ControllerDropped)?
    }

    /// Issues the first fetch if none has been issued yet.
    pub async fn mount(&self) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::Mount { respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn set_page(&self, index: u32) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::SetPage { index, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_page_size(&self, size: u32) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::SetPageSize { size, respond_to })
            .await
    }

    #[instrument(skip(self, key), fields(key = %key.as_ref()))]
    pub async fn set_sort(
        &self,
        key: impl AsRef<str>,
        direction: SortDirection,
    ) -> Result<(), GridError> {
        let sorting = Some(Sorting::new(key.as_ref(), direction));
        self.dispatch(|respond_to| Intent::SetSort {
            sorting,
            respond_to,
        })
        .await
    }

    /// Back to the configured default sort.
    pub async fn clear_sort(&self) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::SetSort {
            sorting: None,
            respond_to,
        })
        .await
    }

    /// Stores the text at once; the fetch waits for the debounce window.
    pub async fn set_search_term(&self, text: impl Into<String>) -> Result<(), GridError> {
        let text = text.into();
        self.dispatch(|respond_to| Intent::SetSearchTerm { text, respond_to })
            .await
    }

    #[instrument(skip(self, filters), fields(count = filters.len()))]
    pub async fn set_filters(&self, filters: Vec<FilterPredicate>) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::SetFilters {
            filters,
            respond_to,
        })
        .await
    }

    /// Re-fetches the current page, e.g. after a create/update/delete.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::Refresh { respond_to })
            .await
    }

    /// Back to page 0 and fetch, for when the mandatory scope changed.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::Reload { respond_to })
            .await
    }

    /// Cancels pending work and stops the controller.
    pub async fn dispose(&self) -> Result<(), GridError> {
        self.dispatch(|respond_to| Intent::Dispose { respond_to })
            .await
    }

    /// Current snapshot.
    pub fn state(&self) -> ControllerState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerState<T>> {
        self.state.clone()
    }

    /// Waits for the first snapshot matching `predicate`, checking the current one first.
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&ControllerState<T>) -> bool,
    ) -> Result<ControllerState<T>, GridError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(predicate)
            .await
            .map_err(|_| GridError::ControllerClosed)?;
        Ok(snapshot.clone())
    }

    /// Waits until nothing is loading.
    pub async fn settled(&self) -> Result<ControllerState<T>, GridError> {
        self.wait_until(|s| !s.loading).await
    }
}
