//! # Test Doubles
//!
//! Two ways to stand in for a backend, plus a notifier that records toasts.
//!
//! | Double | Use it when |
//! |--------|-------------|
//! | [`create_mock_source`] + [`expect_fetch`] | The test must decide *when* and *in which order* responses arrive (races, cancellation). |
//! | [`MockSource`] | A queue of canned responses is enough. |
//! | [`RecordingNotifier`] | Asserting how many toasts fired and what they said. |
//!
//! ## Driving Responses by Hand
//!
//! ```rust
//! use page_controller::mock::{create_mock_source, expect_fetch};
//! use page_controller::{ControllerConfig, FetchResponse, PageController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (source, mut calls) = create_mock_source::<u32>(8);
//!     let (controller, handle) = PageController::new(source, ControllerConfig::default());
//!     controller.spawn();
//!
//!     let call = expect_fetch(&mut calls).await.expect("mount fetch");
//!     assert_eq!(call.request.page_number, 1);
//!     call.respond(Ok(FetchResponse::new(vec![1, 2, 3], 3)));
//!
//!     let state = handle.settled().await.unwrap();
//!     assert_eq!(state.rows, vec![1, 2, 3]);
//! }
//! ```
//!
//! ## Canned Responses
//!
//! ```rust
//! use page_controller::mock::MockSource;
//! use page_controller::{ControllerConfig, FetchError, PageController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockSource::<u32>::new();
//!     mock.expect_fetch().return_err(FetchError::Transport("offline".into()));
//!
//!     let (controller, handle) = PageController::new(mock.clone(), ControllerConfig::default());
//!     controller.spawn();
//!
//!     let state = handle.settled().await.unwrap();
//!     assert!(state.last_error.is_some());
//!     mock.verify();
//! }
//! ```

use crate::error::FetchError;
use crate::request::FetchRequest;
use crate::response::FetchResponse;
use crate::source::{DataSource, ErrorNotifier};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

// =============================================================================
// HAND-DRIVEN SOURCE
// =============================================================================

/// One fetch captured by a [`ChannelSource`].
pub struct FetchCall<T> {
    pub request: FetchRequest,
    pub cancel: CancellationToken,
    respond_to: oneshot::Sender<Result<FetchResponse<T>, FetchError>>,
}

impl<T> FetchCall<T> {
    /// Completes the call. Returns false if the caller already gave up.
    pub fn respond(self, result: Result<FetchResponse<T>, FetchError>) -> bool {
        self.respond_to.send(result).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A source that forwards every call to a channel the test reads.
pub struct ChannelSource<T> {
    sender: mpsc::Sender<FetchCall<T>>,
}

#[async_trait]
impl<T: Send + 'static> DataSource<T> for ChannelSource<T> {
    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> Result<FetchResponse<T>, FetchError> {
        let (respond_to, response) = oneshot::channel();
        let call = FetchCall {
            request,
            cancel: cancel.clone(),
            respond_to,
        };
        self.sender
            .send(call)
            .await
            .map_err(|_| FetchError::Transport("mock receiver dropped".into()))?;
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = response => result
                .unwrap_or_else(|_| Err(FetchError::Transport("mock responder dropped".into()))),
        }
    }
}

/// Creates a hand-driven source and the receiver the test reads calls from.
pub fn create_mock_source<T>(buffer_size: usize) -> (ChannelSource<T>, mpsc::Receiver<FetchCall<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelSource { sender }, receiver)
}

/// Next captured call, or `None` once the source is gone.
pub async fn expect_fetch<T>(receiver: &mut mpsc::Receiver<FetchCall<T>>) -> Option<FetchCall<T>> {
    receiver.recv().await
}

// =============================================================================
// CANNED SOURCE
// =============================================================================

struct Expectation<T> {
    delay: Option<Duration>,
    response: Result<FetchResponse<T>, FetchError>,
}

struct MockInner<T> {
    expectations: VecDeque<Expectation<T>>,
    calls: Vec<FetchRequest>,
}

/// A source that replies from a queue of expectations and records requests.
///
/// A call with no queued expectation fails with a transport error, which shows
/// up as an `Errored` controller rather than a hung one.
pub struct MockSource<T> {
    inner: Arc<Mutex<MockInner<T>>>,
}

impl<T> Clone for MockSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for MockSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MockSource<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                expectations: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }

    pub fn expect_fetch(&self) -> FetchExpectationBuilder<T> {
        FetchExpectationBuilder {
            inner: Arc::clone(&self.inner),
            delay: None,
        }
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<FetchRequest> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).calls.len()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !inner.expectations.is_empty() {
            panic!(
                "Not all fetch expectations were met. {} remaining",
                inner.expectations.len()
            );
        }
    }
}

#[async_trait]
impl<T: Send + 'static> DataSource<T> for MockSource<T> {
    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> Result<FetchResponse<T>, FetchError> {
        let expectation = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.calls.push(request);
            inner.expectations.pop_front()
        };
        let Some(expectation) = expectation else {
            return Err(FetchError::Transport("no fetch expectation set".into()));
        };
        if let Some(delay) = expectation.delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
        expectation.response
    }
}

/// Builder for one queued response.
pub struct FetchExpectationBuilder<T> {
    inner: Arc<Mutex<MockInner<T>>>,
    delay: Option<Duration>,
}

impl<T> FetchExpectationBuilder<T> {
    /// Holds the response back for `delay` (cancellable).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, rows: Vec<T>, total_count: u64) {
        self.push(Ok(FetchResponse::new(rows, total_count)));
    }

    pub fn return_response(self, response: FetchResponse<T>) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: FetchError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<FetchResponse<T>, FetchError>) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.expectations.push_back(Expectation {
            delay: self.delay,
            response,
        });
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

/// Collects every toast message.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl ErrorNotifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
    }
}
