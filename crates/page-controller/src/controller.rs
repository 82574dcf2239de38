//! # Page Controller
//!
//! [`PageController`] is the server half of a list screen. It owns the
//! [`ControllerState`] for one table and turns intents into fetches against a
//! [`DataSource`].
//!
//! ## Event Loop
//!
//! Three event sources are multiplexed in a single task:
//!
//! - intents from [`GridHandle`]s,
//! - [`FetchOutcome`]s from spawned fetch tasks,
//! - the search [`Debouncer`] deadline.
//!
//! Only this task mutates the state, so no locks are involved. Views read snapshots
//! through a `watch` channel.
//!
//! ## Last-Issued-Wins
//!
//! Every fetch gets the next sequence number and a fresh child
//! [`CancellationToken`]. Issuing a new fetch cancels the previous token so the
//! transport can abort, and an outcome whose sequence is not the latest is dropped
//! without touching the state. An older, slower response can therefore never
//! overwrite a newer one.

use crate::config::ControllerConfig;
use crate::debounce::Debouncer;
use crate::error::{FetchError, GridError};
use crate::filter::{dedup_predicates, FilterScope, NoScope};
use crate::handle::GridHandle;
use crate::message::{FetchOutcome, Intent};
use crate::request::{last_page_index, FetchRequest, MAX_PAGE_INDEX};
use crate::response::FetchResponse;
use crate::source::{DataSource, ErrorNotifier, LogNotifier};
use crate::state::{ControllerState, Phase};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Controller task for one server-paginated table.
///
/// # Usage Pattern
///
/// 1. **Create**: `PageController::new(source, config)` returns the controller and a
///    [`GridHandle`].
/// 2. **Wire**: attach a notifier and a filter scope with the `with_*` builders.
/// 3. **Run**: spawn [`PageController::run`] (or call [`PageController::spawn`]).
///
/// ```rust
/// use page_controller::{
///     from_fn, CancellationToken, ControllerConfig, FetchError, FetchRequest, FetchResponse,
///     PageController,
/// };
///
/// #[tokio::main]
/// async fn main() {
///     let source = from_fn(|request: FetchRequest, _cancel: CancellationToken| async move {
///         let start = request.offset() as u64;
///         let rows: Vec<u64> = (start..(start + request.page_size as u64).min(57)).collect();
///         Ok::<_, FetchError>(FetchResponse::new(rows, 57))
///     });
///
///     let (controller, handle) = PageController::new(source, ControllerConfig::default());
///     controller.spawn();
///
///     let state = handle.settled().await.unwrap();
///     assert_eq!(state.rows.len(), 20);
///     assert_eq!(state.total_count, 57);
/// }
/// ```
pub struct PageController<T> {
    entity: String,
    config: ControllerConfig,
    source: Arc<dyn DataSource<T>>,
    notifier: Arc<dyn ErrorNotifier>,
    scope: Arc<dyn FilterScope>,
    intents: mpsc::Receiver<Intent>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome<T>>,
    outcomes: mpsc::UnboundedReceiver<FetchOutcome<T>>,
    publisher: watch::Sender<ControllerState<T>>,
    state: ControllerState<T>,
    debouncer: Debouncer,
    seq: u64,
    in_flight: Option<CancellationToken>,
    shutdown: CancellationToken,
    /// Phase to return to if the latest request settles as cancelled.
    settled_phase: Phase,
}

impl<T> PageController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        source: impl DataSource<T>,
        config: ControllerConfig,
    ) -> (Self, GridHandle<T>) {
        let (sender, intents) = mpsc::channel(config.channel_capacity.max(1));
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        let mut state = ControllerState::new(config.initial_page_size());
        if config.auto_fetch {
            // `run` issues the mount fetch first thing.
            state.loading = true;
            state.phase = Phase::Loading;
        }
        let (publisher, watcher) = watch::channel(state.clone());

        let controller = Self {
            entity: "rows".to_string(),
            debouncer: Debouncer::new(config.debounce()),
            config,
            source: Arc::new(source),
            notifier: Arc::new(LogNotifier),
            scope: Arc::new(NoScope),
            intents,
            outcome_tx,
            outcomes,
            publisher,
            state,
            seq: 0,
            in_flight: None,
            shutdown: CancellationToken::new(),
            settled_phase: Phase::Idle,
        };
        (controller, GridHandle::new(sender, watcher))
    }

    /// Label used in log records (e.g. `"products"`).
    pub fn with_name(mut self, entity: impl Into<String>) -> Self {
        self.entity = entity.into();
        self
    }

    pub fn with_notifier(mut self, notifier: impl ErrorNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn with_scope(mut self, scope: impl FilterScope) -> Self {
        self.scope = Arc::new(scope);
        self
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs the event loop until disposed or every handle is dropped.
    pub async fn run(mut self) {
        info!(entity = %self.entity, page_size = self.state.request.page_size, "Controller started");

        if self.config.auto_fetch {
            self.issue_fetch("mount");
        }

        loop {
            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(Intent::Dispose { respond_to }) => {
                        self.dispose();
                        let _ = respond_to.send(Ok(()));
                        break;
                    }
                    Some(intent) => self.handle_intent(intent),
                    None => break,
                },
                Some(outcome) = self.outcomes.recv() => self.handle_outcome(outcome),
                _ = self.debouncer.elapsed() => self.apply_search_term(),
            }
        }

        self.dispose();
        info!(entity = %self.entity, requests = self.seq, "Shutdown");
    }

    fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Mount { respond_to } => {
                if self.seq == 0 {
                    self.issue_fetch("mount");
                }
                let _ = respond_to.send(Ok(()));
            }
            Intent::SetPage { index, respond_to } => {
                let index = self.clamp_to_known_total(index);
                if index != self.state.request.page_index {
                    debug!(entity = %self.entity, index, "SetPage");
                    self.state.request.page_index = index;
                    self.issue_fetch("page");
                }
                let _ = respond_to.send(Ok(()));
            }
            Intent::SetPageSize { size, respond_to } => {
                if !self.config.is_allowed_page_size(size) {
                    warn!(entity = %self.entity, size, "Rejected page size");
                    let _ = respond_to.send(Err(GridError::InvalidPageSize {
                        size,
                        allowed: self.config.page_sizes.clone(),
                    }));
                    return;
                }
                debug!(entity = %self.entity, size, "SetPageSize");
                self.state.request.page_size = size;
                self.state.request.page_index = 0;
                self.issue_fetch("page_size");
                let _ = respond_to.send(Ok(()));
            }
            Intent::SetSort { sorting, respond_to } => {
                debug!(entity = %self.entity, ?sorting, "SetSort");
                self.state.request.sorting = sorting;
                self.state.request.page_index = 0;
                self.issue_fetch("sort");
                let _ = respond_to.send(Ok(()));
            }
            Intent::SetSearchTerm { text, respond_to } => {
                self.state.search_input = text;
                self.debouncer.arm();
                self.publish();
                let _ = respond_to.send(Ok(()));
            }
            Intent::SetFilters {
                filters,
                respond_to,
            } => {
                if let Err(e) = filters.iter().try_for_each(|f| f.validate()) {
                    warn!(entity = %self.entity, error = %e, "Rejected filters");
                    let _ = respond_to.send(Err(e));
                    return;
                }
                let filters = dedup_predicates(filters);
                debug!(entity = %self.entity, count = filters.len(), "SetFilters");
                self.state.request.filters = filters;
                self.state.request.page_index = 0;
                self.issue_fetch("filters");
                let _ = respond_to.send(Ok(()));
            }
            Intent::Refresh { respond_to } => {
                self.issue_fetch("refresh");
                let _ = respond_to.send(Ok(()));
            }
            Intent::Reload { respond_to } => {
                self.state.request.page_index = 0;
                self.issue_fetch("reload");
                let _ = respond_to.send(Ok(()));
            }
            Intent::Dispose { respond_to } => {
                // Handled in `run`, which also stops the loop.
                self.dispose();
                let _ = respond_to.send(Ok(()));
            }
        }
    }

    /// Debounce window elapsed: apply the trimmed search text.
    fn apply_search_term(&mut self) {
        let term = self.state.search_input.trim().to_string();
        if term == self.state.request.search_term {
            debug!(entity = %self.entity, "Search term unchanged");
            return;
        }
        debug!(entity = %self.entity, term = %term, "Search applied");
        self.state.request.search_term = term;
        self.state.request.page_index = 0;
        self.issue_fetch("search");
    }

    /// Pulls `index` back to the last page that the last known total can fill.
    ///
    /// With no known total the index is only capped so its 1-based page number fits.
    fn clamp_to_known_total(&self, index: u32) -> u32 {
        let index = index.min(MAX_PAGE_INDEX);
        let total = self.state.total_count;
        let size = self.state.request.page_size;
        if total > 0 && u64::from(index) * u64::from(size) >= total {
            last_page_index(total, size)
        } else {
            index
        }
    }

    fn issue_fetch(&mut self, reason: &'static str) {
        let request = self.state.request.compose(&self.config, self.scope.as_ref());

        if let Some(previous) = self.in_flight.take() {
            debug!(entity = %self.entity, superseded = self.seq, "Cancelling in-flight fetch");
            previous.cancel();
        }
        self.seq += 1;
        let seq = self.seq;
        let token = self.shutdown.child_token();
        self.in_flight = Some(token.clone());

        if !self.state.loading {
            self.settled_phase = self.state.phase;
        }
        self.state.loading = true;
        self.state.phase = Phase::Loading;
        self.state.generation = seq;
        self.publish();

        debug!(
            entity = %self.entity,
            seq,
            reason,
            page = request.page_number,
            size = request.page_size,
            filters = request.filters.len(),
            "Fetch issued"
        );

        let source = Arc::clone(&self.source);
        let outcome_tx = self.outcome_tx.clone();
        let timeout = self.config.request_timeout();
        tokio::spawn(async move {
            let call = fetch_with_timeout(source.as_ref(), request.clone(), token.clone(), timeout);
            let result = tokio::select! {
                _ = token.cancelled() => Err(FetchError::Cancelled),
                result = call => result,
            };
            let _ = outcome_tx.send(FetchOutcome {
                seq,
                request,
                result,
            });
        });
    }

    fn handle_outcome(&mut self, outcome: FetchOutcome<T>) {
        if outcome.seq != self.seq {
            debug!(entity = %self.entity, seq = outcome.seq, latest = self.seq, "Discarding superseded response");
            return;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(response) => {
                let result = response.into_result(&outcome.request);
                if result.rows.is_empty() && self.state.request.is_past_end(result.total_count) {
                    let last = last_page_index(result.total_count, self.state.request.page_size);
                    info!(
                        entity = %self.entity,
                        from = self.state.request.page_index,
                        to = last,
                        total = result.total_count,
                        "Page past end, clamping"
                    );
                    self.state.request.page_index = last;
                    self.state.total_count = result.total_count;
                    self.issue_fetch("clamp");
                    return;
                }

                info!(
                    entity = %self.entity,
                    seq = outcome.seq,
                    rows = result.rows.len(),
                    total = result.total_count,
                    "Fetch ok"
                );
                self.state.rows = result.rows;
                self.state.total_count = result.total_count;
                self.state.page_info = Some(result.page_info);
                self.state.last_error = None;
                self.state.phase = Phase::Ready;
                self.state.loading = false;
                self.publish();
            }
            Err(e) if e.is_cancellation() => {
                debug!(entity = %self.entity, seq = outcome.seq, "Fetch cancelled");
                self.state.loading = false;
                self.state.phase = self.settled_phase;
                self.publish();
            }
            Err(e) => {
                let message = e.to_string();
                warn!(entity = %self.entity, seq = outcome.seq, error = %message, "Fetch failed");
                self.state.rows.clear();
                self.state.total_count = 0;
                self.state.page_info = None;
                self.state.last_error = Some(message.clone());
                self.state.phase = Phase::Errored;
                self.state.loading = false;
                self.publish();
                self.notifier.notify_error(&message);
            }
        }
    }

    /// Cancels the pending debounce and the in-flight request.
    fn dispose(&mut self) {
        if self.debouncer.cancel() {
            debug!(entity = %self.entity, "Pending search dropped");
        }
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.shutdown.cancel();
        if self.state.loading {
            self.state.loading = false;
            self.state.phase = self.settled_phase;
            self.publish();
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

async fn fetch_with_timeout<T: 'static>(
    source: &dyn DataSource<T>,
    request: FetchRequest,
    cancel: CancellationToken,
    timeout: Option<Duration>,
) -> Result<FetchResponse<T>, FetchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, source.fetch(request, cancel))
            .await
            .unwrap_or(Err(FetchError::Timeout(limit))),
        None => source.fetch(request, cancel).await,
    }
}
