use std::sync::Arc;

use feed_api::{FailureKind, NetworkError, OrderBy, Photo, PhotoService, PhotosEndpoint};
use feed_logging::{feed_debug, feed_info, feed_warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{ObserverId, ObserverList, StateObserver, Subscription, SubscriptionSet, ViewState};

type RequestId = u64;

struct Completion {
    request: RequestId,
    order_by: OrderBy,
    result: Result<Vec<Photo>, NetworkError>,
}

/// Sends the outcome of one request back to its view-model exactly once.
///
/// Dropped without an outcome (its task was torn down with the runtime), it
/// reports a failure so the request never stays `Loading`.
struct PendingReply {
    request: RequestId,
    order_by: OrderBy,
    completion_tx: Option<mpsc::UnboundedSender<Completion>>,
    delivery: CancellationToken,
}

impl PendingReply {
    fn deliver(mut self, result: Result<Vec<Photo>, NetworkError>) {
        self.send(result);
    }

    fn discard(mut self) {
        self.completion_tx = None;
    }

    fn send(&mut self, result: Result<Vec<Photo>, NetworkError>) {
        let Some(completion_tx) = self.completion_tx.take() else {
            return;
        };
        if self.delivery.is_cancelled() {
            return;
        }
        let _ = completion_tx.send(Completion {
            request: self.request,
            order_by: self.order_by,
            result,
        });
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.send(Err(NetworkError::new(
            FailureKind::Network,
            "request dropped before completing",
        )));
    }
}

/// Loads photo listings and publishes the outcome as a [`ViewState`].
///
/// Requests run on the supplied tokio runtime; their results are applied on
/// the thread that owns the view-model, through [`PhotosViewModel::process_pending`]
/// or [`PhotosViewModel::wait_for_response`]. Observers see every transition
/// in registration order.
pub struct PhotosViewModel {
    service: Arc<dyn PhotoService>,
    runtime: Handle,
    state: ViewState<Vec<Photo>>,
    observers: ObserverList<Vec<Photo>>,
    subscriptions: SubscriptionSet,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    next_request: RequestId,
    in_flight: usize,
    torn_down: bool,
}

impl PhotosViewModel {
    pub fn new(service: Arc<dyn PhotoService>, runtime: Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            service,
            runtime,
            state: ViewState::default(),
            observers: ObserverList::new(),
            subscriptions: SubscriptionSet::new(),
            completion_tx,
            completion_rx,
            next_request: 1,
            in_flight: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Photo>> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error_message(&self) -> &str {
        self.state.error_message()
    }

    pub fn photos(&self) -> &[Photo] {
        self.state.items()
    }

    /// Requests issued but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn subscribe(&mut self, observer: impl StateObserver<Vec<Photo>> + 'static) -> ObserverId {
        self.observers.register(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Switches to `Loading` and requests the listing for `order_by`.
    ///
    /// A pending request is not cancelled by a newer one. Both results are
    /// applied in arrival order, so the state ends up reflecting whichever
    /// response arrives last, not whichever request was issued last.
    pub fn load(&mut self, order_by: OrderBy) {
        if self.torn_down {
            feed_warn!("load({}) ignored after teardown", order_by);
            return;
        }

        self.set_state(ViewState::Loading);

        let request = self.next_request;
        self.next_request += 1;
        feed_info!("request={} loading photos order_by={}", request, order_by);

        let endpoint = PhotosEndpoint::photos(order_by);
        let service = Arc::clone(&self.service);
        let delivery = CancellationToken::new();
        let reply = PendingReply {
            request,
            order_by,
            completion_tx: Some(self.completion_tx.clone()),
            delivery: delivery.clone(),
        };

        let fetch = self
            .runtime
            .spawn(async move { service.fetch_photos(&endpoint).await });
        let abort = fetch.abort_handle();
        self.runtime.spawn(async move {
            match fetch.await {
                Ok(result) => reply.deliver(result),
                Err(err) if err.is_cancelled() => reply.discard(),
                Err(err) => reply.deliver(Err(NetworkError::new(
                    FailureKind::Network,
                    format!("request task failed: {err}"),
                ))),
            }
        });

        self.subscriptions
            .insert(Subscription::new("request", move || abort.abort()));
        self.subscriptions
            .insert(Subscription::new("delivery", move || delivery.cancel()));
        self.in_flight += 1;
    }

    /// Applies every completion that has already arrived. Never blocks.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next completion and applies it.
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn wait_for_response(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completion_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Cancels every held subscription. Safe to call repeatedly; also runs on drop.
    ///
    /// Returns how many subscriptions this call cancelled.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.subscriptions.cancel_all();
        if !self.torn_down {
            self.torn_down = true;
            self.completion_rx.close();
            while self.completion_rx.try_recv().is_ok() {}
            self.in_flight = 0;
            feed_debug!("teardown cancelled {} subscriptions", cancelled);
        }
        cancelled
    }

    fn apply(&mut self, completion: Completion) {
        if self.torn_down {
            return;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion {
            request,
            order_by,
            result,
        } = completion;
        match result {
            Ok(photos) => {
                feed_debug!(
                    "request={} order_by={} completed with {} photos",
                    request,
                    order_by,
                    photos.len()
                );
                self.set_state(ViewState::Completed(photos));
            }
            Err(err) => {
                feed_warn!(
                    "request={} order_by={} failed ({}): {}",
                    request,
                    order_by,
                    err.kind,
                    err.message
                );
                self.set_state(ViewState::Failed(err.message));
            }
        }
    }

    fn set_state(&mut self, state: ViewState<Vec<Photo>>) {
        self.state = state;
        self.observers.notify(&self.state);
    }
}

impl Drop for PhotosViewModel {
    fn drop(&mut self) {
        self.teardown();
    }
}
