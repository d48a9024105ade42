use std::sync::mpsc;

use crate::ViewState;

/// Receives every state transition of a view-model.
pub trait StateObserver<T> {
    fn on_change(&self, state: &ViewState<T>);
}

impl<T, F> StateObserver<T> for F
where
    F: Fn(&ViewState<T>),
{
    fn on_change(&self, state: &ViewState<T>) {
        self(state)
    }
}

/// Forwards snapshots of each transition over a channel.
pub struct ChannelObserver<T> {
    tx: mpsc::Sender<ViewState<T>>,
}

impl<T> ChannelObserver<T> {
    pub fn new(tx: mpsc::Sender<ViewState<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Clone> StateObserver<T> for ChannelObserver<T> {
    fn on_change(&self, state: &ViewState<T>) {
        let _ = self.tx.send(state.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Registered observers, notified in registration order.
pub struct ObserverList<T> {
    entries: Vec<(ObserverId, Box<dyn StateObserver<T>>)>,
    next_id: u64,
}

impl<T> ObserverList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn register(&mut self, observer: Box<dyn StateObserver<T>>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&self, state: &ViewState<T>) {
        for (_, observer) in &self.entries {
            observer.on_change(state);
        }
    }
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}
