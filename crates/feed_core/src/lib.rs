//! Photo feed core: view state, observers, subscriptions and the photos view-model.
mod observer;
mod subscription;
mod view_model;
mod view_state;

pub use observer::{ChannelObserver, ObserverId, ObserverList, StateObserver};
pub use subscription::{Subscription, SubscriptionSet};
pub use view_model::PhotosViewModel;
pub use view_state::ViewState;
