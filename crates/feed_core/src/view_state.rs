/// Observable outcome of the most recent request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Completed(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// The failure message, or an empty string for any other variant.
    pub fn error_message(&self) -> &str {
        match self {
            ViewState::Failed(message) => message,
            ViewState::Loading | ViewState::Completed(_) => "",
        }
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            ViewState::Completed(response) => Some(response),
            ViewState::Loading | ViewState::Failed(_) => None,
        }
    }
}

impl<T> ViewState<Vec<T>> {
    /// Completed records, or an empty slice while loading or after a failure.
    pub fn items(&self) -> &[T] {
        self.completed().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<T> Default for ViewState<Vec<T>> {
    fn default() -> Self {
        ViewState::Completed(Vec::new())
    }
}
