use feed_core::ViewState;

#[test]
fn default_listing_state_is_empty_completed() {
    let state: ViewState<Vec<u32>> = ViewState::default();
    assert_eq!(state, ViewState::Completed(Vec::new()));
    assert!(!state.is_loading());
    assert_eq!(state.error_message(), "");
    assert!(state.items().is_empty());
}

#[test]
fn loading_projects_nothing() {
    let state: ViewState<Vec<u32>> = ViewState::Loading;
    assert!(state.is_loading());
    assert_eq!(state.error_message(), "");
    assert!(state.items().is_empty());
    assert!(state.completed().is_none());
}

#[test]
fn completed_projects_items() {
    let state = ViewState::Completed(vec![1, 2]);
    assert!(!state.is_loading());
    assert_eq!(state.error_message(), "");
    assert_eq!(state.items(), &[1, 2]);
}

#[test]
fn failed_projects_message_only() {
    let state: ViewState<Vec<u32>> = ViewState::Failed("timeout".to_string());
    assert!(!state.is_loading());
    assert_eq!(state.error_message(), "timeout");
    assert!(state.items().is_empty());
}
