use feed_api::Photo;
use feed_core::ViewState;

pub fn render_state(state: &ViewState<Vec<Photo>>) -> String {
    match state {
        ViewState::Loading => "loading photos...".to_string(),
        ViewState::Completed(photos) if photos.is_empty() => "no photos".to_string(),
        ViewState::Completed(photos) => format!("loaded {} photos", photos.len()),
        ViewState::Failed(message) => format!("failed: {message}"),
    }
}

/// One listing line: id, author, likes and display url.
pub fn render_photo(photo: &Photo) -> String {
    let author = photo
        .user
        .as_ref()
        .map(|user| user.name.as_deref().unwrap_or(&user.username))
        .unwrap_or("unknown");
    let url = if photo.urls.regular.is_empty() {
        "-"
    } else {
        photo.urls.regular.as_str()
    };
    format!("{:<12} {:<24} {:>6} likes  {}", photo.id, author, photo.likes, url)
}
