use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric, seq::index};
use sha2::{Digest, Sha256};

use crate::types::TrackObject;

pub const TRACK_URI_PREFIX: &str = "spotify:track:";

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// True for `spotify:track:<id>` where the id is non-empty ASCII alphanumeric.
pub fn is_track_uri(uri: &str) -> bool {
    match uri.strip_prefix(TRACK_URI_PREFIX) {
        Some(id) => !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

/// Third segment of a `spotify:<kind>:<id>` URI.
pub fn id_from_uri(uri: &str) -> Option<&str> {
    uri.split(':').nth(2).filter(|id| !id.is_empty())
}

/// Draws `min(sample_cap, tracks.len())` tracks without replacement and
/// renders them as `"title - artist"`, keeping playlist order.
pub fn sample_track_labels<R: Rng + ?Sized>(
    tracks: &[TrackObject],
    sample_cap: usize,
    rng: &mut R,
) -> Vec<String> {
    let amount = sample_cap.min(tracks.len());
    let mut picked = index::sample(rng, tracks.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| tracks[i].label()).collect()
}

/// Search query for a recommendation; the artist filter is dropped when blank.
pub fn search_query(title: &str, artist: &str) -> String {
    let title = title.trim();
    let artist = artist.trim();
    if artist.is_empty() {
        format!("track:\"{}\"", title)
    } else {
        format!("track:\"{}\" artist:\"{}\"", title, artist)
    }
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
