use crate::{
    session::SessionContext,
    spotify::{ApiError, SpotifyApi, retry::Sleeper},
    types::{AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse},
    utils, warning,
};

/// Spotify accepts at most 100 URIs per add request.
const ADD_TRACKS_CHUNK: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTracksOutcome {
    Added(usize),
    /// No valid track URI was left after filtering; nothing was sent.
    NothingToAdd,
    Failed,
}

/// Creates a private playlist owned by `user_id`.
///
/// Returns `None` on any failure; the reason is printed as a warning.
pub async fn create_playlist<C, S>(
    ctx: &SessionContext<C, S>,
    user_id: &str,
    name: &str,
    description: &str,
) -> Option<String>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = ctx.api.base_url(),
        user_id = user_id
    );
    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public: false,
        collaborative: false,
    };

    let body = match post(ctx, &url, &request).await {
        Ok(body) => body,
        Err(e) => {
            warning!("Failed to create playlist {}: {}", name, e);
            return None;
        }
    };

    match serde_json::from_value::<CreatePlaylistResponse>(body) {
        Ok(created) => Some(created.id),
        Err(e) => {
            warning!("Unexpected answer when creating playlist {}: {}", name, e);
            None
        }
    }
}

/// Appends every valid track URI in `uris` to the playlist.
///
/// # Arguments
///
/// * `ctx` - Session providing the API client
/// * `playlist_id` - Target playlist, as returned by [`create_playlist`]
/// * `uris` - Candidate URIs; anything that is not a valid track URI is dropped
///
/// # Returns
///
/// - `Added(n)` - All `n` valid URIs were sent, in chunks of 100
/// - `NothingToAdd` - Nothing valid was left; the endpoint was not called
/// - `Failed` - A chunk was rejected; earlier chunks stay in the playlist
///
/// # Example
///
/// ```
/// if let Some(id) = create_playlist(&ctx, &user.id, "Rainy Sunday", "Mood: calm.").await {
///     match add_tracks(&ctx, &id, &uris).await {
///         AddTracksOutcome::Added(n) => success!("Added {} tracks", n),
///         AddTracksOutcome::NothingToAdd => warning!("Nothing to add"),
///         AddTracksOutcome::Failed => warning!("Adding tracks failed"),
///     }
/// }
/// ```
pub async fn add_tracks<C, S>(
    ctx: &SessionContext<C, S>,
    playlist_id: &str,
    uris: &[String],
) -> AddTracksOutcome
where
    C: SpotifyApi,
    S: Sleeper,
{
    let uris: Vec<String> = uris
        .iter()
        .filter(|uri| utils::is_track_uri(uri))
        .cloned()
        .collect();

    if uris.is_empty() {
        return AddTracksOutcome::NothingToAdd;
    }

    let url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = ctx.api.base_url(),
        id = playlist_id
    );

    let mut added = 0;
    for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
        let request = AddTrackToPlaylistRequest {
            uris: chunk.to_vec(),
        };
        if let Err(e) = post(ctx, &url, &request).await {
            warning!("Failed to add tracks to playlist: {}", e);
            return AddTracksOutcome::Failed;
        }
        added += chunk.len();
    }

    AddTracksOutcome::Added(added)
}

async fn post<C, S, B>(
    ctx: &SessionContext<C, S>,
    url: &str,
    body: &B,
) -> Result<serde_json::Value, ApiError>
where
    C: SpotifyApi,
    S: Sleeper,
    B: serde::Serialize,
{
    let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    ctx.api.post_json(url, &body).await
}
