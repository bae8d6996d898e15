use std::fmt;

use indexmap::IndexMap;
use rand::Rng;
use serde_json::Value;

use crate::{
    config::CollectionLimits,
    session::SessionContext,
    spotify::{
        client::{ApiError, SpotifyApi},
        retry::{Sleeper, get_with_retry},
    },
    types::{
        ArtistObject, Page, PlaylistEntry, PlaylistItem, Profile, ProfileEntry,
        SimplifiedPlaylist, TrackObject,
    },
    utils, warning,
};

/// Largest `limit` the top-items and playlist listing endpoints accept.
pub const MAX_PAGE_SIZE: usize = 50;
/// Largest `limit` the playlist items endpoint accepts.
pub const MAX_PLAYLIST_ITEMS_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopKind {
    Tracks,
    Artists,
}

impl fmt::Display for TopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopKind::Tracks => write!(f, "tracks"),
            TopKind::Artists => write!(f, "artists"),
        }
    }
}

impl TopKind {
    fn entry(&self, item: Value) -> Option<ProfileEntry> {
        let (uri, name, context) = match self {
            TopKind::Tracks => {
                let track: TrackObject = serde_json::from_value(item).ok()?;
                let context = track.primary_artist().unwrap_or_default().to_string();
                (track.uri, track.name, context)
            }
            TopKind::Artists => {
                let artist: ArtistObject = serde_json::from_value(item).ok()?;
                (artist.uri, artist.name, String::new())
            }
        };

        let id = utils::id_from_uri(&uri)?.to_string();
        Some(ProfileEntry {
            id,
            name,
            uri,
            context,
        })
    }
}

/// Runs all three collections with the session's limits.
pub async fn collect_profile<C, S, R>(ctx: &SessionContext<C, S>, rng: &mut R) -> Profile
where
    C: SpotifyApi,
    S: Sleeper,
    R: Rng + ?Sized,
{
    let settings = &ctx.settings;
    Profile {
        top_tracks: collect_top(ctx, TopKind::Tracks, settings.top_tracks).await,
        top_artists: collect_top(ctx, TopKind::Artists, settings.top_artists).await,
        playlists: collect_playlists(ctx, settings.playlists, rng).await,
    }
}

/// Collects up to `limits.cap` of the listener's top tracks or artists.
///
/// Walks `GET /me/top/{tracks,artists}` over the medium term range, following
/// each page's `next` URL until the cap is reached or the last page is read.
///
/// # Arguments
///
/// * `ctx` - Session providing the API client, the sleeper and the retry policy
/// * `kind` - Which top list to read
/// * `limits` - Cap and page size; a cap of 0 issues no request
///
/// # Returns
///
/// Entries keyed by id in provider rank order, at most `limits.cap` of them.
///
/// # Error Handling
///
/// - **Rate limiting**: retried through the session's retry policy
/// - **Malformed items**: skipped with a warning, the rest of the page is used
/// - **Anything else**: the walk stops with a warning and the entries
///   gathered so far are returned
///
/// # Example
///
/// ```
/// let tracks = collect_top(&ctx, TopKind::Tracks, ctx.settings.top_tracks).await;
/// for entry in tracks.values() {
///     println!("{} by {}", entry.name, entry.context);
/// }
/// ```
pub async fn collect_top<C, S>(
    ctx: &SessionContext<C, S>,
    kind: TopKind,
    limits: CollectionLimits,
) -> IndexMap<String, ProfileEntry>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let mut entries = IndexMap::new();
    if limits.cap == 0 {
        return entries;
    }

    let mut next = Some(format!(
        "{base}/me/top/{kind}?limit={limit}&time_range=medium_term",
        base = ctx.api.base_url(),
        kind = kind,
        limit = top_page_limit(limits)
    ));

    while let Some(url) = next.take() {
        let page = match fetch_page(ctx, &url).await {
            Ok(page) => page,
            Err(e) => {
                warning!("Stopped collecting top {}: {}", kind, e);
                return entries;
            }
        };

        for item in page.items {
            let Some(entry) = kind.entry(item) else {
                warning!("Skipping malformed top {} item", kind);
                continue;
            };

            entries.insert(entry.id.clone(), entry);
            if entries.len() >= limits.cap {
                return entries;
            }
        }

        next = page.next;
    }

    entries
}

/// Collects up to `limits.cap` of the listener's playlists, each with a
/// random sample of its tracks.
///
/// Playlists without reachable tracks are left out. A forbidden or missing
/// playlist is skipped; any other error ends the walk with partial results.
pub async fn collect_playlists<C, S, R>(
    ctx: &SessionContext<C, S>,
    limits: CollectionLimits,
    rng: &mut R,
) -> IndexMap<String, PlaylistEntry>
where
    C: SpotifyApi,
    S: Sleeper,
    R: Rng + ?Sized,
{
    let mut entries = IndexMap::new();
    if limits.cap == 0 {
        return entries;
    }

    let mut next = Some(format!(
        "{base}/me/playlists?limit={limit}",
        base = ctx.api.base_url(),
        limit = limits.page_size.clamp(1, MAX_PAGE_SIZE)
    ));

    while let Some(url) = next.take() {
        let page = match fetch_page(ctx, &url).await {
            Ok(page) => page,
            Err(e) => {
                warning!("Stopped collecting playlists: {}", e);
                return entries;
            }
        };

        for item in page.items {
            let Some((id, playlist)) = serde_json::from_value::<SimplifiedPlaylist>(item)
                .ok()
                .and_then(|p| Some((utils::id_from_uri(&p.uri)?.to_string(), p)))
            else {
                warning!("Skipping malformed playlist item");
                continue;
            };

            let tracks =
                match fetch_playlist_tracks(ctx, &id, ctx.settings.playlist_track_cap).await {
                    Ok(tracks) => tracks,
                    Err(e) if e.is_inaccessible() => {
                        warning!("Skipping playlist {}: {}", playlist.name, e);
                        Vec::new()
                    }
                    Err(e) => {
                        warning!("Stopped collecting playlists at {}: {}", playlist.name, e);
                        return entries;
                    }
                };

            if tracks.is_empty() {
                continue;
            }

            let sampled_tracks = utils::sample_track_labels(&tracks, ctx.settings.sample_cap, rng);
            entries.insert(
                id.clone(),
                PlaylistEntry {
                    id,
                    name: playlist.name,
                    uri: playlist.uri,
                    description: playlist.description.unwrap_or_default(),
                    sampled_tracks,
                },
            );
            if entries.len() >= limits.cap {
                return entries;
            }
        }

        next = page.next;
    }

    entries
}

/// Fetches up to `cap` playable tracks of a playlist, in playlist order.
///
/// # Arguments
///
/// * `ctx` - Session providing the API client, the sleeper and the throttle delay
/// * `playlist_id` - Bare playlist id, not a URI
/// * `cap` - Maximum number of tracks to keep; also bounds the page size
///
/// # Returns
///
/// - `Ok(Vec<TrackObject>)` - Playable tracks; removed tracks, podcast
///   episodes and local files are skipped
/// - `Err(ApiError)` - The first failure that was not a retried rate limit.
///   The caller decides whether that skips the playlist or stops collection
///
/// # Throttling
///
/// Sleeps `settings.page_delay` before every follow-up page so long playlists
/// do not burst the API.
pub async fn fetch_playlist_tracks<C, S>(
    ctx: &SessionContext<C, S>,
    playlist_id: &str,
    cap: usize,
) -> Result<Vec<TrackObject>, ApiError>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let mut tracks = Vec::new();
    if cap == 0 {
        return Ok(tracks);
    }

    let mut next = Some(format!(
        "{base}/playlists/{id}/tracks?limit={limit}",
        base = ctx.api.base_url(),
        id = playlist_id,
        limit = cap.min(MAX_PLAYLIST_ITEMS_PAGE_SIZE)
    ));
    let mut first_page = true;

    while let Some(url) = next.take() {
        if !first_page {
            ctx.sleeper.sleep(ctx.settings.page_delay).await;
        }
        first_page = false;

        let page = fetch_page(ctx, &url).await?;
        for item in page.items {
            let Ok(PlaylistItem { track: Some(track) }) =
                serde_json::from_value::<PlaylistItem>(item)
            else {
                continue;
            };
            if track.kind != "track" || track.is_local {
                continue;
            }

            tracks.push(track);
            if tracks.len() >= cap {
                return Ok(tracks);
            }
        }

        next = page.next;
    }

    Ok(tracks)
}

async fn fetch_page<C, S>(ctx: &SessionContext<C, S>, url: &str) -> Result<Page, ApiError>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let body = get_with_retry(&ctx.api, &ctx.sleeper, &ctx.settings.retry, url).await?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Page size for top items. Every item counts towards the cap, so a page
/// never needs to be larger than the cap.
fn top_page_limit(limits: CollectionLimits) -> usize {
    limits.page_size.clamp(1, MAX_PAGE_SIZE).min(limits.cap)
}
