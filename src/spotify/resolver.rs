use crate::{
    session::SessionContext,
    spotify::{ApiError, SpotifyApi, retry::Sleeper},
    types::{Recommendation, SearchResponse},
    utils, warning,
};

/// Makes sure each recommendation carries a playable track URI where one can
/// be found.
///
/// # Arguments
///
/// * `ctx` - Session providing the API client
/// * `recommendations` - Model output, updated in place
///
/// # Behavior
///
/// - **Valid URI**: kept, no request is made
/// - **Missing or malformed URI**: replaced by the top search hit for title
///   and artist, if that hit is itself a valid track URI
/// - **No match or failed search**: the URI is left exactly as the model gave
///   it and a warning is printed
/// - **Blank title**: not searched
///
/// Callers filter with [`utils::is_track_uri`] before using a URI.
///
/// # Example
///
/// ```
/// let mut set = schema::parse_recommendations(&raw)?;
/// ensure_uris(&ctx, &mut set.recommendations).await;
/// ```
pub async fn ensure_uris<C, S>(ctx: &SessionContext<C, S>, recommendations: &mut [Recommendation])
where
    C: SpotifyApi,
    S: Sleeper,
{
    for rec in recommendations.iter_mut() {
        if utils::is_track_uri(&rec.uri) {
            continue;
        }

        if rec.title.trim().is_empty() {
            warning!("Recommendation without a title, cannot look it up");
            continue;
        }

        match search_track_uri(ctx, &rec.title, &rec.artist).await {
            Ok(Some(uri)) => rec.uri = uri,
            Ok(None) => warning!("No Spotify match for {} - {}", rec.title, rec.artist),
            Err(e) => warning!("Search for {} - {} failed: {}", rec.title, rec.artist, e),
        }
    }
}

/// URI of the top search hit, if it is a valid track URI.
///
/// Not retried on rate limit.
pub async fn search_track_uri<C, S>(
    ctx: &SessionContext<C, S>,
    title: &str,
    artist: &str,
) -> Result<Option<String>, ApiError>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let url = reqwest::Url::parse_with_params(
        &format!("{}/search", ctx.api.base_url()),
        &[
            ("q", utils::search_query(title, artist).as_str()),
            ("type", "track"),
            ("limit", "1"),
        ],
    )
    .map_err(|e| ApiError::Transport(e.to_string()))?;

    let body = ctx.api.get_json(url.as_str()).await?;
    let response: SearchResponse =
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(response
        .tracks
        .items
        .into_iter()
        .next()
        .map(|track| track.uri)
        .filter(|uri| utils::is_track_uri(uri)))
}
