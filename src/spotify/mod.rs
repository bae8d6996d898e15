//! # Spotify Integration Module
//!
//! This module is the layer between moodtape and the Spotify Web API. It
//! authenticates the listener, walks their listening history into a profile,
//! turns model recommendations into playable track URIs and publishes
//! playlists.
//!
//! ## Architecture
//!
//! ```text
//! Session (SessionContext: client + sleeper + settings)
//!          ↓
//! Pipeline stages
//!     ├── collector (top tracks, top artists, playlists, playlist items)
//!     ├── resolver  (URI validation, search fallback)
//!     └── playlist  (create, append)
//!          ↓
//! retry (rate-limit policy, sleeper)
//!          ↓
//! client (SpotifyApi trait, reqwest implementation)
//!          ↓
//! Spotify Web API
//! ```
//!
//! Stages only see the [`SpotifyApi`] trait, so tests drive them with a
//! scripted provider and a recording sleeper.
//!
//! ## Error Handling
//!
//! Every request failure is an [`ApiError`]:
//! - **Rate limiting (429)**: retried through [`retry::get_with_retry`] using
//!   the `Retry-After` header plus a margin, up to the policy's bound
//! - **Forbidden / not found**: a single playlist is skipped, collection goes on
//! - **Anything else**: the current collection stops and keeps partial results
//!
//! Search and playlist writes are not retried; they report failure and the
//! caller decides what to show.
//!
//! ## API Coverage
//!
//! - `GET /me` - Identity of the listener
//! - `GET /me/top/{tracks,artists}` - Top items, medium term
//! - `GET /me/playlists` - The listener's playlists
//! - `GET /playlists/{id}/tracks` - Playlist contents
//! - `GET /search` - Track lookup for unresolved recommendations
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{id}/tracks` - Append tracks
//! - `POST /api/token` - Token exchange and refresh (accounts service)

pub mod auth;
pub mod client;
pub mod collector;
pub mod playlist;
pub mod resolver;
pub mod retry;

pub use client::{ApiError, HttpSpotify, SpotifyApi};

use crate::{session::SessionContext, spotify::retry::Sleeper, types::CurrentUser};

/// Fetches the listener's identity, retrying on rate limit.
pub async fn current_user<C, S>(ctx: &SessionContext<C, S>) -> Result<CurrentUser, ApiError>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let url = format!("{}/me", ctx.api.base_url());
    let body = retry::get_with_retry(&ctx.api, &ctx.sleeper, &ctx.settings.retry, &url).await?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
