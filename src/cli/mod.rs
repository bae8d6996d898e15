//! # CLI Module
//!
//! The command-line layer: user prompts, progress output and tables. Every
//! command builds its own [`SessionContext`] and hands it to the library
//! pipeline; nothing here talks HTTP directly.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE login, stores the token cache file
//! - [`recommend`] - Mood prompt, model recommendations, optional playlist
//! - [`profile`] - Shows (or with `--refresh`, rebuilds) the cached profile
//!
//! ## Data Flow of `recommend`
//!
//! ```text
//! token cache ─→ SessionContext ─→ GET /me
//!                     ↓
//! profile cache (or collector) ─→ prompt ─→ Gemini ─→ schema ─→ resolver
//!                                                                  ↓
//!                                             [y/N] ─→ playlist publisher
//! ```
//!
//! ## Error Handling
//!
//! Missing configuration or a missing token ends the program with `error!`.
//! Everything after that is reported with `warning!` and the command either
//! carries on with partial data or stops the current step.
//!
//! ## Usage
//!
//! ```bash
//! moodtape auth
//! moodtape recommend --mood "rainy sunday, slow coffee"
//! moodtape recommend --playlist "Rainy Sunday"
//! moodtape profile --refresh
//! ```

mod auth;
mod profile;
pub mod prompt;
mod recommend;

pub use auth::auth;
pub use profile::profile;
pub use recommend::recommend;

use crate::{
    config::{self, Settings},
    error,
    management::TokenManager,
    session::SessionContext,
    spotify::HttpSpotify,
};

/// Builds the session from the environment and the cached token.
async fn open_session() -> SessionContext<HttpSpotify> {
    let settings = Settings::from_env();

    let token_mgr = match TokenManager::load(&settings.token_cache_path).await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run moodtape auth\n Error: {}",
                e
            );
        }
    };

    let api = HttpSpotify::new(config::spotify_apiurl(), token_mgr);
    SessionContext::new(api, settings)
}
