//! Configuration management for moodtape.
//!
//! Values come from environment variables, which may be supplied through a
//! `.env` file. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/moodtape/.env`)
//! 4. Application defaults (where applicable)
//!
//! Accessors for required values panic when the variable is missing; the CLI
//! checks them once at startup through [`missing_required`].

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{Res, spotify::retry::RetryPolicy};

pub const APP_DIR: &str = "moodtape";

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_SCOPES: &[&str] = &[
    "user-top-read",
    "user-library-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
];

/// Loads environment variables from `.env` files.
///
/// The working directory file is read first so a project-local `.env`
/// wins over the one in the data directory. Missing files are not an error;
/// unreadable or malformed ones are.
pub async fn load_env() -> Res<()> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local)?;
    }

    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// Returns the names of required variables that are not set.
///
/// `needs_model` adds the model API key, which only the `recommend` command
/// uses.
pub fn missing_required(needs_model: bool) -> Vec<&'static str> {
    let mut required = vec!["SPOTIFY_API_AUTH_CLIENT_ID", "SPOTIFY_API_REDIRECT_URI"];
    if needs_model {
        required.push("GEMINI_API_KEY");
    }

    required
        .into_iter()
        .filter(|key| env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect()
}

/// Root of everything moodtape stores locally.
///
/// - Linux: `~/.local/share/moodtape`
/// - macOS: `~/Library/Application Support/moodtape`
/// - Windows: `%LOCALAPPDATA%/moodtape`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Spotify application client ID.
///
/// # Panics
///
/// Panics if `SPOTIFY_API_AUTH_CLIENT_ID` is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// OAuth redirect URI registered with the Spotify application.
///
/// # Panics
///
/// Panics if `SPOTIFY_API_REDIRECT_URI` is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Space separated OAuth scopes. Defaults to what profile collection and
/// playlist publishing need.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPES.join(" "))
}

pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_AUTH_URL.to_string())
}

pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_API_URL.to_string())
}

pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_TOKEN_URL.to_string())
}

/// Gemini API key.
///
/// # Panics
///
/// Panics if `GEMINI_API_KEY` is not set.
pub fn gemini_api_key() -> String {
    env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set")
}

pub fn gemini_api_url() -> String {
    env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string())
}

pub fn gemini_model() -> String {
    env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string())
}

/// Caps and page sizes for one collection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLimits {
    pub cap: usize,
    pub page_size: usize,
}

/// Runtime settings for a session.
///
/// Built once at startup and passed by reference; nothing here changes while
/// a session runs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub top_tracks: CollectionLimits,
    pub top_artists: CollectionLimits,
    pub playlists: CollectionLimits,
    /// Maximum number of tracks fetched from a single playlist.
    pub playlist_track_cap: usize,
    /// Maximum number of tracks sampled from a playlist for the prompt.
    pub sample_cap: usize,
    /// Pause between follow-up playlist item pages.
    pub page_delay: Duration,
    pub retry: RetryPolicy,
    pub profile_cache_path: PathBuf,
    pub token_cache_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let cache_dir = data_dir().join("cache");
        Self {
            top_tracks: CollectionLimits {
                cap: 30,
                page_size: 20,
            },
            top_artists: CollectionLimits {
                cap: 15,
                page_size: 20,
            },
            playlists: CollectionLimits {
                cap: 10,
                page_size: 50,
            },
            playlist_track_cap: 100,
            sample_cap: 10,
            page_delay: Duration::from_millis(100),
            retry: RetryPolicy::default(),
            profile_cache_path: cache_dir.join("profile.json"),
            token_cache_path: cache_dir.join("token.json"),
        }
    }
}

impl Settings {
    /// Defaults overridden by any `MOODTAPE_*` variables that are set and
    /// parse. Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let retry = RetryPolicy {
            max_retries: match env::var("MOODTAPE_RATE_LIMIT_MAX_RETRIES") {
                Ok(v) if v.trim().eq_ignore_ascii_case("none") => None,
                Ok(v) => v.trim().parse().ok().or(defaults.retry.max_retries),
                Err(_) => defaults.retry.max_retries,
            },
            default_delay: env_millis("MOODTAPE_RATE_LIMIT_DEFAULT_DELAY_MS")
                .unwrap_or(defaults.retry.default_delay),
            margin: env_millis("MOODTAPE_RATE_LIMIT_MARGIN_MS").unwrap_or(defaults.retry.margin),
        };

        Self {
            top_tracks: CollectionLimits {
                cap: env_parse("MOODTAPE_TOP_TRACKS_CAP").unwrap_or(defaults.top_tracks.cap),
                page_size: env_parse("MOODTAPE_TOP_TRACKS_PAGE_SIZE")
                    .unwrap_or(defaults.top_tracks.page_size),
            },
            top_artists: CollectionLimits {
                cap: env_parse("MOODTAPE_TOP_ARTISTS_CAP").unwrap_or(defaults.top_artists.cap),
                page_size: env_parse("MOODTAPE_TOP_ARTISTS_PAGE_SIZE")
                    .unwrap_or(defaults.top_artists.page_size),
            },
            playlists: CollectionLimits {
                cap: env_parse("MOODTAPE_PLAYLISTS_CAP").unwrap_or(defaults.playlists.cap),
                page_size: env_parse("MOODTAPE_PLAYLISTS_PAGE_SIZE")
                    .unwrap_or(defaults.playlists.page_size),
            },
            playlist_track_cap: env_parse("MOODTAPE_PLAYLIST_TRACK_CAP")
                .unwrap_or(defaults.playlist_track_cap),
            sample_cap: env_parse("MOODTAPE_SAMPLE_CAP").unwrap_or(defaults.sample_cap),
            page_delay: env_millis("MOODTAPE_PAGE_DELAY_MS").unwrap_or(defaults.page_delay),
            retry,
            profile_cache_path: env::var("MOODTAPE_PROFILE_CACHE")
                .map(PathBuf::from)
                .unwrap_or(defaults.profile_cache_path),
            token_cache_path: env::var("MOODTAPE_TOKEN_CACHE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_cache_path),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_millis)
}
