//! Mood-based Spotify recommendation library
//!
//! This library gathers a listener's taste profile from the Spotify Web API,
//! asks a generative model for four tracks that match a stated mood, resolves
//! those tracks to playable URIs and optionally publishes them as a playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Environment variables and runtime settings
//! - `llm` - Prompt rendering, model client and response validation
//! - `management` - Token and profile cache files
//! - `server` - Local HTTP server for OAuth callbacks
//! - `session` - Session context and the recommendation cycle
//! - `spotify` - Spotify Web API client, collector, resolver and publisher
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod llm;
pub mod management;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for top-level operations that may fail.
///
/// Component seams use typed errors; this alias is for glue code where any
/// error is simply reported to the user.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Collecting top tracks...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for failures the program cannot continue from, such as missing
/// credentials at startup. Code after this macro will not execute.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: a skipped playlist, a rate limit backoff,
/// a recommendation whose URI could not be resolved.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
