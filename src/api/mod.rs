//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs during
//! `moodtape auth`.
//!
//! - [`callback`] - Receives the OAuth redirect from Spotify and exchanges the
//!   authorization code for a token (PKCE flow)
//! - [`health`] - Reports status and version, handy to check that the
//!   callback server is reachable on `SERVER_ADDRESS`

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
