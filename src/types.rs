use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Response of `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

impl CurrentUser {
    /// Name used to address the listener in the prompt.
    pub fn listener_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }
}

/// A top track or top artist.
///
/// `context` holds the primary artist name for tracks and is empty for
/// artists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub description: String,
    /// Random sample of the playlist's tracks as `"title - artist"`.
    pub sampled_tracks: Vec<String>,
}

/// Aggregated listening profile, in provider rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub top_tracks: IndexMap<String, ProfileEntry>,
    pub top_artists: IndexMap<String, ProfileEntry>,
    pub playlists: IndexMap<String, PlaylistEntry>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.top_tracks.is_empty() && self.top_artists.is_empty() && self.playlists.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub artist: String,
    /// Untrusted until checked with `utils::is_track_uri`.
    pub uri: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub detected_mood: String,
    pub recommendations: Vec<Recommendation>,
}

/// One page of a Spotify paging object. Items stay raw so a single malformed
/// item does not invalidate the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(rename = "type", default = "default_track_type")]
    pub kind: String,
    #[serde(default)]
    pub is_local: bool,
}

fn default_track_type() -> String {
    "track".to_string()
}

impl TrackObject {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// `"title - artist"`, or just the title when no artist is listed.
    pub fn label(&self) -> String {
        match self.primary_artist() {
            Some(artist) => format!("{} - {}", self.name, artist),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedPlaylist {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Item of `GET /playlists/{id}/tracks`. `track` is null for removed tracks.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTracks {
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Tabled)]
pub struct RecommendationTableRow {
    pub title: String,
    pub artist: String,
    pub reason: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub title: String,
    pub artist: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub sampled: usize,
    pub description: String,
}
