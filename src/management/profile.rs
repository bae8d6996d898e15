use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use rand::Rng;
use thiserror::Error;

use crate::{
    info,
    session::SessionContext,
    spotify::{SpotifyApi, collector, retry::Sleeper},
    success,
    types::Profile,
    utils, warning,
};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache file is not a valid profile: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Flat JSON file holding the last collected [`Profile`].
///
/// There is no expiry: the file is used until it is deleted, either by hand
/// or through `moodtape profile --refresh`.
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached profile. A missing file is `Ok(None)`.
    pub async fn read(&self) -> Result<Option<Profile>, CacheError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub async fn persist(&self, profile: &Profile) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(profile)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Deletes the cache file; a file that is already gone is fine.
    pub async fn clear(&self) -> Result<(), CacheError> {
        match async_fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Returns the cached profile, or collects, caches and returns a new one.
    ///
    /// An unreadable cache counts as a miss. A failed write is reported but
    /// the collected profile is still returned.
    pub async fn load<C, S, R>(&self, ctx: &SessionContext<C, S>, rng: &mut R) -> Profile
    where
        C: SpotifyApi,
        S: Sleeper,
        R: Rng + ?Sized,
    {
        match self.read().await {
            Ok(Some(profile)) => {
                info!("Using cached profile from {}", self.path.display());
                return profile;
            }
            Ok(None) => {}
            Err(e) => warning!("Ignoring profile cache {}: {}", self.path.display(), e),
        }

        let pb = utils::spinner("Collecting your listening profile...");
        let profile = collector::collect_profile(ctx, rng).await;
        pb.finish_and_clear();

        success!(
            "Collected {} top tracks, {} top artists and {} playlists",
            profile.top_tracks.len(),
            profile.top_artists.len(),
            profile.playlists.len()
        );

        if let Err(e) = self.persist(&profile).await {
            warning!("Failed to cache profile: {}", e);
        }
        profile
    }
}
