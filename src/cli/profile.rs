use tabled::Table;

use crate::{
    cli::open_session,
    config, error, info,
    management::ProfileCache,
    types::{ArtistTableRow, PlaylistTableRow, Profile, TrackTableRow},
    utils, warning,
};

pub async fn profile(refresh: bool) {
    let missing = config::missing_required(false);
    if !missing.is_empty() {
        error!("Missing configuration: {}", missing.join(", "));
    }

    let ctx = open_session().await;
    let cache = ProfileCache::new(ctx.settings.profile_cache_path.clone());

    if refresh {
        if let Err(e) = cache.clear().await {
            warning!("Could not remove {}: {}", cache.path().display(), e);
        }
    }

    let profile = cache.load(&ctx, &mut rand::rng()).await;
    print_profile(&profile);
}

fn print_profile(profile: &Profile) {
    info!(
        "Top artists: {} | Top tracks: {} | Playlists: {}",
        profile.top_artists.len(),
        profile.top_tracks.len(),
        profile.playlists.len()
    );

    if !profile.top_artists.is_empty() {
        let rows: Vec<ArtistTableRow> = profile
            .top_artists
            .values()
            .map(|a| ArtistTableRow {
                name: a.name.clone(),
            })
            .collect();
        println!("Top artists\n{}\n", Table::new(rows));
    }

    if !profile.top_tracks.is_empty() {
        let rows: Vec<TrackTableRow> = profile
            .top_tracks
            .values()
            .map(|t| TrackTableRow {
                title: t.name.clone(),
                artist: t.context.clone(),
            })
            .collect();
        println!("Top tracks\n{}\n", Table::new(rows));
    }

    if !profile.playlists.is_empty() {
        let rows: Vec<PlaylistTableRow> = profile
            .playlists
            .values()
            .map(|p| PlaylistTableRow {
                name: p.name.clone(),
                sampled: p.sampled_tracks.len(),
                description: utils::truncate(&p.description, 60),
            })
            .collect();
        println!("Playlists\n{}\n", Table::new(rows));
    }
}
