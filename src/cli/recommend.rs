use std::io;

use tabled::Table;

use crate::{
    cli::{open_session, prompt},
    config, error, info,
    llm::GeminiClient,
    management::ProfileCache,
    session::{self, PublishOutcome},
    spotify, success,
    types::{RecommendationSet, RecommendationTableRow},
    utils, warning,
};

pub async fn recommend(mood: Option<String>, playlist_name: Option<String>, no_playlist: bool) {
    let missing = config::missing_required(true);
    if !missing.is_empty() {
        error!("Missing configuration: {}", missing.join(", "));
    }

    let ctx = open_session().await;
    let user = match spotify::current_user(&ctx).await {
        Ok(user) => user,
        Err(e) => error!("Cannot identify the Spotify account: {}", e),
    };

    let cache = ProfileCache::new(ctx.settings.profile_cache_path.clone());
    let profile = cache.load(&ctx, &mut rand::rng()).await;
    if profile.is_empty() {
        warning!("Your profile is empty, recommendations will rely on the mood alone.");
    }

    let mood = match mood.filter(|m| !m.trim().is_empty()) {
        Some(mood) => mood,
        None => match prompt::ask_non_empty(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "What's the mood today?",
        ) {
            Ok(mood) => mood,
            Err(e) => error!("No mood given: {}", e),
        },
    };

    let generator = match GeminiClient::from_env() {
        Ok(generator) => generator,
        Err(e) => error!("Cannot set up the model client: {}", e),
    };

    let pb = utils::spinner(format!("Asking {} for recommendations...", generator.model()));
    let result = session::run_cycle(&ctx, &generator, &profile, user.listener_name(), &mood).await;
    pb.finish_and_clear();

    let set = match result {
        Ok(set) => set,
        Err(e) => {
            warning!("No recommendations this time, {}", e);
            return;
        }
    };

    print_recommendations(&set);

    if no_playlist {
        return;
    }

    let linked = set
        .recommendations
        .iter()
        .filter(|r| utils::is_track_uri(&r.uri))
        .count();
    if linked == 0 {
        warning!("None of the tracks could be found on Spotify, nothing to add to a playlist.");
        return;
    }

    let name = match playlist_name {
        Some(name) => name,
        None => match ask_playlist_name() {
            Ok(Some(name)) => name,
            Ok(None) => return,
            Err(e) => {
                warning!("Skipping playlist: {}", e);
                return;
            }
        },
    };

    info!("Creating playlist {}", name);
    match session::publish(&ctx, &user.id, &name, &set).await {
        PublishOutcome::Created { added, .. } => {
            success!("Playlist {} created with {} tracks", name, added)
        }
        PublishOutcome::NothingToAdd { .. } => {
            warning!("Playlist {} created, but there were no tracks to add", name)
        }
        PublishOutcome::CreateFailed => warning!("Playlist {} was not created", name),
        PublishOutcome::AddFailed { .. } => {
            warning!("Playlist {} created, but adding tracks failed", name)
        }
    }
}

fn ask_playlist_name() -> io::Result<Option<String>> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    if !prompt::ask_yes_no(&mut input, &mut output, "Create a playlist?")? {
        return Ok(None);
    }
    prompt::ask_non_empty(&mut input, &mut output, "Give a name:").map(Some)
}

fn print_recommendations(set: &RecommendationSet) {
    println!();
    success!("Mood detected: {}", set.detected_mood);

    let rows: Vec<RecommendationTableRow> = set
        .recommendations
        .iter()
        .map(|r| RecommendationTableRow {
            title: r.title.clone(),
            artist: r.artist.clone(),
            reason: r.reason.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));

    for r in set
        .recommendations
        .iter()
        .filter(|r| !utils::is_track_uri(&r.uri))
    {
        warning!("{} - {} is not linked to a Spotify track", r.title, r.artist);
    }
}
