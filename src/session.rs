//! Session context and the recommendation cycle.
//!
//! A [`SessionContext`] is built once at startup and passed by reference to
//! every pipeline stage. It owns the provider client, the clock used for
//! backoff and throttling, and the settings, so nothing in the pipeline
//! reaches for process-wide state.

use thiserror::Error;

use crate::{
    config::Settings,
    llm::{
        self, Generator, ModelError,
        schema::{self, ShapeError},
    },
    spotify::{
        SpotifyApi,
        playlist::{self, AddTracksOutcome},
        resolver,
        retry::{Sleeper, TokioSleeper},
    },
    types::{Profile, RecommendationSet},
};

pub struct SessionContext<C, S = TokioSleeper> {
    pub api: C,
    pub sleeper: S,
    pub settings: Settings,
}

impl<C: SpotifyApi> SessionContext<C, TokioSleeper> {
    pub fn new(api: C, settings: Settings) -> Self {
        Self {
            api,
            sleeper: TokioSleeper,
            settings,
        }
    }
}

impl<C: SpotifyApi, S: Sleeper> SessionContext<C, S> {
    pub fn with_sleeper(api: C, sleeper: S, settings: Settings) -> Self {
        Self {
            api,
            sleeper,
            settings,
        }
    }
}

/// Why a recommendation cycle was abandoned.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("the model request failed: {0}")]
    Model(#[from] ModelError),
    #[error("the model answer was unusable: {0}")]
    Shape(#[from] ShapeError),
}

/// Prompt, ask the model, validate the answer and resolve track URIs.
///
/// Model and shape failures end the cycle; there is no second model call.
pub async fn run_cycle<C, S, G>(
    ctx: &SessionContext<C, S>,
    generator: &G,
    profile: &Profile,
    listener: &str,
    mood: &str,
) -> Result<RecommendationSet, CycleError>
where
    C: SpotifyApi,
    S: Sleeper,
    G: Generator,
{
    let prompt = llm::prompt::build_prompt(profile, listener, mood);
    let raw = generator.generate(&prompt).await?;
    let mut set = schema::parse_recommendations(&raw)?;

    resolver::ensure_uris(ctx, &mut set.recommendations).await;
    Ok(set)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created { playlist_id: String, added: usize },
    /// The playlist exists but none of the recommendations had a usable URI.
    NothingToAdd { playlist_id: String },
    CreateFailed,
    AddFailed { playlist_id: String },
}

/// Creates the playlist and fills it with every resolvable recommendation.
pub async fn publish<C, S>(
    ctx: &SessionContext<C, S>,
    user_id: &str,
    name: &str,
    set: &RecommendationSet,
) -> PublishOutcome
where
    C: SpotifyApi,
    S: Sleeper,
{
    let description = format!("Mood: {}.", set.detected_mood);
    let Some(playlist_id) = playlist::create_playlist(ctx, user_id, name, &description).await
    else {
        return PublishOutcome::CreateFailed;
    };

    let uris: Vec<String> = set.recommendations.iter().map(|r| r.uri.clone()).collect();

    match playlist::add_tracks(ctx, &playlist_id, &uris).await {
        AddTracksOutcome::Added(added) => PublishOutcome::Created { playlist_id, added },
        AddTracksOutcome::NothingToAdd => PublishOutcome::NothingToAdd { playlist_id },
        AddTracksOutcome::Failed => PublishOutcome::AddFailed { playlist_id },
    }
}
