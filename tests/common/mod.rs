#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::VecDeque,
    path::Path,
    time::Duration,
};

use moodtape::{
    config::Settings,
    llm::{Generator, ModelError},
    session::SessionContext,
    spotify::{ApiError, SpotifyApi, retry::Sleeper},
};
use serde_json::{Value, json};

pub const BASE_URL: &str = "https://api.test/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

struct Route {
    method: Method,
    prefix: String,
    responses: VecDeque<Result<Value, ApiError>>,
}

/// Scripted Spotify API.
///
/// Routes match on the path after [`BASE_URL`]; the longest matching prefix
/// wins. Responses are served in order and the last one repeats. Unrouted
/// requests answer `NotFound`.
pub struct FakeSpotify {
    routes: RefCell<Vec<Route>>,
    pub gets: RefCell<Vec<String>>,
    pub posts: RefCell<Vec<(String, Value)>>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self {
            routes: RefCell::new(Vec::new()),
            gets: RefCell::new(Vec::new()),
            posts: RefCell::new(Vec::new()),
        }
    }

    pub fn on_get(self, prefix: &str, responses: Vec<Result<Value, ApiError>>) -> Self {
        self.route(Method::Get, prefix, responses)
    }

    pub fn on_post(self, prefix: &str, responses: Vec<Result<Value, ApiError>>) -> Self {
        self.route(Method::Post, prefix, responses)
    }

    fn route(self, method: Method, prefix: &str, responses: Vec<Result<Value, ApiError>>) -> Self {
        self.routes.borrow_mut().push(Route {
            method,
            prefix: prefix.to_string(),
            responses: responses.into(),
        });
        self
    }

    /// GET requests whose path starts with `prefix`.
    pub fn gets_to(&self, prefix: &str) -> usize {
        self.gets
            .borrow()
            .iter()
            .filter(|url| path_of(url).starts_with(prefix))
            .count()
    }

    pub fn posts_to(&self, prefix: &str) -> Vec<Value> {
        self.posts
            .borrow()
            .iter()
            .filter(|(url, _)| path_of(url).starts_with(prefix))
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn respond(&self, method: Method, url: &str) -> Result<Value, ApiError> {
        let path = path_of(url);
        let mut routes = self.routes.borrow_mut();
        let route = routes
            .iter_mut()
            .filter(|r| r.method == method && path.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len());

        match route {
            Some(route) if route.responses.len() > 1 => {
                route.responses.pop_front().unwrap_or(Ok(Value::Null))
            }
            Some(route) => route
                .responses
                .front()
                .cloned()
                .unwrap_or(Ok(Value::Null)),
            None => Err(ApiError::NotFound(format!("no route for {}", path))),
        }
    }
}

impl SpotifyApi for FakeSpotify {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        self.gets.borrow_mut().push(url.to_string());
        self.respond(Method::Get, url)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        self.posts.borrow_mut().push((url.to_string(), body.clone()));
        self.respond(Method::Post, url)
    }
}

fn path_of(url: &str) -> &str {
    url.strip_prefix(BASE_URL).unwrap_or(url)
}

/// Fake clock: records every requested delay and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn total(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Model that always gives the same answer and remembers the prompts.
pub struct FakeGenerator {
    answer: Result<String, ModelError>,
    pub prompts: RefCell<Vec<String>>,
}

impl FakeGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: ModelError) -> Self {
        Self {
            answer: Err(error),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer.clone()
    }
}

/// Default settings with both cache files inside `dir`.
pub fn test_settings(dir: &Path) -> Settings {
    Settings {
        profile_cache_path: dir.join("cache").join("profile.json"),
        token_cache_path: dir.join("cache").join("token.json"),
        ..Settings::default()
    }
}

pub fn session(
    api: FakeSpotify,
    settings: Settings,
) -> SessionContext<FakeSpotify, RecordingSleeper> {
    SessionContext::with_sleeper(api, RecordingSleeper::default(), settings)
}

pub fn track(id: &str, name: &str, artist: &str) -> Value {
    json!({
        "uri": format!("spotify:track:{}", id),
        "name": name,
        "type": "track",
        "is_local": false,
        "artists": [ { "name": artist } ]
    })
}

pub fn artist(id: &str, name: &str) -> Value {
    json!({ "uri": format!("spotify:artist:{}", id), "name": name })
}

pub fn playlist(id: &str, name: &str, description: &str) -> Value {
    json!({
        "uri": format!("spotify:playlist:{}", id),
        "name": name,
        "description": description
    })
}

/// Wraps tracks the way the playlist items endpoint does.
pub fn playlist_items(tracks: Vec<Value>) -> Vec<Value> {
    tracks.into_iter().map(|t| json!({ "track": t })).collect()
}

pub fn page(items: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "items": items,
        "next": next.map(|path| format!("{}{}", BASE_URL, path))
    })
}

/// `count` numbered tracks starting at `from`.
pub fn numbered_tracks(from: usize, count: usize) -> Vec<Value> {
    (from..from + count)
        .map(|i| track(&format!("t{}", i), &format!("Song {}", i), "Band"))
        .collect()
}
