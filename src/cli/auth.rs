use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config, error, spotify, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let missing = config::missing_required(false);
    if !missing.is_empty() {
        error!("Missing configuration: {}", missing.join(", "));
    }

    let settings = config::Settings::from_env();
    spotify::auth::auth(shared_state, settings.token_cache_path).await;
}
