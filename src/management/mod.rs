mod auth;
mod profile;

pub use auth::TokenManager;
pub use profile::CacheError;
pub use profile::ProfileCache;
