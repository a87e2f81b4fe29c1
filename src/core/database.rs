use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect(&config.url).await
}

/// Pool that opens connections on first use. Router tests use it for
/// handlers that reject the request before reaching the database.
#[cfg(test)]
pub fn create_lazy_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    let config = DatabaseConfig {
        url: url.to_string(),
        max_connections: 1,
        min_connections: 0,
        acquire_timeout_secs: 1,
        idle_timeout_secs: 60,
        max_lifetime_secs: 60,
    };
    pool_options(&config).connect_lazy(&config.url)
}
