mod config;
mod db;
mod entities;
mod error;
mod routes;
mod seed;
mod store;

use std::sync::Arc;

use crate::{config::Config, error::AppResult, store::TitleStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Option<TitleStore>,
}

impl AppState {
    /// None when the boot-time connect failed; store-backed routes then
    /// answer 500 per request instead of the process exiting.
    pub fn store(&self) -> AppResult<&TitleStore> {
        match &self.store {
            Some(store) => Ok(store),
            None => Err(anyhow::anyhow!("title store unavailable").into()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,catalogd=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let store = match db::connect_and_migrate(&config.database_url).await {
        Ok(db) => Some(TitleStore::new(db)),
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to the title store");
            None
        }
    };

    if config.reset_database {
        match &store {
            Some(store) => match seed::run(store).await {
                Ok(outcome) => tracing::info!(
                    deleted = outcome.deleted,
                    inserted = outcome.inserted,
                    failed = outcome.failed,
                    "catalog reseeded"
                ),
                Err(err) => tracing::error!(error = %err, "reseed failed"),
            },
            None => tracing::warn!("RESET_DATABASE is set but the store is unavailable"),
        }
    }

    let app = routes::app(Arc::new(AppState { store }));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
