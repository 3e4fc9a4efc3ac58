//! Yard stock HTTP server binary.
//!
//! Initializes the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Backend from repository.toml (the shipped one selects the JSON document
//! # store at data/yard-stock.json)
//! cargo run --bin yard-server
//!
//! # In-memory store
//! REPOSITORY_TYPE=local cargo run --bin yard-server
//!
//! # JSON document store at another path
//! YARD_DATA_FILE=/var/lib/yard/stock.json cargo run --bin yard-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `file`
//! - `YARD_DATA_FILE`: Store document path (implies `file`)
//! - `RUST_LOG`: Log filter directives, e.g. `yard_stock=debug,tower_http=info`
//!   (default: info)
//!
//! Without any of the repository variables, `repository.toml` is used when
//! one is found in the standard locations. With neither, the store is
//! in-memory.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use yard_stock::db::factory::{DATA_FILE_ENV, REPOSITORY_TYPE_ENV};
use yard_stock::db::{RepositoryConfig, RepositoryFactory, YardRepository};
use yard_stock::http::{create_router, AppState};

const DEFAULT_LOG_FILTER: &str = "info";

/// Filter from `RUST_LOG` directives, falling back to `info` when unset or
/// unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn init_repository() -> anyhow::Result<Arc<dyn YardRepository>> {
    let env_configured =
        env::var_os(REPOSITORY_TYPE_ENV).is_some() || env::var_os(DATA_FILE_ENV).is_some();

    if !env_configured {
        if let Some(path) = RepositoryConfig::find_default_location() {
            info!("Using repository configuration {}", path.display());
            return Ok(RepositoryFactory::from_config_file(path).await?);
        }
    }

    Ok(RepositoryFactory::from_env().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting yard stock HTTP server");

    let repository = init_repository().await?;
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_keeps_per_target_directives() {
        let filter = log_filter(Some("yard_stock=debug,tower_http=info"));
        let rendered = filter.to_string();
        assert!(rendered.contains("yard_stock=debug"));
        assert!(rendered.contains("tower_http=info"));
    }

    #[test]
    fn test_log_filter_falls_back_to_info() {
        let info = EnvFilter::new(DEFAULT_LOG_FILTER).to_string();
        assert_eq!(log_filter(None).to_string(), info);
        assert_eq!(log_filter(Some("yard_stock=loud")).to_string(), info);
    }
}
