//! DBBE search server
//!
//! Serves the search pages and the JSON search API of the Database of
//! Byzantine Book Epigrams.

use clap::Parser;
use dbbe_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use dbbe_search::backends::memory::MemoryEngine;
use tracing::{info, warn};

/// Loads the record documents, or starts empty when no file is configured.
fn create_memory_engine(config: &ServerConfig) -> anyhow::Result<MemoryEngine> {
    match config.data_file.as_deref() {
        Some(path) => {
            info!(data_file = %path, "Loading search documents");
            Ok(MemoryEngine::from_file(path)?)
        }
        None => {
            warn!("No data file configured, starting with an empty index");
            Ok(MemoryEngine::new())
        }
    }
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        max_page_size = config.max_page_size,
        "Starting DBBE search server"
    );

    match backend_mode {
        StorageBackendMode::Memory => start_memory(config).await,
        StorageBackendMode::Elasticsearch => start_elasticsearch(config).await,
    }
}

/// Starts the server with the in-memory engine.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    let engine = create_memory_engine(&config)?;
    let app = create_app_with_config(engine, config.clone());
    serve(app, &config).await
}

/// Starts the server with Elasticsearch for searches and the data file for
/// record access.
#[cfg(feature = "elasticsearch")]
async fn start_elasticsearch(config: ServerConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use dbbe_rest::create_app_with_parts;
    use dbbe_search::backends::elasticsearch::{
        ElasticsearchAuth, ElasticsearchConfig, ElasticsearchEngine,
    };

    let es_auth = match (
        &config.elasticsearch_username,
        &config.elasticsearch_password,
    ) {
        (Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    let es_config = ElasticsearchConfig {
        nodes: config.elasticsearch_node_list(),
        index_prefix: config.elasticsearch_index_prefix.clone(),
        request_timeout_ms: config.request_timeout * 1000,
        auth: es_auth,
    };

    info!(
        nodes = ?es_config.nodes,
        index_prefix = %es_config.index_prefix,
        "Initializing Elasticsearch engine"
    );

    let engine = Arc::new(ElasticsearchEngine::new(es_config)?);
    let store = Arc::new(create_memory_engine(&config)?);

    let app = create_app_with_parts(engine, store, config.clone());
    serve(app, &config).await
}

/// Fallback when the elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn start_elasticsearch(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The elasticsearch backend requires the 'elasticsearch' feature. \
         Build with: cargo build -p dbbe --features elasticsearch"
    )
}
