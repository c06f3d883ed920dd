//! HTTP server for the mdv documentation viewer.
//!
//! This crate provides an axum server serving:
//! - Rendered markdown documents and their static assets under `/docs`
//! - A JSON listing of the top-level documents
//! - The pre-built generated documentation tree under `/docs_dev`
//! - An admin summary that can trigger the documentation generator
//!
//! # Quick Start
//!
//! ```ignore
//! use mdv_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: "docs".into(),
//!         base_path: "/admin".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (mdv-server)
//!                        │
//!                        ├─► access gate (allow all / bearer token)
//!                        │
//!                        ├─► /docs/…     ──► DocsSite (mdv-render) ──► page shell
//!                        │
//!                        ├─► /docs_dev/… ──► generated tree on disk
//!                        │
//!                        └─► /docs/admin ──► DocGenerator (mdv-generator)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod page;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use mdv_config::{DEFAULT_MERMAID_SCRIPT, GeneratorConfig};
use mdv_generator::DocGenerator;
use mdv_render::{DocsSite, Routes};

pub use middleware::access::{AccessGate, AllowAll, BearerToken};

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Prefix all routes are mounted under (`""` for the root).
    pub base_path: String,
    /// Document root with markdown sources.
    pub source_dir: PathBuf,
    /// Generated-docs root.
    pub generated_dir: PathBuf,
    /// Script URL rendered pages load to draw mermaid diagrams.
    pub mermaid_script: String,
    /// Bearer token required on every request (`None` allows all).
    pub access_token: Option<String>,
    /// Documentation generator run from the admin endpoint.
    pub generator: DocGenerator,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            base_path: String::new(),
            source_dir: PathBuf::from("docs"),
            generated_dir: generator.output_dir.clone(),
            mermaid_script: DEFAULT_MERMAID_SCRIPT.to_owned(),
            access_token: None,
            generator: DocGenerator::new(generator),
        }
    }
}

/// Build the viewer router for `config`.
///
/// Hosting applications can merge the returned router into their own; all
/// routes already carry `config.base_path`.
#[must_use]
pub fn create_router(config: &ServerConfig) -> Router {
    let gate: Arc<dyn AccessGate> = match &config.access_token {
        Some(token) => Arc::new(BearerToken::new(token.clone())),
        None => Arc::new(AllowAll),
    };
    create_router_with_gate(config, gate)
}

/// Build the viewer router with a custom access gate.
#[must_use]
pub fn create_router_with_gate(config: &ServerConfig, gate: Arc<dyn AccessGate>) -> Router {
    let routes = Routes::new(config.base_path.clone());
    let state = Arc::new(AppState {
        site: DocsSite::new(config.source_dir.clone(), routes),
        generator: config.generator.clone(),
        generated_dir: config.generated_dir.clone(),
        mermaid_script: config.mermaid_script.clone(),
    });

    app::create_router(state, gate, &config.base_path)
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(&config);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        docs = %config.source_dir.display(),
        generated = %config.generated_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdv config.
#[must_use]
pub fn server_config_from_mdv_config(config: &mdv_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        base_path: config.server.base_path.clone(),
        source_dir: config.docs_resolved.source_dir.clone(),
        generated_dir: config.docs_resolved.generated_dir.clone(),
        mermaid_script: config.docs_resolved.mermaid_script.clone(),
        access_token: config.server.access_token.clone(),
        generator: DocGenerator::new(config.generator_resolved.clone()),
    }
}
