use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use school_match::channels::CliChannel;
use school_match::config::AppConfig;
use school_match::llm::create_provider;
use school_match::schools::{LlmRecommender, SchoolCatalog, SchoolRecommender};
use school_match::session::{SearchController, session_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config);

    eprintln!("🎓 School Match v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {} ({})", config.llm.backend, config.llm.model);

    let llm = create_provider(&config.llm).context("Failed to create LLM provider")?;

    let mut recommender = LlmRecommender::new(llm, config.recommender.clone());
    if let Some(ref path) = config.catalog_path {
        let catalog = SchoolCatalog::load(path)
            .await
            .with_context(|| format!("Failed to load school catalog from {}", path.display()))?;
        eprintln!("   Catalog: {} schools from {}", catalog.len(), path.display());
        recommender = recommender.with_catalog(catalog);
    }
    let recommender: Arc<dyn SchoolRecommender> = Arc::new(recommender);

    let controller = SearchController::new(recommender, config.controller.clone());

    let server = match config.port {
        Some(port) => {
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
                .await
                .with_context(|| format!("Failed to bind port {port}"))?;
            eprintln!("   Session WS: ws://0.0.0.0:{port}/ws");
            eprintln!("   Session API: http://0.0.0.0:{port}/api/session");
            let app = session_routes(Arc::clone(&controller));
            Some(tokio::spawn(async move {
                tracing::info!(port, "Session server started");
                axum::serve(listener, app).await
            }))
        }
        None => None,
    };

    if config.headless {
        let Some(server) = server else {
            anyhow::bail!("SCHOOL_MATCH_HEADLESS needs SCHOOL_MATCH_PORT to be non-zero");
        };
        eprintln!("   Mode: headless\n");
        server.await.context("Server task panicked")??;
        return Ok(());
    }

    eprintln!("   Completá el formulario. Ctrl-D para salir.\n");
    CliChannel::stdio(controller).run().await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match config.log_dir {
        Some(ref dir) => {
            let appender = tracing_appender::rolling::daily(dir, "school-match.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}
