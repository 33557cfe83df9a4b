mod seed;

use anyhow::{Context, Result};
use clap::Parser;
use collection_renderer::{PaginatedCollectionRenderer, ServerLimits, web};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "collection-renderer")]
#[command(about = "Serves seeded control-plane collections through the paginated renderer")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Rows generated per seeded collection.
    #[arg(long, default_value_t = 25)]
    seed_count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let limits = ServerLimits::from_env().context("failed to load server limits")?;
    info!(
        default_results_per_page = limits.default_results_per_page,
        max_results_per_page = limits.max_results_per_page,
        max_inline_relations_depth = limits.max_inline_relations_depth,
        "server limits loaded"
    );

    let state = seed::seed_catalog(PaginatedCollectionRenderer::new(limits), args.seed_count)
        .context("failed to seed collections")?;
    info!(collections = ?state.collection_names(), rows = args.seed_count, "catalog seeded");

    let app = web::collection_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "collection renderer started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("collection_renderer=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
