use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use supplier_recommender::utils::{logger, validation::Validate};
use supplier_recommender::{create_router, AppState, CliConfig, CsvStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }

    tracing::info!("Starting supplier-recommender");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = CsvStore::new(&config.data.dir);
    if cli.init_data {
        let created = store
            .init()
            .with_context(|| format!("initializing data directory {}", config.data.dir))?;
        tracing::info!("📁 Initialized {} dataset file(s)", created.len());
    }
    tracing::info!("📁 Data directory: {}", store.data_dir().display());

    let options = config.recommend_options();
    tracing::info!(
        "Scoring: policy={:?}, max_distance_km={}, top_n={}",
        options.policy,
        options.max_distance_km,
        options.top_n
    );

    let state = Arc::new(AppState::new(store, options));
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("🚀 Listening on http://{}", addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
