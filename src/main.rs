use std::sync::Arc;

use chatrails::{
    config::AppConfig,
    http::{self, AppState},
    model::MockModelProvider,
    pipeline::RailedPipeline,
    rails::{RailKind, RailPolicy},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    if config.input_terms.is_empty() {
        warn!("no input blocked terms configured; the input rail passes everything");
    }
    if config.output_terms.is_empty() {
        warn!("no output blocked terms configured; the output rail passes everything");
    }

    let pipeline = Arc::new(RailedPipeline::new(
        Arc::new(MockModelProvider),
        RailPolicy::new(
            RailKind::Input,
            config.input_terms.clone(),
            config.input_refusal.clone(),
        ),
        RailPolicy::new(
            RailKind::Output,
            config.output_terms.clone(),
            config.output_refusal.clone(),
        ),
    ));

    let app = http::router(AppState { pipeline });
    let listener = TcpListener::bind(config.http_bind).await?;
    info!("chatrails HTTP API listening on {}", config.http_bind);

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}
