use alt_text_generator::models::Config;
use alt_text_generator::pipeline::Pipeline;
use alt_text_generator::web::{self, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "alt-text-generator")]
#[command(about = "Generate alt text for uploaded images")]
struct CliArgs {
    /// Address to bind the web UI to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to serve the web UI on.
    #[arg(long, default_value_t = 8501)]
    port: u16,
}

async fn serve(args: CliArgs) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let pipeline = Pipeline::from_config(&config).context("Failed to build pipeline")?;
    let app = web::router(AppState::new(pipeline, config.max_upload_bytes));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving UI at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alt_text_generator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting alt-text-generator");

    let args = CliArgs::parse();

    match serve(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Server failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
