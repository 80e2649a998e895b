use anyhow::Result;
use clap::Parser;
use plant_predict::{config::Config, web::serve};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plant-predict")]
#[command(about = "Plant species classification API backed by ONNX Runtime")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: String,

    /// Path to the serialized model artifact
    #[arg(long, env = "MODEL_PATH")]
    model: PathBuf,

    /// Directory for spooling uploads (defaults to the system temp dir)
    #[arg(long)]
    spool_dir: Option<PathBuf>,

    /// Intra-op CPU threads for inference
    #[arg(long)]
    intra_threads: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting plant prediction service...");
    tracing::info!("Bind address: {}", args.bind);
    tracing::info!("Model path: {}", args.model.display());

    let config = Config::new(args.bind, args.model, args.spool_dir, args.intra_threads)?;

    serve(config).await?;

    Ok(())
}
