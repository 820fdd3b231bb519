use clap::Parser;
use skinmatch::{AppState, ArtifactPaths, Artifacts, RestApi};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Skincare product browser: ingredient search and similar-product recommendations
#[derive(Parser, Debug)]
#[command(name = "skinmatch")]
#[command(about = "Skincare product browser and recommender", long_about = None)]
struct Args {
    /// Directory holding the exported artifacts
    #[arg(short, long, default_value = "./deployment_files")]
    artifacts_dir: PathBuf,

    /// Product catalog CSV (defaults to <artifacts-dir>/skincare_products.csv)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Similarity matrix .npy (defaults to <artifacts-dir>/similarity_matrix.npy)
    #[arg(long)]
    similarity: Option<PathBuf>,

    /// Model file (defaults to <artifacts-dir>/skincare_model.h5)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Root of the per-brand image directories
    #[arg(long, default_value = ".")]
    images_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8501)]
    http_port: u16,

    /// Recommendations per product-list selection (3-10)
    #[arg(long, default_value_t = 5)]
    default_top_n: usize,

    /// Seconds before an untouched browsing session is dropped
    #[arg(long, default_value_t = 1800)]
    session_idle_secs: u64,

    /// Validate the artifacts and exit
    #[arg(long)]
    check: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.artifacts_dir);
        ArtifactPaths {
            catalog: self.catalog.clone().unwrap_or(defaults.catalog),
            similarity: self.similarity.clone().unwrap_or(defaults.similarity),
            model: self.model.clone().unwrap_or(defaults.model),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Skinmatch v{}", env!("CARGO_PKG_VERSION"));
    let paths = args.artifact_paths();
    info!("Artifacts: {:?}", paths);
    info!("Images directory: {:?}", args.images_dir);

    let artifacts = match Artifacts::load(&paths, &args.images_dir) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("Failed to load artifacts: {}", e);
            eprintln!("{}", paths.regeneration_hint());
            return Err(anyhow::Error::new(e).context("startup artifacts unavailable"));
        }
    };

    if args.check {
        info!("Artifacts OK");
        return Ok(());
    }

    let state = Arc::new(
        AppState::from_artifacts(artifacts)
            .with_default_top_n(args.default_top_n)
            .with_session_idle_timeout(Duration::from_secs(args.session_idle_secs)),
    );

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Skinmatch started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
