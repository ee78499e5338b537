use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use research_tracker::api;
use research_tracker::store::{Backend, StoreConfig};
use research_tracker::ProjectRepository;

#[derive(Parser)]
#[command(name = "rtrack")]
#[command(about = "Track research projects, milestones, tasks and sources")]
struct Cli {
    /// Storage backend for the project collection
    #[arg(long, value_enum, default_value_t = BackendArg::File, global = true)]
    backend: BackendArg,

    /// Path of the JSON file or SQLite database (defaults to the data dir)
    #[arg(long, global = true)]
    data_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Print dashboard statistics as JSON
    Stats,
    /// Write the example project into an empty store
    Seed,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Memory,
    File,
    Sqlite,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Memory => Backend::Memory,
            BackendArg::File => Backend::File,
            BackendArg::Sqlite => Backend::Sqlite,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "research_tracker=debug,tracker_core=debug,tower_http=debug".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = StoreConfig {
        backend: cli.backend.into(),
        path: cli.data_path,
    };
    let repo = ProjectRepository::new(Arc::new(config.open()));

    match cli.command {
        Some(Commands::Serve { port, host }) => serve(repo, &host, port).await?,
        Some(Commands::Stats) => {
            let stats = repo.dashboard();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Some(Commands::Seed) => {
            let store = repo.store();
            if store.seed_if_empty() {
                println!("Seeded {} with the example project", store.describe());
            } else {
                println!(
                    "Store {} already holds {} project(s), left unchanged",
                    store.describe(),
                    repo.get_all().len()
                );
            }
        }
        None => serve(repo, "127.0.0.1", 3000).await?,
    }

    Ok(())
}

async fn serve(repo: ProjectRepository, host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting research tracker on port {}", port);

    let app = api::create_router(repo);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Research tracker listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
