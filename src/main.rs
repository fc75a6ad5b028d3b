use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;

use clap::Parser;
use tokio::net::TcpListener;

use cohort::application::grouping_service::GroupingRequest;
use cohort::application::import::{import_embeddings, ImportSummary};
use cohort::cli::commands::{Cli, Commands};
use cohort::config::Settings;
use cohort::domain::values::user_id::UserId;
use cohort::infrastructure::observability::init_tracing;
use cohort::infrastructure::sqlite::embedding_store::SqliteEmbeddingStore;
use cohort::presentation::{create_router, AppState};
use cohort::Cohort;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            let addr: SocketAddr = format!("{host}:{port}").parse()?;

            let router = create_router(AppState::new(Cohort::new(&settings)?));
            tracing::info!("Listening on {}", addr);

            let listener = TcpListener::bind(addr).await?;
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Commands::Group {
            size,
            strategy,
            users,
            seed,
        } => {
            let request = GroupingRequest {
                group_size: size,
                strategy,
                user_ids: users.map(|ids| ids.into_iter().map(UserId::from).collect()),
                seed,
            };
            let result = Cohort::new(&settings)?.create_groups(request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Users => {
            let users = Cohort::new(&settings)?.list_users().await?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        Commands::Pairs { top_k } => {
            let pairs = Cohort::new(&settings)?.top_pairs(top_k).await?;
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        }
        Commands::Import { file } => {
            let summary = run_import(&settings, file.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn run_import(settings: &Settings, file: Option<&Path>) -> anyhow::Result<ImportSummary> {
    let store = SqliteEmbeddingStore::open(&settings.db_path)?;
    let summary = match file {
        Some(path) if path != Path::new("-") => {
            let reader = BufReader::new(File::open(path)?);
            import_embeddings(&store, reader)?
        }
        _ => import_embeddings(&store, std::io::stdin().lock())?,
    };
    Ok(summary)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
