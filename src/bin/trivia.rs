use anyhow::Context;
use trivia_api::config::Settings;
use trivia_api::db::{self, run_migrations};
use trivia_api::server::{run_server, AppState};
use trivia_api::telemetry::init_tracing;

use clap::Parser;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(default_value = "serve")]
    runner: Runner,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Runner {
    /// Apply migrations and serve the API
    Serve,
    /// Apply migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load configuration")?;

    let pool = db::establish_connection(&settings.database)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path))?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    match cli.runner {
        Runner::Serve => {
            let state = AppState::new(pool, settings.quiz.seed);
            run_server(state, &settings.server.address()).await?
        }
        Runner::Migrate => tracing::info!("Migrations applied"),
    };
    Ok(())
}
