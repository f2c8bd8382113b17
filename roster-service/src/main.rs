mod api;
mod domain;
mod infrastructure;

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::state::AppState;
use infrastructure::config::Settings;
use infrastructure::job_processor::JobProcessor;
use infrastructure::repositories::{PostgresRosterJobRepository, PostgresRosterResultRepository};
use infrastructure::solver_client::{HttpSolverClient, SolverKnobs};
use infrastructure::{database, solver_client::SolverClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Roster Service...");

    let settings = Settings::new()?;
    tracing::info!("Configuration loaded: {:?}", settings);

    let db_pool =
        database::create_pool(&settings.database.url, settings.database.max_connections).await?;
    tracing::info!("Database connection pool created");

    database::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations completed");

    let redis_pool = shared::create_redis_pool(&settings.redis.url).await?;
    tracing::info!("Redis connection established");

    let job_repo = Arc::new(PostgresRosterJobRepository::new(db_pool.clone()));
    let result_repo = Arc::new(PostgresRosterResultRepository::new(db_pool.clone()));
    let solver_client: Arc<dyn SolverClient> =
        Arc::new(HttpSolverClient::new(settings.solver.endpoint_url.clone()));
    let solver_knobs = SolverKnobs {
        max_time_in_seconds: settings.solver.max_time_in_seconds,
        num_workers: settings.solver.num_workers,
    };
    let objective_weights = domain::services::ObjectiveWeights {
        understaffing_weight: settings.solver.understaffing_weight,
        deviation_weight: settings.solver.pattern_weight,
    };

    let processor = Arc::new(JobProcessor::new(
        job_repo.clone(),
        result_repo.clone(),
        solver_client,
        solver_knobs,
        objective_weights,
    ));
    let (roster_sender, _processor_handle) = processor.start();

    let state = AppState::new(job_repo, result_repo, roster_sender, redis_pool);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server_address()).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Roster Service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
