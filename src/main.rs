use sessions::{
    account::{AccountRepository, PostgresAccountRepository},
    application::repository::{ApplicationRepository, PostgresApplicationRepository},
    build_router,
    session::repository::{
        InMemorySessionRepository, PostgresSessionRepository, SessionRepository,
    },
    AppState, ServerConfig,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn AccountRepository + Send + Sync>,
    Arc<dyn ApplicationRepository + Send + Sync>,
    Arc<dyn SessionRepository + Send + Sync>,
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sessions=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sessions service");

    let config = ServerConfig::from_env();

    let (accounts, applications, sessions): Repositories = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!().run(&pool).await?;
            info!("Connected to PostgreSQL and applied migrations");

            let accounts: Arc<dyn AccountRepository + Send + Sync> =
                Arc::new(PostgresAccountRepository::new(pool.clone()));
            let applications: Arc<dyn ApplicationRepository + Send + Sync> =
                Arc::new(PostgresApplicationRepository::new(pool.clone()));
            let sessions: Arc<dyn SessionRepository + Send + Sync> =
                Arc::new(PostgresSessionRepository::new(pool));
            (accounts, applications, sessions)
        }
        // Development mode: nothing persists, and only the SEED_* records exist
        None => {
            warn!("DATABASE_URL not set, using in-memory repositories");
            let (seeded_accounts, seeded_applications) = config.seed.in_memory_repositories()?;
            if config.seed.app_key.is_none() || config.seed.account.is_none() {
                warn!("SEED_APP_KEY or SEED_ACCOUNT_* not set, requests will be refused");
            }

            let accounts: Arc<dyn AccountRepository + Send + Sync> = Arc::new(seeded_accounts);
            let applications: Arc<dyn ApplicationRepository + Send + Sync> =
                Arc::new(seeded_applications);
            let sessions: Arc<dyn SessionRepository + Send + Sync> =
                Arc::new(InMemorySessionRepository::new());
            (accounts, applications, sessions)
        }
    };

    let app_state = AppState::new(accounts, applications, sessions, config.session.clone());
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
