use library_lending::{
    adapters::sqlite::{DbConfig, SqliteRepository, connect},
    api::{handlers::AppState, router::create_router},
    application::library::ServiceDependencies,
    config::AppConfig,
    controller::LibraryController,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_lending=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Database URL: {}", config.database_url);

    // Open SQLite and run migrations
    let db_config = DbConfig::new(&config.database_url).max_connections(config.max_connections);
    let pool = connect(&db_config)
        .await
        .expect("Failed to open database");

    // The repository owns the pool; the service only sees the ports
    let repository = Arc::new(SqliteRepository::new(pool));
    let service_deps = ServiceDependencies::from_repository(repository);
    let controller = LibraryController::new(service_deps);

    let app_state = Arc::new(AppState { controller });
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
