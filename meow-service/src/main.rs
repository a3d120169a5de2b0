use meow_service::{database, observability::init_tracing, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    tracing::info!(backend = %config.storage.backend, "Selecting storage backend");

    let app = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = config.database.as_ref().ok_or_else(|| {
                Error::InvalidConfig("storage backend 'postgres' requires database.url".to_string())
            })?;
            let pool = database::create_pool(db).await?;
            if db.run_migrations {
                database::run_migrations(&pool).await?;
            }
            build_router(AppState::new(config.clone(), PgCatRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on shutdown");
            build_router(AppState::new(config.clone(), MemoryCatRepository::new()))
        }
    };

    Server::new(config).serve(app).await
}
