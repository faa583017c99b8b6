use crate::catalog::{DEFAULT_CATALOG, SeedOutcome};
use crate::db;
use crate::errors::Result;
use log::info;
use sqlx::SqlitePool;

pub struct Logbook {
    pub db_pool: SqlitePool,
}

impl Logbook {
    /// Opens the database at `db_path`, applies migrations and seeds the
    /// built-in catalog. A seeding failure is returned and should abort startup.
    pub async fn new(db_path: &str) -> Result<Self> {
        let pool = db::open_pool(db_path).await?;
        Self::from_pool(pool).await
    }

    /// Same as `new`, with the path taken from `DATABASE_URL`.
    pub async fn from_env() -> Result<Self> {
        let path = db::get_db_path().await?;
        Self::new(path).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        db::init_database(&pool).await?;
        let logbook = Self { db_pool: pool };

        match logbook.seed_catalog(DEFAULT_CATALOG).await? {
            SeedOutcome::Seeded { exercises, links } => {
                info!("Catalog initialised: {} exercises, {} links", exercises, links)
            }
            SeedOutcome::Skipped { existing } => {
                info!("Catalog present with {} exercises", existing)
            }
        }

        Ok(logbook)
    }

    /// Wipes all rows and re-seeds the built-in catalog.
    pub async fn reset(&self) -> Result<SeedOutcome> {
        db::drop_all_tables(&self.db_pool).await?;
        self.seed_catalog(DEFAULT_CATALOG).await
    }

    pub async fn close(self) {
        self.db_pool.close().await;
    }
}
