use std::{env, error::Error, path::PathBuf, str::FromStr, time::Duration};

use async_trait::async_trait;
use queries::convert_error;
use railway::database::{Database, DatabaseAutocommit, DatabaseTransaction};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Transaction,
};

pub mod data_model;
pub mod queries;

const DEFAULT_DATABASE_FILE: &str = "railway_system.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DatabaseConnectionInfo {
    pub filename: PathBuf,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let filename = env::var("DATABASE_FILE").ok()?;
        Some(Self {
            filename: filename.into(),
        })
    }

    pub(self) fn sqlite_options(self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(self.filename)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            // writers queue up for the lock instead of failing right away
            .busy_timeout(BUSY_TIMEOUT)
    }
}

impl Default for DatabaseConnectionInfo {
    fn default() -> Self {
        Self {
            filename: DEFAULT_DATABASE_FILE.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    connection: sqlx::SqlitePool,
}

pub struct SqliteDatabaseTransaction<'a> {
    tx: Transaction<'a, sqlx::Sqlite>,
}

#[async_trait]
impl<'a> DatabaseTransaction for SqliteDatabaseTransaction<'a> {
    async fn commit(self) -> railway::database::Result<()> {
        self.tx.commit().await.map_err(convert_error)
    }
}

pub struct SqliteDatabaseAutocommit {
    pool: sqlx::SqlitePool,
}

impl DatabaseAutocommit for SqliteDatabaseAutocommit {}

impl SqliteDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        log::info!(
            "opening database {}",
            database_connection_info.filename.display()
        );
        let pool = SqlitePoolOptions::new()
            .connect_with(database_connection_info.sqlite_options())
            .await?;

        Self::migrate(pool).await
    }

    /// A private database that lives as long as the returned value. All access
    /// goes through a single connection, as every sqlite in-memory connection
    /// would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, Box<dyn Error>> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: sqlx::SqlitePool) -> Result<Self, Box<dyn Error>> {
        log::info!("running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    type Transaction = SqliteDatabaseTransaction<'static>;
    type Autocommit = SqliteDatabaseAutocommit;

    // three bound columns per seat stay well below sqlite's variable limit
    const BULK_INSERT_MAX: usize = 999;

    fn auto(&self) -> Self::Autocommit {
        SqliteDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }

    async fn transaction(&self) -> railway::database::Result<Self::Transaction> {
        let tx: Transaction<'static, sqlx::Sqlite> =
            self.connection.begin().await.map_err(convert_error)?;

        Ok(SqliteDatabaseTransaction { tx })
    }
}
