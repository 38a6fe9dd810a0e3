//! SQLite persistence for venues, artists and shows.
//!
//! [`Store`] owns the connection pool. Every unit of work borrows one pooled
//! connection for its duration: [`Store::read`] for queries and
//! [`Store::transaction`] for writes, which commits on `Ok` and rolls back on
//! `Err` before the connection goes back to the pool.

pub mod artists;
pub mod seed;
pub mod shows;
pub mod venues;

use std::{path::Path, time::Duration};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{types::Type, Connection, Row, Transaction, TransactionBehavior};
use tracing::{info, warn};

use crate::error::Result;
use crate::utils;

pub use artists::Artists;
pub use shows::Shows;
pub use venues::Venues;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS venues(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        address TEXT NOT NULL,
        phone TEXT,
        genres TEXT NOT NULL DEFAULT '[]',
        image_link TEXT,
        facebook_link TEXT,
        website_link TEXT,
        seeking_talent INTEGER NOT NULL DEFAULT 0,
        seeking_description TEXT
    );
    CREATE TABLE IF NOT EXISTS artists(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        phone TEXT,
        genres TEXT NOT NULL DEFAULT '[]',
        image_link TEXT,
        facebook_link TEXT,
        website_link TEXT,
        seeking_venue INTEGER NOT NULL DEFAULT 0,
        seeking_description TEXT
    );
    CREATE TABLE IF NOT EXISTS shows(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        venue_id INTEGER NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
        artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
        start_time TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS shows_venue_id ON shows(venue_id);
    CREATE INDEX IF NOT EXISTS shows_artist_id ON shows(artist_id);
";

/// Basic persistence operations shared by every entity.
pub trait Repository {
    type Record;
    type Draft;

    fn create(conn: &Connection, draft: &Self::Draft) -> Result<i64>;
    fn get(conn: &Connection, id: i64) -> Result<Option<Self::Record>>;
    fn list(conn: &Connection) -> Result<Vec<Self::Record>>;
    /// Overwrites every field. Returns `false` when no row has `id`.
    fn update(conn: &Connection, id: i64, draft: &Self::Draft) -> Result<bool>;
    fn delete(conn: &Connection, id: i64) -> Result<bool>;
}

#[derive(Clone)]
pub struct Store {
    pool: Pool<SqliteConnectionManager>,
}

impl Store {
    pub fn open(path: &Path, pool_size: u32) -> Result<Self> {
        utils::ensure_parent(path);
        let manager = SqliteConnectionManager::file(path).with_init(configure_connection);
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;
        let store = Self { pool };
        store.init_schema()?;
        info!("opened database at {:?}", path);
        Ok(store)
    }

    /// Single-connection in-memory database; every pooled connection to
    /// `:memory:` would otherwise be a separate database.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(configure_connection);
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .build(manager)?;
        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.read(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
    }

    pub fn read<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.pool.get()?;
        work(&conn)
    }

    pub fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.pool.get()?;
        // Writers hold the lock from BEGIN; reads inside never upgrade.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Runs blocking store work off the async executor.
    pub async fn call<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || work(&store)).await?
    }
}

fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    // In-memory databases answer "memory" and keep their journal.
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

pub(crate) fn encode_genres(genres: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(genres).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

pub(crate) fn decode_genres(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let payload: String = row.get(idx)?;
    serde_json::from_str(&payload)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

/// Case-insensitive substring match; an empty term matches everything.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}
