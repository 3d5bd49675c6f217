use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use melos_core::domain::Catalog;
use melos_core::ports::{DocumentStore, StoreError};

use crate::error::StorageError;
use crate::models::{DocumentRow, NewDocumentRow};
use crate::schema::documents;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Nombre de la fila que guarda el catálogo completo.
const CATALOG_DOCUMENT: &str = "catalog";

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// PRAGMAs aplicados a cada conexión nueva del pool.
#[derive(Debug)]
struct ConnectionOptions {
  journal_mode: Option<String>,
  busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// `DocumentStore` sobre SQLite: el catálogo es una fila JSON y cada `transact` es una
/// transacción `IMMEDIATE`, así que dos escritores nunca se pisan.
#[derive(Clone)]
pub struct SqliteDocumentStore {
  pool: SqlitePool,
}

impl SqliteDocumentStore {
  pub fn open(db_path: &Path, journal_mode: Option<&str>, busy_timeout_ms: u32) -> Result<Self, StorageError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }

    let options = ConnectionOptions { journal_mode: journal_mode.map(str::to_string), busy_timeout_ms };
    let manager = ConnectionManager::<SqliteConnection>::new(db_path.to_string_lossy());
    let pool = Pool::builder()
      .max_size(4)
      .connection_timeout(Duration::from_millis(u64::from(busy_timeout_ms).max(1_000)))
      .connection_customizer(Box::new(options))
      .build(manager)?;

    {
      let mut pooled = pool.get()?;
      let conn: &mut SqliteConnection = &mut pooled;
      let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
      if !applied.is_empty() {
        tracing::info!(count = applied.len(), db = %db_path.display(), "applied migrations");
      }
    }

    Ok(Self { pool })
  }

  /// Number of committed writes to the catalog document.
  pub async fn revision(&self) -> Result<i64, StoreError> {
    let pool = self.pool.clone();
    let revision = tokio::task::spawn_blocking(move || -> Result<i64, StorageError> {
      let mut pooled = pool.get()?;
      Ok(read_row(&mut pooled)?.map_or(0, |row| row.revision))
    })
    .await
    .map_err(|e| StorageError::from(e).into_read())?;

    revision.map_err(StorageError::into_read)
  }
}

fn read_row(conn: &mut SqliteConnection) -> Result<Option<DocumentRow>, StorageError> {
  let row = documents::table
    .find(CATALOG_DOCUMENT)
    .select(DocumentRow::as_select())
    .first::<DocumentRow>(conn)
    .optional()?;
  Ok(row)
}

fn read_catalog(conn: &mut SqliteConnection) -> Result<Catalog, StorageError> {
  match read_row(conn)? {
    Some(row) => Ok(serde_json::from_str(&row.body)?),
    None => Ok(Catalog::default()),
  }
}

fn write_catalog(conn: &mut SqliteConnection, catalog: &Catalog) -> Result<(), StorageError> {
  let json = serde_json::to_string(catalog)?;
  let new_row = NewDocumentRow { name: CATALOG_DOCUMENT, body: &json, revision: 1 };

  diesel::insert_into(documents::table)
    .values(&new_row)
    .on_conflict(documents::name)
    .do_update()
    .set((documents::body.eq(&json), documents::revision.eq(documents::revision + 1)))
    .execute(conn)?;

  Ok(())
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
  async fn transact<F, T>(&self, mutation: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut Catalog) -> T + Send + 'static,
    T: Send + 'static,
  {
    let pool = self.pool.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<T, StorageError> {
      let mut pooled = pool.get()?;
      let conn: &mut SqliteConnection = &mut pooled;

      conn.immediate_transaction(|conn| {
        let mut catalog = read_catalog(conn)?;
        let out = mutation(&mut catalog);
        write_catalog(conn, &catalog)?;
        Ok(out)
      })
    })
    .await
    .map_err(|e| StorageError::from(e).into_write())?;

    result.map_err(StorageError::into_write)
  }

  async fn get_content(&self) -> Result<Catalog, StoreError> {
    let pool = self.pool.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<Catalog, StorageError> {
      let mut pooled = pool.get()?;
      read_catalog(&mut pooled)
    })
    .await
    .map_err(|e| StorageError::from(e).into_read())?;

    result.map_err(StorageError::into_read)
  }
}
