pub mod cli;
pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use melos_core::fingerprint::FingerprintMode;
use melos_core::services::{CatalogRepository, CatalogService};
use melos_ingest::ManagedIngestor;
use melos_storage::CatalogStore;

use crate::cli::Cli;
use crate::config::FingerprintConfig;

/// Type alias to simplify the generic signature of the Service.
pub type ConcreteCatalogService =
  CatalogService<CatalogRepository<CatalogStore, FingerprintMode>, CatalogStore, ManagedIngestor>;

/// Builds the service from `melos.toml`, writing defaults for any missing section.
pub fn build_service() -> Result<ConcreteCatalogService> {
  // --- Dependency Injection Phase ---

  // 1. Persistence Adapter (SQLite / JSON / memoria según `[storage]`)
  let store = Arc::new(CatalogStore::new_from_config().context("opening catalog store")?);

  // 2. Ingestion Adapter (área gestionada + cliente HTTP)
  let ingestor = ManagedIngestor::new_from_config().context("preparing ingestion")?;

  // 3. Fingerprint mode
  let fingerprint = FingerprintConfig::load().context("loading [fingerprint]")?;

  // 4. Service Wiring
  let repo = CatalogRepository::new(Arc::clone(&store), fingerprint.mode);
  Ok(CatalogService::new(repo, store, ingestor))
}

pub async fn run(cli: Cli) -> Result<Value> {
  let service = build_service()?;
  cli::execute(&service, cli.command).await
}
