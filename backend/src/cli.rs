use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use melos_core::domain::{AudioHash, NewSong, SongMetadata, SongPatch, Tag};
use melos_core::ports::{FileSource, UrlSource};
use melos_core::query::{NameFilterInput, SongQuery, SongQueryInput, TagFilter};

use crate::config::ConfigDto;
use crate::ConcreteCatalogService;

#[derive(Debug, Parser)]
#[command(name = "melos", version, about = "Catálogo de audio: ingesta, etiquetas y búsqueda")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Todas las canciones, en orden de almacenamiento
  List,

  /// Una canción por su `audioHash`
  Get { hash: String },

  /// Busca canciones; sin filtros devuelve todo
  Find(FindArgs),

  /// Descarga un audio remoto y lo registra
  AddUrl {
    #[arg(long)]
    url: String,
    /// Nombre base del fichero; por defecto, `--name`
    #[arg(long)]
    title: Option<String>,
    #[command(flatten)]
    meta: MetadataArgs,
  },

  /// Copia un fichero local al área gestionada y lo registra
  AddFile {
    #[arg(long)]
    path: PathBuf,
    #[arg(long)]
    file_name: Option<String>,
    #[command(flatten)]
    meta: MetadataArgs,
  },

  /// Registra un audio que ya está en el área gestionada
  AddLink {
    #[arg(long)]
    link: String,
    #[command(flatten)]
    meta: MetadataArgs,
  },

  /// Cambia nombre y/o autor
  Update {
    hash: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    author: Option<String>,
  },

  /// Borra la canción y su audio gestionado
  Delete { hash: String },

  /// Búsqueda en lenguaje natural
  Ask { prompt: String },

  /// Muestra la configuración efectiva
  Config,
}

#[derive(Debug, clap::Args)]
pub struct MetadataArgs {
  #[arg(long)]
  pub name: String,
  #[arg(long)]
  pub author: String,
  /// `tipo=valor` o sólo `valor`; repetible
  #[arg(long = "tag", value_parser = parse_tag)]
  pub tags: Vec<Tag>,
}

impl From<MetadataArgs> for SongMetadata {
  fn from(args: MetadataArgs) -> Self {
    SongMetadata::new(args.name, args.author, args.tags)
  }
}

#[derive(Debug, Default, clap::Args)]
pub struct FindArgs {
  #[arg(long)]
  pub name_is: Option<String>,
  #[arg(long)]
  pub name_contains: Option<String>,
  #[arg(long)]
  pub tag_type: Option<String>,
  #[arg(long)]
  pub tag_value: Option<String>,
  #[arg(long)]
  pub author: Option<String>,
  /// Consulta completa en JSON, p. ej. `{"name":{"contains":"Song"}}`
  #[arg(long, conflicts_with_all = ["name_is", "name_contains", "tag_type", "tag_value", "author"])]
  pub json: Option<String>,
}

impl FindArgs {
  /// Ambos predicados de nombre a la vez llegan al núcleo y éste los rechaza.
  pub fn into_query(self) -> Result<SongQuery> {
    if let Some(raw) = self.json {
      return Ok(SongQuery::from_json(&raw)?);
    }

    let name = match (&self.name_is, &self.name_contains) {
      (None, None) => None,
      _ => Some(NameFilterInput { is: self.name_is, contains: self.name_contains }),
    };
    let tags = match (&self.tag_type, &self.tag_value) {
      (None, None) => None,
      _ => Some(TagFilter { has_tag_of_type: self.tag_type, value_of_tag_is: self.tag_value }),
    };

    let input = SongQueryInput { name, tags, author: self.author };
    Ok(SongQuery::try_from(input)?)
  }
}

pub fn parse_tag(raw: &str) -> Result<Tag, String> {
  let (kind, value) = match raw.split_once('=') {
    Some((kind, value)) => (kind.trim(), value.trim()),
    None => ("", raw.trim()),
  };

  if value.is_empty() {
    return Err(format!("tag without value: {raw:?}"));
  }
  Ok(Tag::new(kind, value))
}

fn file_name_of(path: &Path) -> Result<String> {
  path
    .file_name()
    .and_then(|n| n.to_str())
    .map(str::to_string)
    .with_context(|| format!("cannot derive a file name from {}", path.display()))
}

/// Ejecuta un comando y devuelve lo que se imprimirá como JSON.
pub async fn execute(service: &ConcreteCatalogService, command: Command) -> Result<Value> {
  let value = match command {
    Command::List => serde_json::to_value(service.list().await?)?,

    Command::Get { hash } => serde_json::to_value(service.get_song(&AudioHash::new(hash)).await?)?,

    Command::Find(args) => {
      let query = args.into_query()?;
      serde_json::to_value(service.find(&query).await?)?
    }

    Command::AddUrl { url, title, meta } => {
      let title = title.unwrap_or_else(|| meta.name.clone());
      let song = service.import_from_url(UrlSource { url, title }, meta.into()).await?;
      serde_json::to_value(song)?
    }

    Command::AddFile { path, file_name, meta } => {
      let file_name = match file_name {
        Some(name) => name,
        None => file_name_of(&path)?,
      };
      let song = service.import_from_file(FileSource { file_path: path, file_name }, meta.into()).await?;
      serde_json::to_value(song)?
    }

    Command::AddLink { link, meta } => {
      let song = service.register_link(NewSong::from_metadata(meta.into(), link)).await?;
      serde_json::to_value(song)?
    }

    Command::Update { hash, name, author } => {
      let song = service.update_song(&AudioHash::new(hash), SongPatch { name, author }).await?;
      serde_json::to_value(song)?
    }

    Command::Delete { hash } => serde_json::to_value(service.delete_song(&AudioHash::new(hash)).await?)?,

    Command::Ask { prompt } => serde_json::to_value(service.ask(&prompt).await?)?,

    Command::Config => serde_json::to_value(ConfigDto::load()?)?,
  };

  Ok(value)
}
