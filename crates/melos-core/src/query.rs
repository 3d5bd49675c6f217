//! Compound song filters.
//!
//! A [`SongQuery`] ANDs together up to three independent predicates (name, tags, author).
//! The engine is a pure function over a snapshot: it never reorders, never mutates and
//! never fails. The only failure lives at the input boundary, where the wire shape
//! [`SongQueryInput`] still allows `is` and `contains` side by side.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Song, Tag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
  #[error("name filter cannot use both `is` and `contains`")]
  ConflictingNamePredicate,

  #[error("malformed query: {0}")]
  Malformed(String),
}

/// Predicado sobre el nombre: exacto o por subcadena, nunca ambos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
  Is(String),
  Contains(String),
}

impl NameFilter {
  pub fn matches(&self, name: &str) -> bool {
    match self {
      NameFilter::Is(expected) => name == expected,
      NameFilter::Contains(needle) => name.contains(needle.as_str()),
    }
  }
}

/// Each present sub-predicate is checked against the whole tag list on its own, so
/// `{mood, calm}` does not require a single `mood=calm` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TagFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub has_tag_of_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value_of_tag_is: Option<String>,
}

impl TagFilter {
  pub fn matches(&self, tags: &[Tag]) -> bool {
    let type_ok = match &self.has_tag_of_type {
      Some(kind) => tags.iter().any(|t| &t.kind == kind),
      None => true,
    };

    type_ok
      && match &self.value_of_tag_is {
        Some(value) => tags.iter().any(|t| &t.value == value),
        None => true,
      }
  }

  pub fn is_empty(&self) -> bool {
    self.has_tag_of_type.is_none() && self.value_of_tag_is.is_none()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongQuery {
  pub name: Option<NameFilter>,
  pub tags: Option<TagFilter>,
  pub author: Option<String>,
}

impl SongQuery {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn name_is(mut self, name: impl Into<String>) -> Self {
    self.name = Some(NameFilter::Is(name.into()));
    self
  }

  pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
    self.name = Some(NameFilter::Contains(needle.into()));
    self
  }

  pub fn has_tag_of_type(mut self, kind: impl Into<String>) -> Self {
    self.tags.get_or_insert_with(TagFilter::default).has_tag_of_type = Some(kind.into());
    self
  }

  pub fn value_of_tag_is(mut self, value: impl Into<String>) -> Self {
    self.tags.get_or_insert_with(TagFilter::default).value_of_tag_is = Some(value.into());
    self
  }

  pub fn author(mut self, author: impl Into<String>) -> Self {
    self.author = Some(author.into());
    self
  }

  /// Parses the wire shape, e.g. `{"name":{"contains":"Song"},"author":"Artist A"}`.
  pub fn from_json(raw: &str) -> Result<Self, QueryError> {
    let input: SongQueryInput = serde_json::from_str(raw).map_err(|e| QueryError::Malformed(e.to_string()))?;
    input.try_into()
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.author.is_none() && self.tags.as_ref().is_none_or(TagFilter::is_empty)
  }

  /// Autor primero (comparación directa), luego nombre, y las etiquetas al final
  /// porque recorren la lista entera.
  pub fn matches(&self, song: &Song) -> bool {
    if let Some(author) = &self.author {
      if &song.author != author {
        return false;
      }
    }

    if let Some(name) = &self.name {
      if !name.matches(&song.name) {
        return false;
      }
    }

    match &self.tags {
      Some(tags) => tags.matches(&song.tags),
      None => true,
    }
  }
}

/// Filters `songs`, keeping their relative order. No predicates means a full copy.
pub fn filter_songs(songs: &[Song], query: &SongQuery) -> Vec<Song> {
  songs.iter().filter(|song| query.matches(song)).cloned().collect()
}

/// Forma "de cable" del predicado de nombre, tal y como llega del exterior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameFilterInput {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contains: Option<String>,
}

impl NameFilterInput {
  pub fn into_filter(self) -> Result<Option<NameFilter>, QueryError> {
    match (self.is, self.contains) {
      (Some(_), Some(_)) => Err(QueryError::ConflictingNamePredicate),
      (Some(is), None) => Ok(Some(NameFilter::Is(is))),
      (None, Some(contains)) => Ok(Some(NameFilter::Contains(contains))),
      (None, None) => Ok(None),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SongQueryInput {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<NameFilterInput>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags: Option<TagFilter>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
}

impl TryFrom<SongQueryInput> for SongQuery {
  type Error = QueryError;

  fn try_from(input: SongQueryInput) -> Result<Self, Self::Error> {
    let name = match input.name {
      Some(name) => name.into_filter()?,
      None => None,
    };

    Ok(SongQuery { name, tags: input.tags, author: input.author })
  }
}
