use serde::{Deserialize, Serialize};

/// Etiqueta libre de una canción, p. ej. `genre = rock` o `mood = calm`.
///
/// `kind` se serializa como `type` y puede ir vacío; `value` no.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
  #[serde(rename = "type", default)]
  pub kind: String,
  pub value: String,
}

impl Tag {
  pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
    Self { kind: kind.into(), value: value.into() }
  }
}
