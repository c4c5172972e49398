use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
  #[error("Failed to load HTML grammar: {0}")]
  Language(String),

  #[error("Parser produced no tree")]
  NoTree,
}
