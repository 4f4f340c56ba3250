/// gloss library
///
/// Turns chat messages into glossary operations: look a term up, teach a
/// new one, search, list, delete, and report usage.

pub mod config;
pub mod core;
pub mod db;
pub mod error;

// Re-exports for convenience
pub use db::Database;
pub use error::{GlossError, Result};
