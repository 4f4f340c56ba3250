/// Database module for gloss
///
/// Handles all database operations using SQLite and sqlx, behind the
/// `TermStore` trait the core depends on.

pub mod connection;
pub mod models;
pub mod queries;
pub mod snapshot;
pub mod store;

pub use connection::Database;
pub use models::*;
pub use store::TermStore;
