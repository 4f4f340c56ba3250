/// Data models for database entities
///
/// Both models map to tables in database/schema.sql and use sqlx for
/// row decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Definition {
    pub id: i64,
    pub term: String,
    pub definition: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>, // re-stamped on every overwrite
}

impl Definition {
    /// Key used for case-insensitive uniqueness and lookup
    pub fn term_key(term: &str) -> String {
        term.to_lowercase()
    }
}

/// Input for a brand new glossary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDefinition {
    pub term: String,
    pub definition: String,
    pub author_name: String,
}

/// A logged lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Interaction {
    pub id: i64,
    pub term: String,
    pub author_name: String,
    pub action: String, // 'found' or 'not_found'
    pub created_at: DateTime<Utc>,
}

/// What happened when somebody asked for a term
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionAction {
    Found,
    NotFound,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionAction::Found => "found",
            InteractionAction::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for InteractionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for appending to the interaction log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInteraction {
    pub term: String,
    pub author_name: String,
    pub action: InteractionAction,
}

/// Row ordering for definition listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionOrder {
    TermAsc,
    TermDesc,
    Newest,
    Random,
}

impl DefinitionOrder {
    pub(crate) fn sql(&self) -> &'static str {
        match self {
            DefinitionOrder::TermAsc => "term ASC",
            DefinitionOrder::TermDesc => "term DESC",
            DefinitionOrder::Newest => "created_at DESC, id DESC",
            DefinitionOrder::Random => "RANDOM()",
        }
    }
}

/// A LIMIT/OFFSET window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Full dump of both tables, used by `gloss export` and `gloss import`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub definitions: Vec<Definition>,
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_key_ignores_case() {
        assert_eq!(Definition::term_key("EW"), Definition::term_key("ew"));
        assert_eq!(Definition::term_key("Ärger"), "ärger");
    }

    #[test]
    fn test_interaction_action_display() {
        assert_eq!(InteractionAction::Found.to_string(), "found");
        assert_eq!(InteractionAction::NotFound.to_string(), "not_found");
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = Snapshot::default();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["definitions"].as_array().unwrap().is_empty());
        assert!(json["interactions"].as_array().unwrap().is_empty());
    }
}
