/// Whole-glossary export and import
///
/// Used to move a glossary between databases. Import replaces everything.

use crate::db::models::{Definition, DefinitionOrder, Snapshot};
use crate::db::store::TermStore;
use crate::db::Database;
use crate::error::{GlossError, Result};
use std::collections::HashSet;
use tracing::info;

impl Database {
    /// Dump every definition and interaction, newest first
    pub async fn export_snapshot(&self) -> Result<Snapshot> {
        let definitions = self.list_definitions(DefinitionOrder::Newest, None).await?;
        let interactions = self.get_interactions().await?;

        Ok(Snapshot {
            definitions,
            interactions,
        })
    }

    /// Replace both tables with the snapshot's contents
    ///
    /// Runs in one transaction; on any failure the existing data is kept.
    pub async fn import_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let mut seen = HashSet::new();
        for definition in &snapshot.definitions {
            if !seen.insert(Definition::term_key(&definition.term)) {
                return Err(GlossError::InvalidSnapshot(format!(
                    "term '{}' appears more than once (ignoring case)",
                    definition.term
                )));
            }
        }

        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM interactions")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM definitions")
            .execute(&mut *tx)
            .await?;

        for definition in &snapshot.definitions {
            sqlx::query(
                r#"
                INSERT INTO definitions (id, term, term_key, definition, author_name, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(definition.id)
            .bind(&definition.term)
            .bind(Definition::term_key(&definition.term))
            .bind(&definition.definition)
            .bind(&definition.author_name)
            .bind(definition.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for interaction in &snapshot.interactions {
            sqlx::query(
                r#"
                INSERT INTO interactions (id, term, author_name, action, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(interaction.id)
            .bind(&interaction.term)
            .bind(&interaction.author_name)
            .bind(&interaction.action)
            .bind(interaction.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            definitions = snapshot.definitions.len(),
            interactions = snapshot.interactions.len(),
            "imported snapshot"
        );
        Ok(())
    }
}
