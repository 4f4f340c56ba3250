/// SQL query functions for database operations
///
/// `Database` implements `TermStore` here. Lookups go through the
/// lower-cased `term_key` column so uniqueness holds for non-ASCII terms too.

use crate::db::models::*;
use crate::db::store::TermStore;
use crate::db::Database;
use crate::error::Result;
use chrono::Utc;
use tracing::debug;

impl TermStore for Database {
    async fn find_by_term(&self, term: &str) -> Result<Option<Definition>> {
        let definition =
            sqlx::query_as::<_, Definition>("SELECT * FROM definitions WHERE term_key = ?")
                .bind(Definition::term_key(term))
                .fetch_optional(self.pool())
                .await?;

        Ok(definition)
    }

    async fn list_definitions(
        &self,
        order: DefinitionOrder,
        page: Option<Page>,
    ) -> Result<Vec<Definition>> {
        let definitions = if let Some(page) = page {
            let sql = format!(
                "SELECT * FROM definitions ORDER BY {} LIMIT ? OFFSET ?",
                order.sql()
            );
            sqlx::query_as::<_, Definition>(&sql)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(self.pool())
                .await?
        } else {
            let sql = format!("SELECT * FROM definitions ORDER BY {}", order.sql());
            sqlx::query_as::<_, Definition>(&sql)
                .fetch_all(self.pool())
                .await?
        };

        Ok(definitions)
    }

    async fn insert_definition(&self, input: NewDefinition) -> Result<Definition> {
        let definition = sqlx::query_as::<_, Definition>(
            r#"
            INSERT INTO definitions (term, term_key, definition, author_name, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, term, definition, author_name, created_at
            "#,
        )
        .bind(&input.term)
        .bind(Definition::term_key(&input.term))
        .bind(&input.definition)
        .bind(&input.author_name)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        debug!(id = definition.id, term = %definition.term, "inserted definition");
        Ok(definition)
    }

    async fn update_definition(&self, definition: &Definition) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE definitions
            SET term = ?, term_key = ?, definition = ?, author_name = ?, created_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&definition.term)
        .bind(Definition::term_key(&definition.term))
        .bind(&definition.definition)
        .bind(&definition.author_name)
        .bind(definition.created_at)
        .bind(definition.id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete_definition(&self, definition: &Definition) -> Result<()> {
        sqlx::query("DELETE FROM definitions WHERE id = ?")
            .bind(definition.id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn append_interaction(&self, input: NewInteraction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO interactions (term, author_name, action, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&input.term)
        .bind(&input.author_name)
        .bind(input.action.as_str())
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn count_definitions(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM definitions")
            .fetch_one(self.pool())
            .await?;

        Ok(count.0)
    }

    async fn count_distinct_authors(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT author_name) FROM definitions")
            .fetch_one(self.pool())
            .await?;

        Ok(count.0)
    }

    async fn count_interactions(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interactions")
            .fetch_one(self.pool())
            .await?;

        Ok(count.0)
    }
}

impl Database {
    /// Every logged lookup, newest first
    pub async fn get_interactions(&self) -> Result<Vec<Interaction>> {
        let interactions = sqlx::query_as::<_, Interaction>(
            "SELECT * FROM interactions ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(interactions)
    }
}
