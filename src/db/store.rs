/// The storage seam the glossary core talks to
///
/// The dispatcher never touches SQL. Anything that can find, list, write and
/// count definitions and interactions can back it; `Database` is the SQLite
/// implementation.

use crate::db::models::{
    Definition, DefinitionOrder, NewDefinition, NewInteraction, Page,
};
use crate::error::Result;

#[allow(async_fn_in_trait)]
pub trait TermStore {
    /// Look a term up ignoring case
    async fn find_by_term(&self, term: &str) -> Result<Option<Definition>>;

    /// List definitions in the given order, optionally windowed
    ///
    /// `None` returns every row.
    async fn list_definitions(
        &self,
        order: DefinitionOrder,
        page: Option<Page>,
    ) -> Result<Vec<Definition>>;

    /// Insert a brand new definition, stamped with the current time
    async fn insert_definition(&self, input: NewDefinition) -> Result<Definition>;

    /// Overwrite an existing definition (matched by id)
    async fn update_definition(&self, definition: &Definition) -> Result<()>;

    async fn delete_definition(&self, definition: &Definition) -> Result<()>;

    async fn append_interaction(&self, input: NewInteraction) -> Result<()>;

    async fn count_definitions(&self) -> Result<i64>;

    /// Number of distinct authors across current definitions
    async fn count_distinct_authors(&self) -> Result<i64>;

    async fn count_interactions(&self) -> Result<i64>;
}
