/// Listing engine for `recent` / `learnings`
///
/// Turns loose params like "alpha 20 40" or "random all" into a windowed
/// query and renders the result as a one-line list of terms.

use crate::core::formatter::make_bold;
use crate::db::{Definition, DefinitionOrder, Page, TermStore};
use crate::error::Result;
use rand::seq::SliceRandom;
use tracing::debug;

/// How many terms a bare `recent` shows
pub const DEFAULT_COUNT: u32 = 12;

pub const NO_DEFINITIONS_TEXT: &str = "I haven't learned any definitions yet.";

const RECENT_SINGULAR: &str = "I recently learned the definition for";
const RECENT_PLURAL: &str = "I recently learned definitions for";
const KNOWN_SINGULAR: &str = "I know the definition for";
const KNOWN_PLURAL: &str = "I know definitions for";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Recent,
    Random,
    Alpha,
}

/// Parsed listing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingParams {
    /// Zero means "everything"
    pub count: u32,
    pub sort: SortOrder,
    pub offset: u32,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            sort: SortOrder::Recent,
            offset: 0,
        }
    }
}

impl ListingParams {
    /// Parse whitespace-separated tokens in any order
    ///
    /// `random`, `alpha`/`alphabetical` pick the sort, `all` means no limit,
    /// the first number is the count and the second the offset. Anything
    /// else is ignored.
    pub fn parse(params: &str) -> Self {
        let mut sort = SortOrder::Recent;
        let mut count: Option<u32> = None;
        let mut offset: Option<u32> = None;

        for token in params.split(' ') {
            match token {
                "random" => sort = SortOrder::Random,
                "alpha" | "alphabetical" => sort = SortOrder::Alpha,
                // Claims the count slot, so a later number becomes the offset
                "all" => count = Some(0),
                _ => {
                    let Ok(number) = token.parse::<u32>() else {
                        continue;
                    };
                    if count.is_none() {
                        count = Some(number);
                    } else if offset.is_none() {
                        offset = Some(number);
                    }
                }
            }
        }

        Self {
            count: count.unwrap_or(DEFAULT_COUNT),
            sort,
            offset: offset.unwrap_or(0),
        }
    }

    /// Default recency view with no offset reads as "recently learned"
    fn is_recent_framing(&self) -> bool {
        self.sort == SortOrder::Recent && self.offset == 0
    }
}

/// A rendered listing, plain and with bold terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub plain: String,
    pub rich: String,
    pub terms: Vec<String>,
}

/// Fetch the definitions a listing should show
pub async fn fetch_listing<S: TermStore>(
    store: &S,
    params: &ListingParams,
) -> Result<Vec<Definition>> {
    let order = match params.sort {
        SortOrder::Recent => DefinitionOrder::Newest,
        SortOrder::Random => DefinitionOrder::Random,
        SortOrder::Alpha => DefinitionOrder::TermAsc,
    };
    let page = Page {
        limit: i64::from(params.count),
        offset: i64::from(params.offset),
    };

    if params.count == 0 {
        // Everything, and the offset doesn't apply
        return store.list_definitions(order, None).await;
    }

    if params.sort == SortOrder::Random && params.offset > 0 {
        // Shuffle within the requested page of recent terms only
        let mut definitions = store
            .list_definitions(DefinitionOrder::Newest, Some(page))
            .await?;
        definitions.shuffle(&mut rand::thread_rng());
        return Ok(definitions);
    }

    store.list_definitions(order, Some(page)).await
}

/// Render fetched definitions
pub fn render_listing(definitions: &[Definition], params: &ListingParams) -> Listing {
    if definitions.is_empty() {
        return Listing {
            plain: NO_DEFINITIONS_TEXT.to_string(),
            rich: NO_DEFINITIONS_TEXT.to_string(),
            terms: Vec::new(),
        };
    }

    let plural = definitions.len() > 1;
    let wording = match (params.is_recent_framing(), plural) {
        (true, false) => RECENT_SINGULAR,
        (true, true) => RECENT_PLURAL,
        (false, false) => KNOWN_SINGULAR,
        (false, true) => KNOWN_PLURAL,
    };

    let terms: Vec<String> = definitions.iter().map(|d| d.term.clone()).collect();
    let plain = format!("{}: {}", wording, terms.join(", "));
    let rich = format!(
        "{}: {}",
        wording,
        terms
            .iter()
            .map(|term| make_bold(term))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Listing { plain, rich, terms }
}

/// Parse, fetch and render in one go
pub async fn build_listing<S: TermStore>(store: &S, raw_params: &str) -> Result<Listing> {
    let params = ListingParams::parse(raw_params);
    debug!(?params, "building listing");

    let definitions = fetch_listing(store, &params).await?;
    Ok(render_listing(&definitions, &params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewDefinition};
    use std::collections::BTreeSet;

    async fn seeded(terms: &[&str]) -> Database {
        let db = Database::new_test().await.unwrap();
        for term in terms {
            db.insert_definition(NewDefinition {
                term: term.to_string(),
                definition: format!("the {} thing", term),
                author_name: "testuser".to_string(),
            })
            .await
            .unwrap();
        }
        db
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(ListingParams::parse(""), ListingParams::default());
        assert_eq!(ListingParams::parse("banana"), ListingParams::default());
    }

    #[test]
    fn test_parse_tokens_any_order() {
        let params = ListingParams::parse("5 alpha 10");
        assert_eq!(params.count, 5);
        assert_eq!(params.offset, 10);
        assert_eq!(params.sort, SortOrder::Alpha);

        let params = ListingParams::parse("random 3");
        assert_eq!(params.count, 3);
        assert_eq!(params.sort, SortOrder::Random);

        let params = ListingParams::parse("alphabetical -2 x 7");
        assert_eq!(params.count, 7);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_parse_all_overrides_count() {
        let params = ListingParams::parse("5 all");
        assert_eq!(params.count, 0);

        // "all" claimed the count slot, so 5 is the offset
        let params = ListingParams::parse("all 5");
        assert_eq!(params.count, 0);
        assert_eq!(params.offset, 5);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let db = seeded(&[]).await;
        let listing = build_listing(&db, "").await.unwrap();
        assert_eq!(listing.plain, NO_DEFINITIONS_TEXT);
        assert_eq!(listing.rich, NO_DEFINITIONS_TEXT);
    }

    #[tokio::test]
    async fn test_recent_listing() {
        let db = seeded(&["one", "two", "three"]).await;
        let listing = build_listing(&db, "2").await.unwrap();
        assert_eq!(listing.plain, "I recently learned definitions for: three, two");
        assert_eq!(listing.rich, "I recently learned definitions for: *three*, *two*");
    }

    #[tokio::test]
    async fn test_singular_wording() {
        let db = seeded(&["one"]).await;
        let listing = build_listing(&db, "").await.unwrap();
        assert_eq!(listing.plain, "I recently learned the definition for: one");

        let listing = build_listing(&db, "alpha").await.unwrap();
        assert_eq!(listing.plain, "I know the definition for: one");
    }

    #[tokio::test]
    async fn test_alpha_with_offset() {
        let db = seeded(&["delta", "alpha", "charlie", "bravo"]).await;
        let listing = build_listing(&db, "alpha 2 1").await.unwrap();
        assert_eq!(listing.rich, "I know definitions for: *bravo*, *charlie*");
    }

    #[tokio::test]
    async fn test_offset_switches_framing() {
        let db = seeded(&["one", "two", "three"]).await;
        let listing = build_listing(&db, "1 1").await.unwrap();
        assert_eq!(listing.plain, "I know the definition for: two");
    }

    #[tokio::test]
    async fn test_all_ignores_offset() {
        let terms = ["a", "b", "c", "d", "e"];
        let db = seeded(&terms).await;
        let listing = build_listing(&db, "all 3").await.unwrap();
        assert_eq!(listing.terms.len(), terms.len());

        let listing = build_listing(&db, "2 3 all").await.unwrap();
        assert_eq!(listing.terms.len(), terms.len());
    }

    #[tokio::test]
    async fn test_random_with_offset_shuffles_page_only() {
        let terms: Vec<String> = (0..20).map(|i| format!("term{:02}", i)).collect();
        let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
        let db = seeded(&refs).await;

        let page = fetch_listing(&db, &ListingParams::parse("10 5"))
            .await
            .unwrap();
        let expected: BTreeSet<String> = page.into_iter().map(|d| d.term).collect();

        let mut orders = Vec::new();
        for _ in 0..3 {
            let listing = build_listing(&db, "random 10 5").await.unwrap();
            let set: BTreeSet<String> = listing.terms.iter().cloned().collect();
            assert_eq!(set, expected);
            orders.push(listing.terms);
        }

        // Three identical shuffles of ten items would be astonishing
        assert!(orders[0] != orders[1] || orders[1] != orders[2]);
    }
}
