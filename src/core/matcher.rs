/// Term matcher
///
/// Powers both `search <query>` and the "you may mean..." suggestions after a
/// failed lookup. Two tiers are merged: terms that literally contain the
/// query, and terms whose definitions fuzzily resemble it.
///
/// The merge order is fixed and reproducible: substring hits come first in
/// ascending term order, then fuzzy hits weakest-first.

use crate::core::similarity::weighted_ratio;
use crate::db::{Definition, DefinitionOrder, TermStore};
use crate::error::Result;
use tracing::debug;

/// Minimum fuzzy score (0-100) to count as a match
pub const MATCH_THRESHOLD: u8 = 50;

/// How many top fuzzy candidates are considered before thresholding
pub const FUZZY_CANDIDATES: usize = 20;

const METACHARACTERS: &[char] = &['|', '_', '%', '*', '+', '?', '{', '}', '(', ')', '[', ']'];

/// Remove characters that would act as wildcards in a pattern query
pub fn strip_metacharacters(query: &str) -> String {
    query.chars().filter(|c| !METACHARACTERS.contains(c)).collect()
}

/// Terms containing the key (ignoring case), in descending term order
pub fn substring_matches(key: &str, corpus: &[Definition]) -> Vec<String> {
    let key = key.to_lowercase();
    let mut matches: Vec<&str> = corpus
        .iter()
        .filter(|entry| entry.term.to_lowercase().contains(&key))
        .map(|entry| entry.term.as_str())
        .collect();

    matches.sort_by(|a, b| b.cmp(a));
    matches.into_iter().map(String::from).collect()
}

/// Terms whose definitions score at or above the threshold, weakest first
///
/// Scores every entry, keeps the strongest `FUZZY_CANDIDATES` (ties go to
/// the alphabetically earlier term), drops anything under the threshold,
/// then flips to ascending score order.
pub fn fuzzy_matches(query: &str, corpus: &[Definition]) -> Vec<String> {
    let mut entries: Vec<&Definition> = corpus.iter().collect();
    entries.sort_by(|a, b| a.term.cmp(&b.term));

    let mut scored: Vec<(u8, &str)> = entries
        .into_iter()
        .map(|entry| (weighted_ratio(query, &entry.definition), entry.term.as_str()))
        .collect();

    // Both sorts are stable, so equal scores keep ascending term order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(FUZZY_CANDIDATES);
    scored.retain(|(score, _)| *score >= MATCH_THRESHOLD);
    scored.sort_by(|a, b| a.0.cmp(&b.0));

    scored.into_iter().map(|(_, term)| term.to_string()).collect()
}

/// Merge both tiers into one ordered list of distinct terms
pub fn rank_matches(query: &str, corpus: &[Definition]) -> Vec<String> {
    let substring = substring_matches(&strip_metacharacters(query), corpus);
    let mut results = fuzzy_matches(query, corpus);

    // Each substring hit goes to the very front, so the list ends up reversed
    for term in substring {
        if !results.contains(&term) {
            results.insert(0, term);
        }
    }

    debug!(query, matches = results.len(), "ranked matches");
    results
}

/// Read the whole corpus from the store and rank it against the query
pub async fn find_matches<S: TermStore>(store: &S, query: &str) -> Result<Vec<String>> {
    let corpus = store
        .list_definitions(DefinitionOrder::TermAsc, None)
        .await?;

    Ok(rank_matches(query, &corpus))
}
