/// Fuzzy string similarity on a 0-100 scale
///
/// A weighted ratio in the usual "fuzzy search" style: compare the two
/// strings whole, by best-matching window, and by sorted/shared tokens, and
/// keep the best score. Window and token scores are scaled down a bit so an
/// exact whole-string match always wins over a partial one.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const LONG_PARTIAL_SCALE: f64 = 0.60;

/// Lower-case, turn anything that isn't a word character into a space, trim
pub fn full_process(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c.to_lowercase().collect::<String>()
            } else {
                " ".to_string()
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Score `choice` against `query`, 0 (nothing alike) to 100 (identical)
pub fn weighted_ratio(query: &str, choice: &str) -> u8 {
    let p1 = full_process(query);
    let p2 = full_process(choice);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let len1 = p1.chars().count() as f64;
    let len2 = p2.chars().count() as f64;
    let len_ratio = len1.max(len2) / len1.min(len2);

    let base = ratio(&p1, &p2);

    let best = if len_ratio < 1.5 {
        let token_sort = ratio(&sorted_tokens(&p1), &sorted_tokens(&p2)) * UNBASE_SCALE;
        let token_set = token_set_ratio(&p1, &p2) * UNBASE_SCALE;
        base.max(token_sort).max(token_set)
    } else {
        let scale = if len_ratio >= 8.0 {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = partial_ratio(&p1, &p2) * scale;
        let partial_token_sort =
            partial_ratio(&sorted_tokens(&p1), &sorted_tokens(&p2)) * UNBASE_SCALE * scale;
        let partial_token_set = partial_token_set_ratio(&p1, &p2) * UNBASE_SCALE * scale;
        base.max(partial).max(partial_token_sort).max(partial_token_set)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// Whole-string similarity: twice the longest common subsequence over the
/// combined length
fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_ratio(&a, &b)
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Best similarity of the shorter string against any alignment with the
/// longer one, including windows hanging off either end
fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return 0.0;
    }

    let width = shorter.len();
    let mut best: f64 = 0.0;

    for edge in 1..width {
        best = best
            .max(indel_ratio(&shorter, &longer[..edge]))
            .max(indel_ratio(&shorter, &longer[longer.len() - edge..]));
    }

    for window in longer.windows(width) {
        best = best.max(indel_ratio(&shorter, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn tokens(text: &str) -> BTreeSet<&str> {
    text.split_whitespace().collect()
}

fn sorted_tokens(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

fn join(words: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    words
        .into_iter()
        .map(|w| w.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokens(a), tokens(b));
    let intersection = join(ta.intersection(&tb));
    let diff_ab = join(ta.difference(&tb));
    let diff_ba = join(tb.difference(&ta));

    // One side's words are all in the other
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let combined_ab = format!("{} {}", intersection, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", intersection, diff_ba).trim().to_string();

    ratio(&intersection, &combined_ab)
        .max(ratio(&intersection, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokens(a), tokens(b));
    if ta.intersection(&tb).next().is_some() {
        return 100.0;
    }
    partial_ratio(&join(ta.difference(&tb)), &join(tb.difference(&ta)))
}
