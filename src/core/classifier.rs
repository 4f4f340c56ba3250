// Works out what the user wants from plain text.
//
// Most requests don't start with a verb at all: "EW" is a lookup and
// "EW = Eligibility Worker" is a set. Only after those two checks do we look
// at the first word for a command. The rule order below is load-bearing.

use crate::error::Result;
use regex::Regex;
use tracing::debug;

pub const STATS_CMDS: &[&str] = &["stats"];
pub const RECENT_CMDS: &[&str] = &["learnings", "recent"];
pub const HELP_CMDS: &[&str] = &["help", "?"];
pub const SET_CMDS: &[&str] = &["="];
pub const DELETE_CMDS: &[&str] = &["delete"];
pub const SEARCH_CMDS: &[&str] = &["search"];

// "shh", "sshhh", "SHH " etc. Only honoured in broadcast mode.
const SHH_PATTERN: &str = r"(?i)^s+h+ ";

/// What a request is asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Get { term: String },
    Set { term: String, value: String },
    /// Had an `=` but nothing usable on one side of it
    MalformedSet,
    Delete { term: String },
    Search { query: String },
    Help,
    Stats,
    Recent { params: String },
}

/// A classified request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub intent: Intent,
    /// Reply only to the requester instead of the whole channel
    pub private: bool,
}

/// Terms nobody is allowed to define
pub fn is_reserved_term(term: &str) -> bool {
    let lowered = term.to_lowercase();
    STATS_CMDS
        .iter()
        .chain(RECENT_CMDS)
        .chain(HELP_CMDS)
        .any(|word| *word == lowered)
}

// Words that can't be a bare single-word lookup. Note that "delete" and
// "search" are not in here, so on their own they're looked up as terms.
fn blocks_bare_lookup(word: &str) -> bool {
    let lowered = word.to_lowercase();
    STATS_CMDS
        .iter()
        .chain(RECENT_CMDS)
        .chain(HELP_CMDS)
        .chain(SET_CMDS)
        .any(|reserved| *reserved == lowered)
}

pub struct Classifier {
    broadcast: bool,
    shh: Regex,
}

impl Classifier {
    /// `broadcast` turns on the shh privacy modifier
    pub fn new(broadcast: bool) -> Result<Self> {
        Ok(Self {
            broadcast,
            shh: Regex::new(SHH_PATTERN)?,
        })
    }

    /// Classify already-normalized text
    pub fn classify(&self, text: &str) -> Command {
        let command = self.classify_inner(text, false);
        debug!(text, intent = ?command.intent, private = command.private, "classified request");
        command
    }

    fn classify_inner(&self, text: &str, private: bool) -> Command {
        let command = |intent: Intent| Command { intent, private };

        // A single word that isn't a command word is a lookup
        if !text.is_empty() && !text.contains(' ') && !blocks_bare_lookup(text) {
            return command(Intent::Get {
                term: text.to_string(),
            });
        }

        // Anything with an '=' is a set
        if let Some((term, value)) = text.split_once('=') {
            let (term, value) = (term.trim(), value.trim());
            if term.is_empty() || value.is_empty() {
                return command(Intent::MalformedSet);
            }
            return command(Intent::Set {
                term: term.to_string(),
                value: value.to_string(),
            });
        }

        if self.broadcast {
            if let Some(marker) = self.shh.find(text) {
                return self.classify_inner(&text[marker.end()..], true);
            }
        }

        let (action, params) = split_action(text);

        if DELETE_CMDS.contains(&action.as_str()) {
            return command(Intent::Delete {
                term: params.to_string(),
            });
        }

        if SEARCH_CMDS.contains(&action.as_str()) {
            return command(Intent::Search {
                query: params.to_string(),
            });
        }

        if HELP_CMDS.contains(&action.as_str()) || text.trim().is_empty() {
            return command(Intent::Help);
        }

        if STATS_CMDS.contains(&action.as_str()) {
            return command(Intent::Stats);
        }

        if RECENT_CMDS.contains(&action.as_str()) {
            return command(Intent::Recent {
                params: params.to_string(),
            });
        }

        // Not a command word, so the whole thing is a multi-word term
        command(Intent::Get {
            term: text.to_string(),
        })
    }
}

/// Split off the first word (lower-cased) from the rest
fn split_action(text: &str) -> (String, &str) {
    match text.split_once(' ') {
        Some((action, params)) => (action.to_lowercase(), params),
        None => (text.to_lowercase(), ""),
    }
}
