/// Request dispatcher
///
/// Takes one request from start to finish: normalize, classify, run the
/// operation against the store, render the reply. Every operation returns a
/// tagged outcome first and only then gets turned into text, so "not found"
/// and "reserved term" are ordinary values, not errors.

use crate::config::Config;
use crate::core::alias::resolve_alias;
use crate::core::classifier::{is_reserved_term, Classifier, Intent};
use crate::core::formatter::{bold_list, make_bold, Formatter};
use crate::core::listing::build_listing;
use crate::core::matcher::find_matches;
use crate::core::normalizer::normalize;
use crate::core::responder::{Reply, Responder, Response, Visibility};
use crate::db::{Definition, InteractionAction, NewDefinition, NewInteraction, TermStore};
use crate::error::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub text: String,
    pub user_name: String,
    /// How the user invoked us, e.g. "/gloss"
    pub command_prefix: String,
}

impl Request {
    pub fn new(
        text: impl Into<String>,
        user_name: impl Into<String>,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            user_name: user_name.into(),
            command_prefix: command_prefix.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The entry to show, after following any alias
    Found(Definition),
    NotFound { suggestions: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    Created(Definition),
    Overwritten {
        current: Definition,
        previous: Definition,
    },
    /// Same term, same casing, same value; nothing written
    Unchanged(Definition),
    Malformed,
    Reserved { term: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// `term` is what the user typed, `entry` the row that was removed
    Deleted { term: String, entry: Definition },
    Missing { term: String },
    /// The store refused; reported softly instead of failing the request
    Failed { term: String, reason: String },
}

/// Usage counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub definitions: i64,
    pub authors: i64,
    pub interactions: i64,
}

/// Routes requests to glossary operations
pub struct Dispatcher<S> {
    store: Arc<S>,
    classifier: Classifier,
    formatter: Formatter,
    bot_name: String,
}

impl<S: TermStore> Dispatcher<S> {
    pub fn new(store: Arc<S>, bot_name: impl Into<String>, broadcast: bool) -> Result<Self> {
        Ok(Self {
            store,
            classifier: Classifier::new(broadcast)?,
            formatter: Formatter::new()?,
            bot_name: bot_name.into(),
        })
    }

    pub fn from_config(store: Arc<S>, config: &Config) -> Result<Self> {
        Self::new(store, config.bot_name.clone(), config.broadcast)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle a request and return the reply
    pub async fn handle(&self, request: &Request) -> Result<Response> {
        let text = normalize(&request.text);
        let command = self.classifier.classify(&text);
        let prefix = request.command_prefix.as_str();

        let reply = match command.intent {
            Intent::Get { term } => {
                let outcome = self.lookup(&term, &request.user_name).await?;
                self.render_lookup(&term, prefix, outcome)
            }
            Intent::Set { term, value } => {
                let outcome = self
                    .set_definition(&term, &value, &request.user_name)
                    .await?;
                Reply::Text(self.render_set(prefix, outcome))
            }
            Intent::MalformedSet => Reply::Text(self.render_set(prefix, SetOutcome::Malformed)),
            Intent::Delete { term } => {
                let outcome = self.delete_definition(&term).await?;
                Reply::Text(self.render_delete(outcome))
            }
            Intent::Search { query } => {
                let matches = self.search(&query).await?;
                Reply::Text(self.render_search(&query, &matches))
            }
            Intent::Help => Reply::Text(help_text(prefix)),
            Intent::Stats => Reply::Text(render_stats(&self.stats().await?)),
            Intent::Recent { params } => {
                Reply::Text(build_listing(self.store.as_ref(), &params).await?.rich)
            }
        };

        let visibility = if command.private {
            Visibility::Private
        } else {
            Visibility::Channel
        };

        Ok(Response { reply, visibility })
    }

    /// Handle a request and hand the reply to the responder
    ///
    /// Exactly one reply goes out either way. If handling fails the user
    /// gets the error text and the error is still returned to the caller.
    pub async fn handle_and_respond<R: Responder>(
        &self,
        request: &Request,
        responder: &mut R,
    ) -> Result<()> {
        match self.handle(request).await {
            Ok(response) => responder.respond(&response),
            Err(e) => {
                error!(text = %request.text, user = %request.user_name, "request failed: {}", e);
                let apology = Response {
                    reply: Reply::Text(format!(
                        "Sorry, but *{}* ran into a problem: {}",
                        self.bot_name, e
                    )),
                    visibility: Visibility::Private,
                };
                // The handling error matters more than a failed apology
                let _ = responder.respond(&apology);
                Err(e)
            }
        }
    }

    /// Look a term up, log the attempt, and follow an alias if there is one
    pub async fn lookup(&self, term: &str, user_name: &str) -> Result<LookupOutcome> {
        let Some(entry) = self.store.find_by_term(term).await? else {
            self.log_lookup(term, user_name, InteractionAction::NotFound)
                .await;
            let suggestions = find_matches(self.store.as_ref(), term).await?;
            return Ok(LookupOutcome::NotFound { suggestions });
        };

        self.log_lookup(term, user_name, InteractionAction::Found)
            .await;
        let entry = resolve_alias(self.store.as_ref(), entry).await?;
        Ok(LookupOutcome::Found(entry))
    }

    /// Create or overwrite a definition
    pub async fn set_definition(
        &self,
        term: &str,
        value: &str,
        user_name: &str,
    ) -> Result<SetOutcome> {
        let (term, value) = (term.trim(), value.trim());
        if term.is_empty() || value.is_empty() {
            return Ok(SetOutcome::Malformed);
        }

        if is_reserved_term(term) {
            return Ok(SetOutcome::Reserved {
                term: term.to_string(),
            });
        }

        if let Some(existing) = self.store.find_by_term(term).await? {
            if existing.term == term && existing.definition == value {
                return Ok(SetOutcome::Unchanged(existing));
            }

            let current = Definition {
                term: term.to_string(),
                definition: value.to_string(),
                author_name: user_name.to_string(),
                created_at: Utc::now(),
                ..existing.clone()
            };
            self.store.update_definition(&current).await?;
            info!(term, user = user_name, "overwrote definition");

            return Ok(SetOutcome::Overwritten {
                current,
                previous: existing,
            });
        }

        let created = self
            .store
            .insert_definition(NewDefinition {
                term: term.to_string(),
                definition: value.to_string(),
                author_name: user_name.to_string(),
            })
            .await?;
        info!(term, user = user_name, "created definition");

        Ok(SetOutcome::Created(created))
    }

    /// Remove a definition
    ///
    /// Unlike a lookup, this never writes to the interaction log.
    pub async fn delete_definition(&self, term: &str) -> Result<DeleteOutcome> {
        let Some(entry) = self.store.find_by_term(term).await? else {
            return Ok(DeleteOutcome::Missing {
                term: term.to_string(),
            });
        };

        match self.store.delete_definition(&entry).await {
            Ok(()) => {
                info!(term = %entry.term, "deleted definition");
                Ok(DeleteOutcome::Deleted {
                    term: term.to_string(),
                    entry,
                })
            }
            Err(e) => {
                warn!(term, "could not delete definition: {}", e);
                Ok(DeleteOutcome::Failed {
                    term: term.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        find_matches(self.store.as_ref(), query).await
    }

    pub async fn stats(&self) -> Result<Stats> {
        Ok(Stats {
            definitions: self.store.count_definitions().await?,
            authors: self.store.count_distinct_authors().await?,
            interactions: self.store.count_interactions().await?,
        })
    }

    /// Record a lookup. Failing to log must never fail the lookup itself.
    async fn log_lookup(&self, term: &str, user_name: &str, action: InteractionAction) {
        let interaction = NewInteraction {
            term: term.to_string(),
            author_name: user_name.to_string(),
            action,
        };

        if let Err(e) = self.store.append_interaction(interaction).await {
            warn!(term, %action, "dropped interaction log entry: {}", e);
        }
    }

    fn render_lookup(&self, term: &str, prefix: &str, outcome: LookupOutcome) -> Reply {
        match outcome {
            LookupOutcome::Found(entry) => self.formatter.definition_reply(&entry),
            LookupOutcome::NotFound { suggestions } => {
                let mut message = format!(
                    "Sorry, there is no definition for *{}*. You can set a definition with the command *{} {} = _definition_*",
                    term, prefix, term
                );
                if !suggestions.is_empty() {
                    message.push_str(&format!(
                        ", or try asking for one of these terms that may be related: {}",
                        bold_list(&suggestions)
                    ));
                }
                Reply::Text(message)
            }
        }
    }

    fn render_set(&self, prefix: &str, outcome: SetOutcome) -> String {
        match outcome {
            SetOutcome::Created(entry) => format!(
                "Definition for {} is now set to {}",
                make_bold(&entry.term),
                make_bold(&entry.definition)
            ),
            SetOutcome::Overwritten { current, previous } => format!(
                "The definition for {} is now set to {}, overwriting the previous entry, which was {} defined as {}",
                make_bold(&current.term),
                make_bold(&current.definition),
                make_bold(&previous.term),
                make_bold(&previous.definition)
            ),
            SetOutcome::Unchanged(entry) => format!(
                "The definition for {} was already set to {}",
                make_bold(&entry.term),
                make_bold(&entry.definition)
            ),
            SetOutcome::Malformed => format!(
                "Sorry, but *{}* didn't understand your command. You can set definitions like this: *{} EW = Eligibility Worker*",
                self.bot_name, prefix
            ),
            SetOutcome::Reserved { term } => format!(
                "Sorry, but *{}* can't set a definition for {} because it's a reserved term.",
                self.bot_name,
                make_bold(&term)
            ),
        }
    }

    fn render_delete(&self, outcome: DeleteOutcome) -> String {
        match outcome {
            DeleteOutcome::Deleted { term, entry } => format!(
                "*{}* has deleted the definition for {}, which was {}",
                self.bot_name,
                make_bold(&term),
                make_bold(&entry.definition)
            ),
            DeleteOutcome::Missing { term } => format!(
                "Sorry, but *{}* has no definition for {}",
                self.bot_name,
                make_bold(&term)
            ),
            DeleteOutcome::Failed { reason, .. } => format!(
                "Sorry, but *{}* was unable to delete that definition: {}",
                self.bot_name, reason
            ),
        }
    }

    fn render_search(&self, query: &str, matches: &[String]) -> String {
        if matches.is_empty() {
            format!(
                "{} could not find {} in any terms or definitions.",
                self.bot_name,
                make_bold(query)
            )
        } else {
            format!(
                "{} found {} in: {}",
                self.bot_name,
                make_bold(query),
                bold_list(matches)
            )
        }
    }
}

/// Three lines, one per count, each with its own "nothing yet" wording
pub fn render_stats(stats: &Stats) -> String {
    let lines = [
        (
            "I have definitions for",
            stats.definitions,
            "term",
            "terms",
            "I don't have any definitions",
        ),
        (
            "",
            stats.authors,
            "person has defined terms",
            "people have defined terms",
            "Nobody has defined terms",
        ),
        (
            "I've been asked for definitions",
            stats.interactions,
            "time",
            "times",
            "Nobody has asked me for definitions",
        ),
    ];

    lines
        .iter()
        .map(|(prefix, count, singular, plural, empty)| {
            if *count == 0 {
                return empty.to_string();
            }
            let noun = if *count == 1 { singular } else { plural };
            if prefix.is_empty() {
                format!("{} {}", count, noun)
            } else {
                format!("{} {} {}", prefix, count, noun)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Command reference
pub fn help_text(prefix: &str) -> String {
    [
        format!("*{} _term_* to show the definition for a term", prefix),
        format!("*{} _term_ = _definition_* to set the definition for a term", prefix),
        format!("*{} _alias_ = see _term_* to set an alias for a term", prefix),
        format!("*{} delete _term_* to delete the definition for a term", prefix),
        format!("*{} stats* to show usage statistics", prefix),
        format!("*{} recent* to show recently defined terms", prefix),
        format!("*{} search _term_* to search terms and definitions", prefix),
        format!("*{} help* to see this message", prefix),
    ]
    .join("\n")
}
