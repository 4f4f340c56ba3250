/// Runtime configuration
///
/// Everything comes from environment variables so the same binary works
/// from a shell, a cron job or behind a chat webhook.

use crate::error::{GlossError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_BOT_NAME: &str = "Glossary Bot";
pub const DEFAULT_COMMAND_PREFIX: &str = "/gloss";
const DEFAULT_USER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Name the bot uses for itself in replies
    pub bot_name: String,
    /// How users invoke the bot, echoed in help and error text
    pub command_prefix: String,
    /// Replies go to the whole channel unless asked for with "shh"
    pub broadcast: bool,
    /// Who CLI requests are attributed to
    pub user_name: String,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let database_path = match get("GLOSS_DATABASE_URL").or_else(|| get("DATABASE_URL")) {
            Some(url) => database_path_from_url(&url)?,
            None => default_database_path()?,
        };

        let broadcast = match get("GLOSS_BROADCAST") {
            Some(value) => parse_bool("GLOSS_BROADCAST", &value)?,
            None => false,
        };

        Ok(Self {
            database_path,
            bot_name: get("GLOSS_BOT_NAME").unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            command_prefix: get("GLOSS_COMMAND")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            broadcast,
            user_name: get("GLOSS_USER")
                .or_else(|| get("USER"))
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
        })
    }
}

/// ~/.gloss/glossary.db
fn default_database_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GlossError::Config("could not find home directory".to_string()))?;
    Ok(home.join(".gloss").join("glossary.db"))
}

/// Accepts a plain path or a sqlite: URL
fn database_path_from_url(url: &str) -> Result<PathBuf> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if path.contains("://") {
        return Err(GlossError::Config(format!(
            "only SQLite databases are supported, got '{}'",
            url
        )));
    }

    Ok(PathBuf::from(path))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GlossError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&vars(&[("GLOSS_DATABASE_URL", "/tmp/g.db")])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/g.db"));
        assert_eq!(config.bot_name, DEFAULT_BOT_NAME);
        assert_eq!(config.command_prefix, DEFAULT_COMMAND_PREFIX);
        assert!(!config.broadcast);
        assert_eq!(config.user_name, "anonymous");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(&vars(&[
            ("DATABASE_URL", "sqlite:///var/lib/gloss.db"),
            ("GLOSS_BOT_NAME", "Lexi"),
            ("GLOSS_COMMAND", "/lexi"),
            ("GLOSS_BROADCAST", "Yes"),
            ("USER", "maria"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/gloss.db"));
        assert_eq!(config.bot_name, "Lexi");
        assert_eq!(config.command_prefix, "/lexi");
        assert!(config.broadcast);
        assert_eq!(config.user_name, "maria");
    }

    #[test]
    fn test_gloss_url_wins() {
        let config = Config::from_vars(&vars(&[
            ("DATABASE_URL", "/tmp/other.db"),
            ("GLOSS_DATABASE_URL", "sqlite:/tmp/mine.db"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/mine.db"));
    }

    #[test]
    fn test_rejects_non_sqlite_url() {
        let result = Config::from_vars(&vars(&[("DATABASE_URL", "postgres://db/gloss")]));
        assert!(matches!(result, Err(GlossError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_boolean() {
        let result = Config::from_vars(&vars(&[
            ("GLOSS_DATABASE_URL", "/tmp/g.db"),
            ("GLOSS_BROADCAST", "sometimes"),
        ]));
        assert!(matches!(result, Err(GlossError::Config(_))));
    }
}
