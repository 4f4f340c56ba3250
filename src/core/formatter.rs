/// Response formatting
///
/// Bold markup for chat text, and image detection so a definition that is
/// (or contains) a picture link gets rendered with the picture attached.

use crate::core::responder::{Reply, RichMessage};
use crate::db::Definition;
use crate::error::Result;
use regex::Regex;
use std::net::Ipv4Addr;

// Scheme optional; a public IPv4 address or a dotted host name with a
// letters-only TLD; optional port and path.
const URL_PATTERN: &str = r"(?i)^(?:https?://)?(?:(?P<ip>\d{1,3}(?:\.\d{1,3}){3})|(?:(?:[a-z\x{a1}-\x{d7ff}\x{e000}-\x{ffff}0-9]-*)*[a-z\x{a1}-\x{d7ff}\x{e000}-\x{ffff}0-9]+)(?:\.(?:[a-z\x{a1}-\x{d7ff}\x{e000}-\x{ffff}0-9]-*)*[a-z\x{a1}-\x{d7ff}\x{e000}-\x{ffff}0-9]+)*\.[a-z\x{a1}-\x{d7ff}\x{e000}-\x{ffff}]{2,})(?::\d{2,5})?(?:/\S*)?$";

const IMAGE_EXTENSIONS: &[&str] = &[".gif", ".jpg", ".jpeg", ".png", ".bmp"];

/// Wrap every non-blank line in `*...*`, leaving blank lines alone
pub fn make_bold(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                line.to_string()
            } else {
                format!("*{}*", trimmed)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bold each term and join them into a comma list
pub fn bold_list(terms: &[String]) -> String {
    terms
        .iter()
        .map(|term| make_bold(term))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct Formatter {
    url_pattern: Regex,
}

impl Formatter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            url_pattern: Regex::new(URL_PATTERN)?,
        })
    }

    /// Does this token look like a URL we'd accept?
    pub fn is_url(&self, token: &str) -> bool {
        let Some(captures) = self.url_pattern.captures(token) else {
            return false;
        };

        // Bare addresses have to be public ones
        match captures.name("ip") {
            Some(ip) => ip
                .as_str()
                .parse::<Ipv4Addr>()
                .map(|addr| is_public(&addr))
                .unwrap_or(false),
            None => true,
        }
    }

    /// First image link in the text, if any
    ///
    /// The link needs an explicit http(s) scheme and an image extension at
    /// the end, or chat clients won't render it inline.
    pub fn image_url(&self, text: &str) -> Option<String> {
        if !text.contains("http") {
            return None;
        }

        text.split_whitespace()
            .find(|chunk| {
                chunk.starts_with("http") && has_image_extension(chunk) && self.is_url(chunk)
            })
            .map(String::from)
    }

    /// `*term*: definition`, with the image attached when there is one
    pub fn definition_reply(&self, entry: &Definition) -> Reply {
        let text = format!("{}: {}", make_bold(&entry.term), entry.definition);

        match self.image_url(&entry.definition) {
            Some(url) => Reply::Rich(RichMessage::with_image(text, url)),
            None => Reply::Text(text),
        }
    }
}

fn has_image_extension(token: &str) -> bool {
    let lowered = token.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

fn is_public(addr: &Ipv4Addr) -> bool {
    let first = addr.octets()[0];
    !(addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_broadcast()
        || addr.is_unspecified()
        || addr.is_multicast()
        || first == 0
        || first > 223)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::responder::Block;
    use chrono::Utc;

    fn entry(term: &str, definition: &str) -> Definition {
        Definition {
            id: 1,
            term: term.to_string(),
            definition: definition.to_string(),
            author_name: "testuser".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_make_bold() {
        assert_eq!(make_bold("EW"), "*EW*");
        assert_eq!(make_bold("  padded  "), "*padded*");
        assert_eq!(make_bold("one\n\ntwo\n"), "*one*\n\n*two*\n");
        assert_eq!(make_bold(""), "");
    }

    #[test]
    fn test_bold_list() {
        let terms = vec!["ACYF".to_string(), "TAY".to_string()];
        assert_eq!(bold_list(&terms), "*ACYF*, *TAY*");
    }

    #[test]
    fn test_url_grammar() {
        let formatter = Formatter::new().unwrap();
        assert!(formatter.is_url("http://example.com/cat.gif"));
        assert!(formatter.is_url("https://cdn.example.co.uk:8080/a/b.png"));
        assert!(formatter.is_url("example.com"));
        assert!(formatter.is_url("http://8.8.8.8/x.jpg"));
        assert!(!formatter.is_url("http://192.168.1.10/x.jpg"));
        assert!(!formatter.is_url("http://127.0.0.1/x.jpg"));
        assert!(!formatter.is_url("http://localhost/x.jpg"));
        assert!(!formatter.is_url("not a url"));
    }

    #[test]
    fn test_image_url() {
        let formatter = Formatter::new().unwrap();
        assert_eq!(
            formatter.image_url("a cat http://example.com/cat.gif looking smug"),
            Some("http://example.com/cat.gif".to_string())
        );
        assert_eq!(formatter.image_url("http://example.com/page.html"), None);
        assert_eq!(formatter.image_url("example.com/cat.gif"), None);
        assert_eq!(formatter.image_url("just words"), None);
    }

    #[test]
    fn test_definition_reply_plain() {
        let formatter = Formatter::new().unwrap();
        let reply = formatter.definition_reply(&entry("EW", "Eligibility Worker"));
        assert_eq!(reply, Reply::Text("*EW*: Eligibility Worker".to_string()));
    }

    #[test]
    fn test_definition_reply_with_image() {
        let formatter = Formatter::new().unwrap();
        let reply = formatter.definition_reply(&entry("cat", "https://example.com/cat.JPG"));

        let Reply::Rich(message) = reply else {
            panic!("Expected a rich reply");
        };
        assert_eq!(message.text, "*cat*: https://example.com/cat.JPG");
        assert_eq!(
            message.blocks[1],
            Block::Image {
                image_url: "https://example.com/cat.JPG".to_string(),
                alt_text: "*cat*: https://example.com/cat.JPG".to_string(),
            }
        );
    }
}
