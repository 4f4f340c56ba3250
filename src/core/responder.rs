/// Replies and the seam that delivers them
///
/// A reply is either plain text or a structured message with blocks (used
/// when a definition carries an image). Whatever transport sits in front of
/// gloss implements `Responder`.

use serde::{Deserialize, Serialize};
use serde_json::json;

pub const BOT_EMOJI: &str = ":lipstick:";

/// A markdown text object inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: "mrkdwn".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: TextObject },
    Image { image_url: String, alt_text: String },
}

/// Text plus layout blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichMessage {
    pub text: String,
    pub blocks: Vec<Block>,
}

impl RichMessage {
    /// A section with the text, followed by the image
    pub fn with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            blocks: vec![
                Block::Section {
                    text: TextObject::mrkdwn(text.clone()),
                },
                Block::Image {
                    image_url: image_url.into(),
                    alt_text: text.clone(),
                },
            ],
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Text(String),
    Rich(RichMessage),
}

impl Reply {
    /// The readable text, whichever shape the reply has
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Rich(message) => &message.text,
        }
    }

    /// Incoming-webhook style payload for posting the reply to a channel
    pub fn to_webhook_payload(&self, channel: &str, bot_name: &str) -> serde_json::Value {
        let mut payload = json!({
            "channel": channel,
            "text": self.text(),
            "username": bot_name,
            "icon_emoji": BOT_EMOJI,
        });
        if let Reply::Rich(message) = self {
            payload["blocks"] = json!(message.blocks);
        }
        payload
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

/// Who gets to see a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Channel,
    /// Only the person who asked
    Private,
}

/// A reply and where it should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub reply: Reply,
    pub visibility: Visibility,
}

/// Delivers replies to the user
pub trait Responder {
    fn respond(&mut self, response: &Response) -> crate::error::Result<()>;
}

/// Collects responses in memory; handy for transports that reply later
#[derive(Debug, Default)]
pub struct BufferedResponder {
    pub responses: Vec<Response>,
}

impl Responder for BufferedResponder {
    fn respond(&mut self, response: &Response) -> crate::error::Result<()> {
        self.responses.push(response.clone());
        Ok(())
    }
}
