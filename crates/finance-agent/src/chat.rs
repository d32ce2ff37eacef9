//! AI assistant conversation types and transcript rendering

use serde::Deserialize;

/// Shown when a session has no stored messages yet
pub const GREETING: &str = "Hello! I'm your Finance Agent AI assistant. Upload some documents and I can help you analyze them, extract data, answer questions, and automate your workflows. What would you like to do?";

/// Used when the ask function returns no reply text
const FALLBACK_REPLY: &str = "I received your message.";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSession {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Assistant reply: either a message object or bare text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssistantReply {
    Message {
        #[serde(default)]
        content: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub assistant_message: Option<AssistantReply>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl AskResponse {
    pub fn reply_text(&self) -> &str {
        match &self.assistant_message {
            Some(AssistantReply::Message {
                content: Some(content),
                ..
            }) if !content.is_empty() => content,
            Some(AssistantReply::Text(text)) if !text.is_empty() => text,
            _ => FALLBACK_REPLY,
        }
    }
}

fn speaker(role: &str) -> &str {
    match role {
        "user" => "You",
        "assistant" => "Assistant",
        other => other,
    }
}

/// Transcript text, oldest message first
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return format!("Assistant: {}", GREETING);
    }

    messages
        .iter()
        .map(|m| {
            let stamp = m
                .created_at
                .as_deref()
                .map(|t| format!("[{}] ", t.chars().take(16).collect::<String>().replace('T', " ")))
                .unwrap_or_default();
            format!("{}{}: {}", stamp, speaker(&m.role), m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_from_message_object() {
        let response: AskResponse = serde_json::from_str(
            r#"{"assistant_message": {"id": "m2", "content": "Rent is your largest expense."},
                "session_id": "s1"}"#,
        )
        .unwrap();
        assert_eq!(response.reply_text(), "Rent is your largest expense.");
        assert_eq!(response.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_reply_from_bare_text() {
        let response: AskResponse =
            serde_json::from_str(r#"{"assistant_message": "Done."}"#).unwrap();
        assert_eq!(response.reply_text(), "Done.");
    }

    #[test]
    fn test_reply_fallback() {
        let response: AskResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.reply_text(), FALLBACK_REPLY);
    }

    #[test]
    fn test_transcript() {
        let messages = vec![
            ChatMessage {
                role: "user".to_string(),
                content: "Total spend?".to_string(),
                created_at: Some("2024-05-01T09:30:12.000Z".to_string()),
            },
            ChatMessage {
                role: "assistant".to_string(),
                content: "$1,200".to_string(),
                created_at: None,
            },
        ];
        assert_eq!(
            render_transcript(&messages),
            "[2024-05-01 09:30] You: Total spend?\n\nAssistant: $1,200"
        );
    }

    #[test]
    fn test_empty_transcript_greets() {
        assert!(render_transcript(&[]).starts_with("Assistant: Hello!"));
    }
}
