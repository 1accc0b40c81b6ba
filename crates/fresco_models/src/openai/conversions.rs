//! Type conversions between Fresco messages and the OpenAI wire format.

use crate::openai::{ChatContent, ChatMessage, ContentPart, ImageUrl};
use fresco_core::{Input, MediaSource, Message, Role};

/// Converts core messages to the OpenAI chat format, preserving order.
pub fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage> {
    messages.iter().map(to_chat_message).collect()
}

fn to_chat_message(message: &Message) -> ChatMessage {
    let role = match message.role() {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    // Text-only messages keep the plain string form the API also accepts
    let content = match message.content().as_slice() {
        [Input::Text(text)] => ChatContent::Text(text.clone()),
        parts => ChatContent::Parts(parts.iter().map(to_content_part).collect()),
    };

    ChatMessage {
        role: role.to_string(),
        content,
    }
}

fn to_content_part(input: &Input) -> ContentPart {
    match input {
        Input::Text(text) => ContentPart::Text { text: text.clone() },
        Input::Image { mime, source } => {
            let url = match source {
                MediaSource::Url(url) => url.clone(),
                MediaSource::Base64(data) => format!(
                    "data:{};base64,{}",
                    mime.as_deref().unwrap_or("image/png"),
                    data
                ),
            };
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url,
                    detail: Some("high".to_string()),
                },
            }
        }
    }
}
