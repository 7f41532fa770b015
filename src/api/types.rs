use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `GET /models` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

/// One entry of the model listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub pricing: Option<Pricing>,
}

impl ModelInfo {
    /// Prompt price as listed, or `N/A`
    pub fn prompt_price(&self) -> String {
        match self.pricing.as_ref().and_then(|p| p.prompt.as_ref()) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// Prices are strings in practice but numbers are accepted too
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub prompt: Option<serde_json::Value>,

    #[serde(default)]
    pub completion: Option<serde_json::Value>,
}

/// `POST /chat/completions` request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatRequest {
    /// Single user turn asking `model` to draw `prompt`
    pub fn image_prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: format!("Generate this image: {prompt}"),
            }],
        }
    }
}

/// `POST /chat/completions` response body, reduced to what image extraction needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,

    #[serde(default)]
    pub images: Vec<ContentPart>,
}

/// Message content is either plain text or a list of typed parts
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub image_url: Option<ImageUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUrl {
    #[serde(default)]
    pub url: String,
}

/// An image referenced by a generation response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// `data:image/...;base64,...`
    DataUrl(String),
    /// `http(s)://...` to download
    Remote(String),
}

impl ChatResponse {
    /// Every usable image reference, in response order: content parts of each
    /// choice first, then its `images` list.
    pub fn image_refs(&self) -> Vec<ImageRef> {
        let mut refs = Vec::new();
        for choice in &self.choices {
            let message = &choice.message;
            let parts: &[ContentPart] = match &message.content {
                Some(MessageContent::Parts(parts)) => parts.as_slice(),
                _ => &[],
            };

            for part in parts.iter().chain(message.images.iter()) {
                if part.kind != "image_url" {
                    continue;
                }
                let Some(image_url) = &part.image_url else { continue };
                let url = image_url.url.as_str();
                if url.starts_with("data:image") {
                    refs.push(ImageRef::DataUrl(url.to_string()));
                } else if url.starts_with("http") {
                    refs.push(ImageRef::Remote(url.to_string()));
                }
            }
        }
        refs
    }
}

/// Decode the base64 payload of a `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ApiError> {
    let (_, payload) = url.split_once(',').ok_or_else(|| ApiError::InvalidPayload {
        reason: "data URL has no ',' separator".to_string(),
    })?;

    STANDARD.decode(payload.trim()).map_err(|e| ApiError::InvalidPayload {
        reason: e.to_string(),
    })
}

/// Keep at most `max` characters of `text`.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_list_parsing() {
        let body = r#"{"data": [
            {"id": "google/gemini-2.5-flash-image", "name": "Gemini Flash Image",
             "pricing": {"prompt": "0.0000003", "completion": "0.0000025"}},
            {"id": "openai/gpt-4o"},
            {"id": "black-forest-labs/flux-1", "pricing": {"prompt": 0}}
        ]}"#;
        let list: ModelList = serde_json::from_str(body).unwrap();

        assert_eq!(list.data.len(), 3);
        assert_eq!(list.data[0].prompt_price(), "0.0000003");
        assert_eq!(list.data[1].prompt_price(), "N/A");
        assert_eq!(list.data[2].prompt_price(), "0");
    }

    #[test]
    fn test_image_prompt_body() {
        let request = ChatRequest::image_prompt("google/gemini-2.5-flash-image", "A trophy");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "google/gemini-2.5-flash-image");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Generate this image: A trophy");
    }

    #[test]
    fn test_image_refs_from_content_parts() {
        let body = r#"{"choices": [{"message": {"content": [
            {"type": "text", "text": "Here you go"},
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,aGVsbG8="}},
            {"type": "image_url", "image_url": {"url": "https://cdn.example.com/a.png"}},
            {"type": "image_url", "image_url": {"url": "ftp://nope"}}
        ]}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            response.image_refs(),
            vec![
                ImageRef::DataUrl("data:image/png;base64,aGVsbG8=".to_string()),
                ImageRef::Remote("https://cdn.example.com/a.png".to_string()),
            ]
        );
    }

    #[test]
    fn test_image_refs_from_images_field() {
        let body = r#"{"choices": [{"message": {"content": "Done!", "images": [
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAEC"}}
        ]}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.image_refs().len(), 1);
    }

    #[test]
    fn test_no_images() {
        let body = r#"{"choices": [{"message": {"content": null}}], "error": {"code": 400}}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(response.image_refs().is_empty());

        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.image_refs().is_empty());
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_data_url("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("héllo wörld", 7), "héllo w");
        assert_eq!(truncate("short", 70), "short");
    }
}
