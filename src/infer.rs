//! Author/title inference through a local Ollama server.
//!
//! The model is asked for two labeled lines. Its answer is parsed leniently: labels match
//! case-insensitively, markdown decoration around them is ignored, and a JSON object with
//! `author`/`title` keys is accepted when no labeled line is present. Anything that cannot be
//! read is treated as absent rather than guessed.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::RenamerConfig;
use crate::contract::{InferenceResult, MetadataInferrer};
use crate::error::InferenceError;

const PROMPT: &str = "Identify the author and the title of the document excerpt below. \
Answer with exactly two lines and nothing else:\n\
Author: <author name>\n\
Title: <document title>\n\
If you cannot determine a field, write \"unknown\" as its value.\n\nDocument excerpt:\n";

static LABELED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t>*_#`-]*(authors?|title)[ \t*_`]*(?::|=|[ \t]+-)[ \t*_`]*(.*?)[ \t*_`]*$",
    )
        .expect("valid labeled-line regex")
});

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON-object regex"));

/// Values the model uses to say "I don't know".
const PLACEHOLDERS: &[&str] = &["unknown", "null", "none", "n/a", "na", "not available", "-"];

/// Words kept lowercase inside a title-cased value.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "if", "in", "of", "on", "or", "the", "to",
    "with",
];

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct OllamaInferrer {
    client: reqwest::Client,
    host: String,
    model: String,
    prompt_chars: usize,
}

impl OllamaInferrer {
    pub fn new(config: &RenamerConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        info!(host = %config.host, model = %config.model, "Initialized Ollama client");
        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            prompt_chars: config.prompt_chars,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

#[async_trait]
impl MetadataInferrer for OllamaInferrer {
    async fn infer(&self, text: &str) -> Result<InferenceResult, InferenceError> {
        if text.trim().is_empty() {
            debug!("No document text, skipping inference call");
            return Ok(InferenceResult::default());
        }

        let prompt = build_prompt(text, self.prompt_chars);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            stream: false,
        };

        debug!(url = %self.chat_url(), prompt_chars = prompt.len(), "Sending inference request");
        let response = self.client.post(self.chat_url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Inference endpoint returned an error");
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        debug!(answer = %chat.message.content, "Received model answer");

        Ok(parse_response(&chat.message.content))
    }
}

/// The fixed instruction followed by at most `max_chars` characters of document text.
pub fn build_prompt(text: &str, max_chars: usize) -> String {
    let excerpt = match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    };
    format!("{PROMPT}{excerpt}")
}

/// Reads author and title out of a free-form model answer.
///
/// Labeled lines win; the first occurrence of each label is used. When neither label is
/// present, a JSON object in the answer is tried instead.
pub fn parse_response(answer: &str) -> InferenceResult {
    let mut author = None;
    let mut title = None;
    let mut saw_label = false;

    for caps in LABELED_LINE.captures_iter(answer) {
        saw_label = true;
        let value = clean_value(&caps[2]);
        let label = caps[1].to_lowercase();
        if label.starts_with("author") {
            if author.is_none() {
                author = Some(value);
            }
        } else if title.is_none() {
            title = Some(value);
        }
    }

    if !saw_label {
        return parse_json_fallback(answer);
    }

    InferenceResult {
        author: author.flatten(),
        title: title.flatten(),
    }
}

fn parse_json_fallback(answer: &str) -> InferenceResult {
    let Some(found) = JSON_OBJECT.find(answer) else {
        return InferenceResult::default();
    };
    let value: serde_json::Value = match serde_json::from_str(found.as_str()) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Model answer contained an unparseable JSON object");
            return InferenceResult::default();
        }
    };
    let field = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .and_then(clean_value)
    };
    InferenceResult {
        author: field("author"),
        title: field("title"),
    }
}

fn clean_value(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_end_matches(['.', ','])
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '`')
        .trim();
    if trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }
    Some(title_case(trimmed))
}

/// Title-cases `s`, keeping small words lowercase except at the start and leaving acronyms
/// (all-uppercase words of two or more letters) untouched.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
            let is_acronym = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
            if is_acronym {
                return word.to_string();
            }
            let lower = word.to_lowercase();
            if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_labeled_lines() {
        let result = parse_response("Author: Jane Smith\nTitle: Annual Report");
        assert_eq!(result.author.as_deref(), Some("Jane Smith"));
        assert_eq!(result.title.as_deref(), Some("Annual Report"));
    }

    #[test]
    fn labels_match_case_insensitively_and_ignore_markdown() {
        let answer = "Sure! Here you go:\n\n**AUTHOR:** ada lovelace\n- title: notes on the analytical engine\n";
        let result = parse_response(answer);
        assert_eq!(result.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(result.title.as_deref(), Some("Notes on the Analytical Engine"));
    }

    #[test]
    fn plural_author_label_is_accepted() {
        let answer = "Authors: ada lovelace, charles babbage\nTitle: Sketch of the Engine";
        let result = parse_response(answer);
        assert_eq!(result.author.as_deref(), Some("Ada Lovelace, Charles Babbage"));
        assert_eq!(result.title.as_deref(), Some("Sketch of the Engine"));
    }

    #[test]
    fn hyphenated_words_are_not_labels() {
        let result = parse_response("Title-page notes\nAuthor: Jane Smith");
        assert_eq!(result.title, None);
        assert_eq!(result.author.as_deref(), Some("Jane Smith"));

        let result = parse_response("Title - annual report");
        assert_eq!(result.title.as_deref(), Some("Annual Report"));
    }

    #[test]
    fn missing_or_placeholder_fields_are_absent() {
        let result = parse_response("Author: unknown\nTitle:   ");
        assert!(result.is_empty());

        let result = parse_response("Title: Quarterly Numbers");
        assert_eq!(result.author, None);
        assert_eq!(result.title.as_deref(), Some("Quarterly Numbers"));
    }

    #[test]
    fn falls_back_to_json_object() {
        let answer = "```json\n{\"title\": \"deep learning\", \"author\": null}\n```";
        let result = parse_response(answer);
        assert_eq!(result.author, None);
        assert_eq!(result.title.as_deref(), Some("Deep Learning"));
    }

    #[test]
    fn unparseable_answer_yields_nothing() {
        assert!(parse_response("I am not sure what this document is.").is_empty());
        assert!(parse_response("{not json}").is_empty());
    }

    #[test]
    fn title_case_keeps_small_words_and_acronyms() {
        assert_eq!(title_case("the state of the NASA budget"), "The State of the NASA Budget");
        assert_eq!(title_case("JANE smith"), "JANE Smith");
    }

    #[test]
    fn prompt_truncates_on_char_boundary() {
        let text = "é".repeat(10);
        let prompt = build_prompt(&text, 4);
        assert!(prompt.ends_with("éééé"));
        assert!(!prompt.ends_with("ééééé"));
        assert!(prompt.starts_with("Identify the author"));
    }
}
