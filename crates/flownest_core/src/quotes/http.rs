//! Reqwest-backed quote sources.
//!
//! These adapters own transport details only: request building, timeout,
//! status mapping and JSON decoding into [`Quote`]s.

use super::{Quote, QuoteError, QuoteSource};
use crate::config::QuoteConfig;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("flownest/", env!("CARGO_PKG_VERSION"));
const GENERATIVE_PROMPT: &str = "Give me a short inspirational quote with author";
const ATTRIBUTION_DASH: char = '\u{2014}';

/// Public random-quote endpoint answering `[{"q": .., "a": ..}]`.
pub struct ZenQuotesSource {
    client: Client,
    endpoint: String,
}

impl ZenQuotesSource {
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: &QuoteConfig) -> Result<Self, QuoteError> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: config.zen_url.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ZenQuoteDto {
    q: String,
    #[serde(default)]
    a: String,
}

impl QuoteSource for ZenQuotesSource {
    fn name(&self) -> &'static str {
        "zenquotes"
    }

    fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
        let response = self.client.get(self.endpoint.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }
        let body = response.bytes()?;
        parse_zen_body(body.as_ref())
    }
}

/// Generative-text endpoint asked for a single quote with author.
pub struct GenerativeQuoteSource {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GenerativeQuoteSource {
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: &QuoteConfig) -> Result<Self, QuoteError> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: config.generative_url.clone(),
            api_key: config.generative_api_key.clone(),
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [GenerateContent<'a>; 1],
}

#[derive(Serialize)]
struct GenerateContent<'a> {
    parts: [GeneratePart<'a>; 1],
}

#[derive(Serialize)]
struct GeneratePart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl QuoteSource for GenerativeQuoteSource {
    fn name(&self) -> &'static str {
        "generative"
    }

    fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(QuoteError::NotConfigured("generative api key"))?;
        let request = GenerateRequest {
            contents: [GenerateContent {
                parts: [GeneratePart {
                    text: GENERATIVE_PROMPT,
                }],
            }],
        };
        let response = self
            .client
            .post(self.endpoint.as_str())
            .query(&[("key", api_key)])
            .json(&request)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }
        let body = response.bytes()?;
        parse_generative_body(body.as_ref()).map(|quote| vec![quote])
    }
}

fn build_client(config: &QuoteConfig) -> Result<Client, QuoteError> {
    Ok(Client::builder()
        .timeout(config.timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

pub(crate) fn parse_zen_body(body: &[u8]) -> Result<Vec<Quote>, QuoteError> {
    let decoded: Vec<ZenQuoteDto> = serde_json::from_slice(body)
        .map_err(|err| QuoteError::Decode(format!("invalid zenquotes JSON: {err}")))?;
    let quotes: Vec<Quote> = decoded
        .into_iter()
        .filter(|dto| !dto.q.trim().is_empty())
        .map(|dto| Quote::new(dto.q.trim(), dto.a.trim()))
        .collect();
    if quotes.is_empty() {
        return Err(QuoteError::Empty);
    }
    Ok(quotes)
}

pub(crate) fn parse_generative_body(body: &[u8]) -> Result<Quote, QuoteError> {
    let decoded: GenerateResponse = serde_json::from_slice(body)
        .map_err(|err| QuoteError::Decode(format!("invalid generative JSON: {err}")))?;
    let raw = decoded
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(QuoteError::Empty);
    }
    Ok(split_attribution(&raw))
}

/// Splits the reply on its first em dash into quote and author; without one
/// the author is left empty.
pub(crate) fn split_attribution(raw: &str) -> Quote {
    let raw = raw.trim();
    match raw.split_once(ATTRIBUTION_DASH) {
        Some((text, author)) => {
            let author = author.split(ATTRIBUTION_DASH).next().unwrap_or_default();
            Quote::new(strip_quote_marks(text), author.trim())
        }
        None => Quote::new(strip_quote_marks(raw), ""),
    }
}

fn strip_quote_marks(text: &str) -> &str {
    text.trim()
        .trim_matches(|c| matches!(c, '"' | '\u{201C}' | '\u{201D}'))
        .trim()
}

#[cfg(test)]
mod tests {
    use super::{parse_generative_body, parse_zen_body, split_attribution};
    use crate::quotes::QuoteError;

    #[test]
    fn zen_body_maps_q_and_a() {
        let body = br#"[{"q":"Stay hungry.","a":"Steve Jobs","h":"<blockquote/>"}]"#;
        let quotes = parse_zen_body(body).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "Stay hungry.");
        assert_eq!(quotes[0].author, "Steve Jobs");
    }

    #[test]
    fn zen_body_rejects_garbage_and_empty_lists() {
        assert!(matches!(parse_zen_body(b"<html>"), Err(QuoteError::Decode(_))));
        assert!(matches!(parse_zen_body(b"[]"), Err(QuoteError::Empty)));
    }

    #[test]
    fn generative_body_splits_on_em_dash() {
        let body = "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"\\\"Dream big.\\\" \u{2014} Someone\\n\"}]}}]}";
        let quote = parse_generative_body(body.as_bytes()).unwrap();
        assert_eq!(quote.text, "Dream big.");
        assert_eq!(quote.author, "Someone");
    }

    #[test]
    fn generative_body_without_candidates_is_empty() {
        assert!(matches!(
            parse_generative_body(br#"{"candidates":[]}"#),
            Err(QuoteError::Empty)
        ));
    }

    #[test]
    fn attribution_without_dash_keeps_text() {
        let quote = split_attribution("Just keep going.");
        assert_eq!(quote.text, "Just keep going.");
        assert!(quote.author.is_empty());
    }
}
