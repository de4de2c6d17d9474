//! Inspirational quotes: remote sources, local fallbacks and the carousel.
//!
//! # Responsibility
//! - Fetch quotes from the public quotes endpoint or the generative-text
//!   endpoint through [`QuoteSource`].
//! - Fall back to a fixed local list on any failure; nothing is retried.
//! - Pick the daily motivation quote deterministically per calendar day.
//!
//! # Invariants
//! - A [`QuoteCarousel`] is never empty.
//! - Carousel navigation wraps around in both directions.

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod http;

pub use http::{GenerativeQuoteSource, ZenQuotesSource};

const CAROUSEL_FALLBACK: [(&str, &str); 3] = [
    (
        "Don't watch the clock, do what it does. Keep going.",
        "Sam Levenson",
    ),
    ("The secret of getting ahead is getting started.", "Mark Twain"),
    ("It always seems impossible until it's done.", "Nelson Mandela"),
];

const MOTIVATIONAL: [(&str, &str); 6] = [
    (
        "The way to get started is to quit talking and begin doing.",
        "Walt Disney",
    ),
    ("Don't let yesterday take up too much of today.", "Will Rogers"),
    ("You learn more from failure than from success.", "Unknown"),
    (
        "It's not whether you get knocked down, it's whether you get up.",
        "Vince Lombardi",
    ),
    (
        "If you are working on something that you really care about, you don't have to be pushed.",
        "Steve Jobs",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.author.is_empty() {
            write!(f, "\"{}\"", self.text)
        } else {
            write!(f, "\"{}\" - {}", self.text, self.author)
        }
    }
}

#[derive(Debug)]
pub enum QuoteError {
    /// Request could not be built or sent, or the body could not be read.
    Transport(reqwest::Error),
    /// Endpoint answered with a non-success status.
    Status(u16),
    /// Body was not the expected JSON shape.
    Decode(String),
    /// Endpoint answered without any usable quote.
    Empty,
    /// Source is not configured (for example a missing API key).
    NotConfigured(&'static str),
}

impl Display for QuoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "quote request failed: {err}"),
            Self::Status(status) => write!(f, "quote endpoint returned status {status}"),
            Self::Decode(message) => write!(f, "invalid quote payload: {message}"),
            Self::Empty => write!(f, "quote endpoint returned no quotes"),
            Self::NotConfigured(what) => write!(f, "quote source not configured: {what}"),
        }
    }
}

impl Error for QuoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Anything that can produce one or more quotes.
pub trait QuoteSource {
    /// Short stable name used in log events.
    fn name(&self) -> &'static str;
    fn fetch(&self) -> Result<Vec<Quote>, QuoteError>;
}

/// Quotes shown by the carousel when the remote source fails.
pub fn carousel_fallback() -> Vec<Quote> {
    to_quotes(&CAROUSEL_FALLBACK)
}

/// Fixed pool behind the daily motivation card.
pub fn motivational_quotes() -> Vec<Quote> {
    to_quotes(&MOTIVATIONAL)
}

/// Motivation quote for `date`; stable for the whole day.
pub fn motivation_for(date: NaiveDate) -> Quote {
    motivation_at(date.num_days_from_ce().rem_euclid(MOTIVATIONAL.len() as i32) as usize)
}

/// The pool entry after `current`, wrapping; first entry if `current` is
/// not part of the pool.
pub fn next_motivation(current: &Quote) -> Quote {
    let next = MOTIVATIONAL
        .iter()
        .position(|(text, _)| *text == current.text)
        .map(|index| (index + 1) % MOTIVATIONAL.len())
        .unwrap_or(0);
    motivation_at(next)
}

/// Result of a fetch that may have fallen back to local quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBatch {
    pub quotes: Vec<Quote>,
    /// Error message shown next to fallback quotes.
    pub error: Option<String>,
}

impl QuoteBatch {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetches from `source`, substituting `fallback` on any failure.
pub fn fetch_with_fallback(source: &dyn QuoteSource, fallback: Vec<Quote>) -> QuoteBatch {
    match source.fetch() {
        Ok(quotes) if !quotes.is_empty() => QuoteBatch {
            quotes,
            error: None,
        },
        Ok(_) => fallback_batch(source.name(), &QuoteError::Empty, fallback),
        Err(err) => fallback_batch(source.name(), &err, fallback),
    }
}

/// Cyclic cursor over a non-empty list of quotes.
#[derive(Debug, Clone)]
pub struct QuoteCarousel {
    quotes: Vec<Quote>,
    index: usize,
}

impl QuoteCarousel {
    /// Builds a carousel; an empty list is replaced with the local fallback.
    pub fn new(quotes: Vec<Quote>) -> Self {
        let quotes = if quotes.is_empty() {
            carousel_fallback()
        } else {
            quotes
        };
        Self { quotes, index: 0 }
    }

    pub fn from_batch(batch: QuoteBatch) -> Self {
        Self::new(batch.quotes)
    }

    pub fn current(&self) -> &Quote {
        &self.quotes[self.index]
    }

    pub fn next(&mut self) -> &Quote {
        self.index = (self.index + 1) % self.quotes.len();
        self.current()
    }

    pub fn previous(&mut self) -> &Quote {
        self.index = (self.index + self.quotes.len() - 1) % self.quotes.len();
        self.current()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

fn fallback_batch(source: &str, err: &QuoteError, fallback: Vec<Quote>) -> QuoteBatch {
    warn!(
        "event=quote_fetch module=quotes status=fallback source={} error={}",
        source, err
    );
    QuoteBatch {
        quotes: fallback,
        error: Some(err.to_string()),
    }
}

fn motivation_at(index: usize) -> Quote {
    let (text, author) = MOTIVATIONAL[index % MOTIVATIONAL.len()];
    Quote::new(text, author)
}

fn to_quotes(entries: &[(&str, &str)]) -> Vec<Quote> {
    entries
        .iter()
        .map(|(text, author)| Quote::new(*text, *author))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{motivation_for, motivational_quotes, next_motivation, Quote, QuoteCarousel};
    use chrono::NaiveDate;

    #[test]
    fn carousel_wraps_both_ways() {
        let mut carousel = QuoteCarousel::new(vec![
            Quote::new("a", "x"),
            Quote::new("b", "y"),
            Quote::new("c", "z"),
        ]);
        assert_eq!(carousel.previous().text, "c");
        assert_eq!(carousel.next().text, "a");
        assert_eq!(carousel.next().text, "b");
    }

    #[test]
    fn empty_carousel_uses_fallback() {
        let carousel = QuoteCarousel::new(Vec::new());
        assert_eq!(carousel.len(), 3);
        assert_eq!(carousel.current().author, "Sam Levenson");
    }

    #[test]
    fn motivation_is_stable_per_day_and_refresh_moves_on() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(motivation_for(day), motivation_for(day));

        let pool = motivational_quotes();
        let last = pool.last().unwrap().clone();
        assert_eq!(next_motivation(&last), pool[0]);
        assert_eq!(next_motivation(&Quote::new("unknown", "nobody")), pool[0]);
    }
}
