//! Reflection record.
//!
//! The journal widget saves bare text. Weekly reflections add a title and
//! the mood of the week.

use super::{now_epoch_ms, require_text, OwnerId, RecordId, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Excited,
    #[default]
    Neutral,
    Tired,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Excited,
        Mood::Neutral,
        Mood::Tired,
        Mood::Sad,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Sad => "sad",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Excited => "🤩",
            Self::Neutral => "😐",
            Self::Tired => "😴",
            Self::Sad => "😢",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == value)
            .ok_or(ValidationError::UnknownValue {
                field: "mood",
                value,
            })
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: RecordId,
    pub owner_id: OwnerId,
    /// Only weekly reflections carry a title.
    pub title: Option<String>,
    pub text: String,
    pub mood: Mood,
    /// Written-at time in Unix epoch milliseconds.
    pub created_at: i64,
}

impl Reflection {
    pub fn new(owner_id: OwnerId, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: None,
            text: text.into(),
            mood: Mood::default(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn weekly(
        owner_id: OwnerId,
        title: impl Into<String>,
        text: impl Into<String>,
        mood: Mood,
    ) -> Self {
        Self {
            title: Some(title.into()),
            mood,
            ..Self::new(owner_id, text)
        }
    }

    /// Calendar date (UTC) the reflection was written on.
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp_millis(self.created_at).map(|at| at.date_naive())
    }

    /// Title when present, otherwise the text.
    pub fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.text)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("text", &self.text)?;
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Mood, Reflection};
    use crate::model::{ValidationError, GUEST_OWNER_ID};

    #[test]
    fn mood_parses_case_insensitively() {
        assert_eq!(Mood::parse(" Tired ").unwrap(), Mood::Tired);
        assert!(matches!(
            Mood::parse("angry"),
            Err(ValidationError::UnknownValue { field: "mood", .. })
        ));
    }

    #[test]
    fn weekly_reflection_needs_a_title() {
        let mut reflection =
            Reflection::weekly(GUEST_OWNER_ID, "Week 23", "Shipped it", Mood::Happy);
        assert_eq!(reflection.heading(), "Week 23");
        assert_eq!(reflection.validate(), Ok(()));

        reflection.title = Some("  ".to_string());
        assert_eq!(
            reflection.validate(),
            Err(ValidationError::EmptyField("title"))
        );

        let plain = Reflection::new(GUEST_OWNER_ID, "just text");
        assert_eq!(plain.heading(), "just text");
        assert_eq!(plain.mood, Mood::Neutral);
    }
}
