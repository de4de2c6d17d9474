//! Day-scoped time block record.

use super::{
    format_clock_12h, now_epoch_ms, require_text, OwnerId, RecordId, ValidationError,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
}

impl BlockColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "purple" => Ok(Self::Purple),
            "orange" => Ok(Self::Orange),
            other => Err(ValidationError::UnknownValue {
                field: "color",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub color: BlockColor,
    pub created_at: i64,
}

impl TimeBlock {
    pub fn new(
        owner_id: OwnerId,
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            date,
            start_time,
            end_time,
            color: BlockColor::default(),
            created_at: now_epoch_ms(),
        }
    }

    /// `9:00 AM - 10:30 AM` style label.
    pub fn display_range(&self) -> String {
        format!(
            "{} - {}",
            format_clock_12h(self.start_time),
            format_clock_12h(self.end_time)
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if self.end_time <= self.start_time {
            return Err(ValidationError::EmptyTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TimeBlock;
    use crate::model::{ValidationError, GUEST_OWNER_ID};
    use chrono::{NaiveDate, NaiveTime};

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let block = TimeBlock::new(GUEST_OWNER_ID, "deep work", date, at(10, 0), at(9, 0));
        assert!(matches!(
            block.validate(),
            Err(ValidationError::EmptyTimeRange { .. })
        ));
    }

    #[test]
    fn display_range_uses_twelve_hour_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let block = TimeBlock::new(GUEST_OWNER_ID, "lunch", date, at(12, 0), at(13, 30));
        assert_eq!(block.display_range(), "12:00 PM - 1:30 PM");
    }
}
