//! Goal record and progress math.

use super::{now_epoch_ms, require_text, OwnerId, RecordId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const DEFAULT_TARGET_VALUE: f64 = 100.0;
pub const DEFAULT_CATEGORY: &str = "personal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[default]
    Weekly,
    Monthly,
}

impl GoalType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ValidationError::UnknownValue {
                field: "goal type",
                value: other.to_string(),
            }),
        }
    }
}

impl Display for GoalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display band derived from progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    Complete,
    High,
    Medium,
    Low,
}

impl ProgressBand {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Complete
        } else if percentage >= 75.0 {
            Self::High
        } else if percentage >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub target_value: f64,
    pub current_value: f64,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub category: String,
    pub created_at: i64,
}

impl Goal {
    /// Creates a goal with the default target (100) and zero progress.
    pub fn new(owner_id: OwnerId, title: impl Into<String>, goal_type: GoalType) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            description: String::new(),
            target_value: DEFAULT_TARGET_VALUE,
            current_value: 0.0,
            goal_type,
            category: DEFAULT_CATEGORY.to_string(),
            created_at: now_epoch_ms(),
        }
    }

    /// Progress in percent, always within `[0, 100]`.
    pub fn progress_percentage(&self) -> f64 {
        progress_percentage(self.current_value, self.target_value)
    }

    pub fn progress_band(&self) -> ProgressBand {
        ProgressBand::for_percentage(self.progress_percentage())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if !self.target_value.is_finite() {
            return Err(ValidationError::NonFiniteNumber("target_value"));
        }
        if !self.current_value.is_finite() {
            return Err(ValidationError::NonFiniteNumber("current_value"));
        }
        Ok(())
    }
}

/// Clamped progress ratio in percent.
///
/// A non-positive or non-finite target yields 0.
pub fn progress_percentage(current: f64, target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::{progress_percentage, ProgressBand};

    #[test]
    fn progress_is_clamped_for_any_input() {
        assert_eq!(progress_percentage(50.0, 100.0), 50.0);
        assert_eq!(progress_percentage(250.0, 100.0), 100.0);
        assert_eq!(progress_percentage(-5.0, 100.0), 0.0);
        assert_eq!(progress_percentage(10.0, 0.0), 0.0);
        assert_eq!(progress_percentage(0.0, 0.0), 0.0);
        assert_eq!(progress_percentage(10.0, -3.0), 0.0);
        assert_eq!(progress_percentage(f64::NAN, 10.0), 0.0);
        assert_eq!(progress_percentage(5.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ProgressBand::for_percentage(100.0), ProgressBand::Complete);
        assert_eq!(ProgressBand::for_percentage(75.0), ProgressBand::High);
        assert_eq!(ProgressBand::for_percentage(50.0), ProgressBand::Medium);
        assert_eq!(ProgressBand::for_percentage(49.9), ProgressBand::Low);
    }
}
