//! Goal use-case service (goal tracker widget).

use super::{non_blank, ServiceError, ServiceResult};
use crate::model::goal::{Goal, GoalType, DEFAULT_CATEGORY, DEFAULT_TARGET_VALUE};
use crate::model::{OwnerId, RecordId};
use crate::repo::goal_repo::GoalRepository;
use log::{debug, info};

/// Input for the add-goal form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub target_value: f64,
    pub current_value: f64,
    pub goal_type: GoalType,
    pub category: String,
}

impl Default for NewGoal {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            target_value: DEFAULT_TARGET_VALUE,
            current_value: 0.0,
            goal_type: GoalType::Weekly,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Field overwrites for the edit form. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub goal_type: Option<GoalType>,
    pub category: Option<String>,
}

pub struct GoalService<R: GoalRepository> {
    repo: R,
}

impl<R: GoalRepository> GoalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a goal; a blank title is ignored.
    pub fn add_goal(&self, owner_id: OwnerId, input: NewGoal) -> ServiceResult<Option<Goal>> {
        let Some(title) = non_blank(&input.title) else {
            debug!("event=goal_add module=service status=skipped reason=empty_title");
            return Ok(None);
        };

        let mut goal = Goal::new(owner_id, title, input.goal_type);
        goal.description = input.description.trim().to_string();
        goal.target_value = input.target_value;
        goal.current_value = input.current_value;
        goal.category = non_blank(&input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        self.repo.create_goal(&goal)?;
        info!("event=goal_add module=service status=ok goal_id={}", goal.id);
        Ok(Some(goal))
    }

    /// Overwrites the current value. The stored value is not clamped; only
    /// the derived percentage is.
    pub fn set_progress(
        &self,
        owner_id: OwnerId,
        id: RecordId,
        current_value: f64,
    ) -> ServiceResult<Goal> {
        self.update_goal(
            owner_id,
            id,
            GoalUpdate {
                current_value: Some(current_value),
                ..GoalUpdate::default()
            },
        )
    }

    pub fn update_goal(
        &self,
        owner_id: OwnerId,
        id: RecordId,
        update: GoalUpdate,
    ) -> ServiceResult<Goal> {
        let mut goal = self.require(owner_id, id)?;
        if let Some(title) = update.title {
            goal.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            goal.description = description.trim().to_string();
        }
        if let Some(target_value) = update.target_value {
            goal.target_value = target_value;
        }
        if let Some(current_value) = update.current_value {
            goal.current_value = current_value;
        }
        if let Some(goal_type) = update.goal_type {
            goal.goal_type = goal_type;
        }
        if let Some(category) = update.category {
            goal.category = category.trim().to_string();
        }
        self.repo.update_goal(&goal)?;
        info!(
            "event=goal_update module=service status=ok goal_id={} progress_pct={:.1}",
            goal.id,
            goal.progress_percentage()
        );
        Ok(goal)
    }

    pub fn delete_goal(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<()> {
        self.repo.delete_goal(owner_id, id)?;
        info!("event=goal_delete module=service status=ok goal_id={id}");
        Ok(())
    }

    pub fn list_goals(&self, owner_id: OwnerId) -> ServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals(owner_id)?)
    }

    fn require(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<Goal> {
        self.repo
            .get_goal(owner_id, id)?
            .ok_or(ServiceError::NotFound(id))
    }
}
