//! Reflection use-case service (journal widget and weekly reflections).

use super::{non_blank, ServiceResult};
use crate::model::reflection::{Mood, Reflection};
use crate::model::{OwnerId, RecordId};
use crate::repo::reflection_repo::ReflectionRepository;
use log::{debug, info};

/// Input for the weekly reflection form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWeeklyReflection {
    pub title: String,
    pub text: String,
    pub mood: Mood,
}

pub struct ReflectionService<R: ReflectionRepository> {
    repo: R,
}

impl<R: ReflectionRepository> ReflectionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves a reflection; blank text is ignored.
    pub fn save_reflection(
        &self,
        owner_id: OwnerId,
        text: &str,
    ) -> ServiceResult<Option<Reflection>> {
        let Some(text) = non_blank(text) else {
            debug!("event=reflection_save module=service status=skipped reason=empty_text");
            return Ok(None);
        };

        let reflection = Reflection::new(owner_id, text);
        self.repo.create_reflection(&reflection)?;
        info!(
            "event=reflection_save module=service status=ok reflection_id={}",
            reflection.id
        );
        Ok(Some(reflection))
    }

    /// Saves a weekly reflection; both title and text are required.
    pub fn save_weekly(
        &self,
        owner_id: OwnerId,
        input: NewWeeklyReflection,
    ) -> ServiceResult<Option<Reflection>> {
        let (Some(title), Some(text)) = (non_blank(&input.title), non_blank(&input.text)) else {
            debug!("event=reflection_save module=service status=skipped reason=incomplete_form");
            return Ok(None);
        };

        let reflection = Reflection::weekly(owner_id, title, text, input.mood);
        self.repo.create_reflection(&reflection)?;
        info!(
            "event=reflection_save module=service status=ok reflection_id={} mood={}",
            reflection.id, reflection.mood
        );
        Ok(Some(reflection))
    }

    /// All reflections, newest first.
    pub fn list_reflections(&self, owner_id: OwnerId) -> ServiceResult<Vec<Reflection>> {
        Ok(self.repo.list_reflections(owner_id, None)?)
    }

    pub fn recent_reflections(
        &self,
        owner_id: OwnerId,
        limit: u32,
    ) -> ServiceResult<Vec<Reflection>> {
        Ok(self.repo.list_reflections(owner_id, Some(limit))?)
    }

    pub fn delete_reflection(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<()> {
        self.repo.delete_reflection(owner_id, id)?;
        info!("event=reflection_delete module=service status=ok reflection_id={id}");
        Ok(())
    }
}
