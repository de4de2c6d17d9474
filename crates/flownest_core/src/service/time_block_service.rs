//! Time blocking use-case service.
//!
//! # Invariants
//! - Only blocks for the given day are listed. Older days are purged on
//!   read through `purge_stale`, matching the dashboard's daily reset.
//! - Blocks are ordered by start time.

use super::{non_blank, ServiceResult};
use crate::model::time_block::{BlockColor, TimeBlock};
use crate::model::{parse_clock_time, OwnerId, RecordId};
use crate::repo::time_block_repo::TimeBlockRepository;
use chrono::NaiveDate;
use log::{debug, info};

/// Input for the add-block form. Times are `HH:MM` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTimeBlock {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub color: BlockColor,
}

pub struct TimeBlockService<R: TimeBlockRepository> {
    repo: R,
}

impl<R: TimeBlockRepository> TimeBlockService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a block for `today`. Missing title or times make this a no-op.
    pub fn add_block(
        &self,
        owner_id: OwnerId,
        today: NaiveDate,
        input: NewTimeBlock,
    ) -> ServiceResult<Option<TimeBlock>> {
        let (Some(title), Some(start), Some(end)) = (
            non_blank(&input.title),
            non_blank(&input.start_time),
            non_blank(&input.end_time),
        ) else {
            debug!("event=time_block_add module=service status=skipped reason=incomplete_form");
            return Ok(None);
        };

        let mut block = TimeBlock::new(
            owner_id,
            title,
            today,
            parse_clock_time(&start)?,
            parse_clock_time(&end)?,
        );
        block.color = input.color;
        self.repo.create_block(&block)?;
        info!(
            "event=time_block_add module=service status=ok block_id={}",
            block.id
        );
        Ok(Some(block))
    }

    /// Drops blocks dated before `today` and returns how many went.
    pub fn purge_stale(&self, owner_id: OwnerId, today: NaiveDate) -> ServiceResult<usize> {
        let purged = self.repo.purge_before(owner_id, today)?;
        if purged > 0 {
            info!("event=time_block_purge module=service status=ok removed={purged}");
        }
        Ok(purged)
    }

    pub fn blocks_on(&self, owner_id: OwnerId, day: NaiveDate) -> ServiceResult<Vec<TimeBlock>> {
        Ok(self.repo.list_blocks_on(owner_id, day)?)
    }

    pub fn delete_block(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<()> {
        self.repo.delete_block(owner_id, id)?;
        info!("event=time_block_delete module=service status=ok block_id={id}");
        Ok(())
    }
}
