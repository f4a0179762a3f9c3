use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::catalog::get_daily_routine;
use crate::error::{Error, Result};
use crate::ledger::mark_date_complete;
use crate::models::{CompletionRecord, DailyRoutine, Level, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Opened,
    Committed,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Opened => "In Progress",
            SessionState::Committed => "Completed",
        }
    }
}

/// In-memory checklist for one date and level. Only a commit has a durable
/// effect; toggles are discarded when the selection is dropped.
#[derive(Debug, Clone, Serialize)]
pub struct DailySelection {
    pub date: NaiveDate,
    pub level: Level,
    pub routine: DailyRoutine,
    pub done: Vec<bool>,
    pub state: SessionState,
}

impl DailySelection {
    pub fn open(level: Level, date: NaiveDate) -> Self {
        let routine = get_daily_routine(level, date);
        let done = vec![false; routine.exercises.len()];
        Self {
            date,
            level,
            routine,
            done,
            state: SessionState::Opened,
        }
    }

    /// Opens the selection, pre-checking every step when the record already
    /// holds this date.
    pub fn open_for(level: Level, date: NaiveDate, record: &CompletionRecord) -> Self {
        let mut selection = Self::open(level, date);
        if record.is_completed(date) {
            selection.done.iter_mut().for_each(|d| *d = true);
            selection.state = SessionState::Committed;
        }
        selection
    }

    pub fn steps(&self) -> &'static [Step] {
        self.routine.exercises
    }

    pub fn toggle_step(&mut self, index: usize) -> Result<bool> {
        let len = self.done.len();
        let slot = self
            .done
            .get_mut(index)
            .ok_or(Error::StepOutOfRange { index, len })?;
        *slot = !*slot;
        Ok(*slot)
    }

    pub fn completed_count(&self) -> usize {
        self.done.iter().filter(|d| **d).count()
    }

    pub fn is_fully_complete(&self) -> bool {
        self.done.iter().all(|d| *d)
    }

    /// Marks the date complete on `record` when every step is checked.
    ///
    /// Safe to call repeatedly: the ledger ignores dates it already holds.
    /// Unchecking a step afterwards does not undo the commit.
    pub fn commit_if_complete(&mut self, record: CompletionRecord) -> CompletionRecord {
        if !self.is_fully_complete() {
            return record;
        }
        self.state = SessionState::Committed;
        debug!(date = %self.date, level = self.level.as_str(), "all steps done, committing");
        mark_date_complete(record, self.date)
    }
}
