//! Business goals, written through to the local store on every change.

use chrono::{NaiveDate, Utc};

use consultia_core::{BusinessGoal, Category, CoreError, GoalDraft, GoalId, GoalStatus};

use crate::error::ClientError;
use crate::store::{load_json, save_json, LocalStore, GOALS_KEY};

/// Goal collection backed by a [`LocalStore`].
pub struct GoalStore<S: LocalStore> {
    store: S,
    goals: Vec<BusinessGoal>,
}

impl<S: LocalStore> GoalStore<S> {
    /// Load goals; missing or corrupt data starts an empty collection.
    pub fn load(store: S) -> Self {
        let goals = load_json(&store, GOALS_KEY).unwrap_or_default();
        Self { store, goals }
    }

    pub fn goals(&self) -> &[BusinessGoal] {
        &self.goals
    }

    /// Add a goal, assigning an id from the current millisecond timestamp.
    pub fn add(&mut self, draft: GoalDraft) -> Result<&BusinessGoal, ClientError> {
        let id = self.next_id(Utc::now().timestamp_millis());
        let mut goals = self.goals.clone();
        goals.push(BusinessGoal::new(id, draft));
        self.commit(goals)?;
        let index = self.goals.len() - 1;
        Ok(&self.goals[index])
    }

    /// Replace every field of a goal except its id.
    pub fn update(&mut self, id: &GoalId, draft: GoalDraft) -> Result<&BusinessGoal, ClientError> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::GoalNotFound(id.to_string()))?;
        let mut goals = self.goals.clone();
        goals[index] = BusinessGoal::new(id.clone(), draft);
        self.commit(goals)?;
        Ok(&self.goals[index])
    }

    /// Remove a goal. Returns false if it did not exist.
    pub fn delete(&mut self, id: &GoalId) -> Result<bool, ClientError> {
        if self.position(id).is_none() {
            return Ok(false);
        }
        let goals = self.goals.iter().filter(|g| &g.id != id).cloned().collect();
        self.commit(goals)?;
        Ok(true)
    }

    pub fn get(&self, id: &GoalId) -> Option<&BusinessGoal> {
        self.goals.iter().find(|g| &g.id == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&BusinessGoal> {
        self.goals
            .iter()
            .filter(|g| g.draft.category == category)
            .collect()
    }

    pub fn by_status(&self, status: GoalStatus) -> Vec<&BusinessGoal> {
        self.goals
            .iter()
            .filter(|g| g.draft.status == status)
            .collect()
    }

    /// Percentage of completed goals, rounded; 0 when there are none.
    pub fn completion_rate(&self) -> u8 {
        if self.goals.is_empty() {
            return 0;
        }
        let completed = self.goals.iter().filter(|g| g.is_completed()).count();
        ((completed as f64 / self.goals.len() as f64) * 100.0).round() as u8
    }

    /// Open goals whose target date is `today` or earlier.
    pub fn overdue(&self, today: NaiveDate) -> Vec<&BusinessGoal> {
        self.goals.iter().filter(|g| g.is_overdue(today)).collect()
    }

    fn position(&self, id: &GoalId) -> Option<usize> {
        self.goals.iter().position(|g| &g.id == id)
    }

    /// First timestamp id at or after `millis` not already taken.
    fn next_id(&self, mut millis: i64) -> GoalId {
        while self.goals.iter().any(|g| g.id.millis() == Some(millis)) {
            millis += 1;
        }
        GoalId::from_millis(millis)
    }

    /// Write `goals` to the store, then adopt them. A failed write leaves
    /// the in-memory collection untouched.
    fn commit(&mut self, goals: Vec<BusinessGoal>) -> Result<(), ClientError> {
        save_json(&self.store, GOALS_KEY, &goals)?;
        self.goals = goals;
        Ok(())
    }
}
