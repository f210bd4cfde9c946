//! Day-completion tracking kept alongside an immutable plan.

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("day {day} is not part of a {total}-day plan")]
    UnknownDay { day: u32, total: u32 },
}

/// Set of completed day numbers for a plan of `total` days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    total: u32,
    completed: BTreeSet<u32>,
}

impl CompletionTracker {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: BTreeSet::new(),
        }
    }

    /// Flip the completion state of `day`. Returns the new state.
    pub fn toggle(&mut self, day: u32) -> Result<bool, ProgressError> {
        if day == 0 || day > self.total {
            return Err(ProgressError::UnknownDay {
                day,
                total: self.total,
            });
        }
        if self.completed.remove(&day) {
            Ok(false)
        } else {
            self.completed.insert(day);
            Ok(true)
        }
    }

    pub fn is_completed(&self, day: u32) -> bool {
        self.completed.contains(&day)
    }

    /// Completed days in ascending order.
    pub fn completed_days(&self) -> Vec<u32> {
        self.completed.iter().copied().collect()
    }

    pub fn completed_count(&self) -> u32 {
        self.completed.len() as u32
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn progress_label(&self) -> String {
        format!(
            "Progress: {}/{} days completed",
            self.completed_count(),
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_state() {
        let mut tracker = CompletionTracker::new(7);
        assert_eq!(tracker.toggle(3), Ok(true));
        assert!(tracker.is_completed(3));
        assert_eq!(tracker.toggle(3), Ok(false));
        assert!(!tracker.is_completed(3));
    }

    #[test]
    fn rejects_days_outside_plan() {
        let mut tracker = CompletionTracker::new(7);
        assert_eq!(
            tracker.toggle(0),
            Err(ProgressError::UnknownDay { day: 0, total: 7 })
        );
        assert!(tracker.toggle(8).is_err());
        assert_eq!(tracker.completed_count(), 0);
    }

    #[test]
    fn label_and_sorted_days() {
        let mut tracker = CompletionTracker::new(10);
        for day in [5, 1, 9] {
            tracker.toggle(day).unwrap();
        }
        assert_eq!(tracker.completed_days(), vec![1, 5, 9]);
        assert_eq!(tracker.progress_label(), "Progress: 3/10 days completed");
    }
}
