use serde::Serialize;

/// Completed-question counts at which an achievement unlocks.
pub const ACHIEVEMENT_THRESHOLDS: [u32; 8] = [1, 3, 5, 10, 20, 30, 40, 50];

pub fn label_for(threshold: u32) -> String {
    if threshold == 1 {
        "Complete 1 question".to_string()
    } else {
        format!("Complete {} questions", threshold)
    }
}

/// Unlocked thresholds for one session, kept in unlock order.
#[derive(Debug, Clone, Default)]
pub struct AchievementSet {
    unlocked: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct AchievementStatus {
    pub threshold: u32,
    pub label: String,
    pub unlocked: bool,
}

impl AchievementSet {
    /// Unlocks every threshold covered by `completed` that is not yet held.
    /// Returns the newly unlocked thresholds; calling again with the same
    /// count returns nothing.
    pub fn unlock_for(&mut self, completed: u32) -> Vec<u32> {
        let mut newly = Vec::new();
        for threshold in ACHIEVEMENT_THRESHOLDS {
            if threshold <= completed && !self.unlocked.contains(&threshold) {
                self.unlocked.push(threshold);
                newly.push(threshold);
            }
        }
        newly
    }

    pub fn contains(&self, threshold: u32) -> bool {
        self.unlocked.contains(&threshold)
    }

    pub fn labels(&self) -> Vec<String> {
        self.unlocked.iter().map(|t| label_for(*t)).collect()
    }

    /// Full checklist of all thresholds with their unlocked state.
    pub fn checklist(&self) -> Vec<AchievementStatus> {
        ACHIEVEMENT_THRESHOLDS
            .iter()
            .map(|&threshold| AchievementStatus {
                threshold,
                label: label_for(threshold),
                unlocked: self.contains(threshold),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.unlocked.clear();
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_exactly_the_thresholds_at_or_below_the_count() {
        let mut set = AchievementSet::default();
        let newly = set.unlock_for(5);
        assert_eq!(newly, vec![1, 3, 5]);
        assert!(set.contains(5));
        assert!(!set.contains(10));
    }

    #[test]
    fn unlocking_is_idempotent() {
        let mut set = AchievementSet::default();
        set.unlock_for(5);
        assert!(set.unlock_for(5).is_empty());
        assert_eq!(set.unlock_for(6), Vec::<u32>::new());
        assert_eq!(set.unlock_for(10), vec![10]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn labels_use_singular_for_the_first_threshold() {
        assert_eq!(label_for(1), "Complete 1 question");
        assert_eq!(label_for(3), "Complete 3 questions");
    }

    #[test]
    fn checklist_covers_every_threshold() {
        let mut set = AchievementSet::default();
        set.unlock_for(3);
        let checklist = set.checklist();
        assert_eq!(checklist.len(), ACHIEVEMENT_THRESHOLDS.len());
        assert!(checklist[0].unlocked && checklist[1].unlocked);
        assert!(!checklist[2].unlocked);
    }

    #[test]
    fn clear_removes_all_unlocks() {
        let mut set = AchievementSet::default();
        set.unlock_for(50);
        assert_eq!(set.len(), ACHIEVEMENT_THRESHOLDS.len());
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.unlock_for(1), vec![1]);
    }
}
