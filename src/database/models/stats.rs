use serde::Serialize;

use super::TaskStatus;

/// Raw per-status task counts for one project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: TaskStatus, n: i64) {
        match status {
            TaskStatus::Todo => self.todo += n,
            TaskStatus::InProgress => self.in_progress += n,
            TaskStatus::Done => self.done += n,
        }
    }

    pub fn total(&self) -> i64 {
        self.todo + self.in_progress + self.done
    }
}

impl FromIterator<TaskStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = TaskStatus>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.add(status, 1);
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub total: i64,
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
    /// Percentage of tasks in DONE, 0.0 for a project without tasks
    pub completion_rate: f64,
}

impl From<StatusCounts> for ProjectStats {
    fn from(counts: StatusCounts) -> Self {
        let total = counts.total();
        let completion_rate = if total > 0 {
            counts.done as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            todo: counts.todo,
            in_progress: counts.in_progress,
            done: counts.done,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_done() {
        let counts: StatusCounts = [
            TaskStatus::Todo,
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Done,
        ]
        .into_iter()
        .collect();
        let stats = ProjectStats::from(counts);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.todo, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.done, 1);
        assert_eq!(stats.completion_rate, 25.0);
    }

    #[test]
    fn empty_project_has_zero_rate() {
        let stats = ProjectStats::from(StatusCounts::default());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn all_done_is_one_hundred() {
        let stats = ProjectStats::from(StatusCounts { todo: 0, in_progress: 0, done: 3 });
        assert_eq!(stats.completion_rate, 100.0);
    }
}
