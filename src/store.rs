// In-memory task store: comparator, filters, statistics, export glue

use crate::audit::AuditLog;
use crate::export::{self, ExportFormat};
use crate::task::{Task, Urgency};
use eyre::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Per-flag task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Pending-task counts per urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrgencyCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl UrgencyCounts {
    pub fn get(&self, urgency: Urgency) -> usize {
        match urgency {
            Urgency::Low => self.low,
            Urgency::Medium => self.medium,
            Urgency::High => self.high,
            Urgency::Critical => self.critical,
        }
    }
}

/// Owns the task list and the next-id counter.
///
/// Tasks live in insertion order; ids start at 1, increase strictly and are
/// never reused after removal. Lookups resolve to an index, never to a
/// reference that outlives a mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    audit: AuditLog,
}

impl TaskStore {
    pub fn new(audit: AuditLog) -> Result<Self> {
        audit.append("Task tracker initialized")?;
        Ok(Self {
            tasks: Vec::new(),
            next_id: 1,
            audit,
        })
    }

    /// Add a task, returning its assigned id.
    ///
    /// Descriptions are stored verbatim; the shell rejects empty input
    /// before calling this.
    pub fn add(&mut self, description: impl Into<String>, urgency: Urgency) -> Result<u64> {
        let task = Task::new(self.next_id, description, urgency);
        self.next_id += 1;

        self.audit.append(&format!(
            "Added task [ID: {}] \"{}\" [{}]",
            task.id, task.description, task.urgency
        ))?;
        debug!(id = task.id, urgency = %task.urgency, "Task added");

        let id = task.id;
        self.tasks.push(task);
        Ok(id)
    }

    /// Remove the task with the given id. Returns false if no task matches.
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let task = self.tasks.remove(index);
        self.audit
            .append(&format!("Removed task [ID: {}] \"{}\"", id, task.description))?;
        debug!(id, "Task removed");
        Ok(true)
    }

    /// Flip the completed flag on. Returns false if no task matches.
    pub fn mark_completed(&mut self, id: u64) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        self.tasks[index].completed = true;
        let description = self.tasks[index].description.clone();
        self.audit
            .append(&format!("Completed task [ID: {}] \"{}\"", id, description))?;
        debug!(id, "Task completed");
        Ok(true)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks sorted by urgency descending, creation time ascending.
    ///
    /// The sort is stable, so tasks with equal urgency and timestamp keep
    /// insertion order. Store order is untouched.
    pub fn sorted_by_urgency(&self) -> Vec<Task> {
        let mut sorted = self.tasks.clone();
        sorted.sort_by(|a, b| {
            b.urgency
                .cmp(&a.urgency)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        sorted
    }

    /// Tasks with the given urgency, insertion order preserved.
    pub fn filter_by_urgency(&self, urgency: Urgency) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.urgency == urgency).cloned().collect()
    }

    /// Completed tasks, insertion order preserved.
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.completed).cloned().collect()
    }

    /// Pending tasks, insertion order preserved.
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| !t.completed).cloned().collect()
    }

    /// Remove every completed task, returning how many were removed.
    /// Pending tasks keep their relative order.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            self.audit
                .append(&format!("Cleared {} completed tasks", removed))?;
            debug!(removed, "Completed tasks cleared");
        }
        Ok(removed)
    }

    /// Total/pending/completed counts in a single pass.
    pub fn counts(&self) -> TaskCounts {
        let mut counts = TaskCounts {
            total: self.tasks.len(),
            ..TaskCounts::default()
        };
        for task in &self.tasks {
            if task.completed {
                counts.completed += 1;
            } else {
                counts.pending += 1;
            }
        }
        counts
    }

    /// Pending-task counts per urgency level in a single pass.
    pub fn pending_by_urgency(&self) -> UrgencyCounts {
        let mut counts = UrgencyCounts::default();
        for task in self.tasks.iter().filter(|t| !t.completed) {
            match task.urgency {
                Urgency::Low => counts.low += 1,
                Urgency::Medium => counts.medium += 1,
                Urgency::High => counts.high += 1,
                Urgency::Critical => counts.critical += 1,
            }
        }
        counts
    }

    /// Serialize the current task list to `path` in the given format.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<()> {
        export::write_export(format, &self.tasks, path)?;
        self.audit
            .append(&format!("Exported tasks to {}: {}", format, path.display()))?;
        Ok(())
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

impl Drop for TaskStore {
    fn drop(&mut self) {
        // Best effort only; an unwritable log must not panic during drop
        if let Err(e) = self.audit.append("Task tracker terminated") {
            warn!(error = ?e, "Failed to write final audit entry");
        }
    }
}
