//! # Task Management System
//!
//! This module provides the worklist that drives rule-engine cascades. Placing, breaking
//! or blasting a block can set off an unbounded chain of reactions (falls, decays,
//! further blasts); instead of recursing, every reaction is published as a
//! [`CascadeTask`] and the queue is drained to a fixed point within the one action.
//!
//! ## Architecture Overview
//!
//! - `CascadeQueue`: the LIFO worklist plus the per-action bookkeeping
//! - `CascadeTask`: a single unit of work, see [`task`]
//! - `CascadeReport`: what one drained action did
//!
//! ## Ordering
//!
//! The queue is a stack. A task publishes its follow-ups in reverse, so the first
//! follow-up is handled next and its whole sub-cascade completes before the second one
//! starts. This is exactly depth-first order.
//!
//! ## Termination
//!
//! - Each position decays at most once per action ([`CascadeQueue::mark_decayed`])
//! - Tasks whose voxel is gone are dropped when they run
//! - A step limit stops anything else, dropping the remaining tasks with a warning
//!
//! ## Example Usage
//! ```ignore
//! let mut queue = CascadeQueue::new(limit);
//! queue.publish_task(CascadeTask::Place { target, normal });
//! while let Some(task) = queue.next_task() {
//!     for follow_up in process(task).into_iter().rev() {
//!         queue.publish_task(follow_up);
//!     }
//! }
//! let report = queue.finish();
//! ```

pub mod task;

use std::collections::HashSet;

use cgmath::Point3;
use log::{trace, warn};
use task::CascadeTask;

/// Summary of one drained action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Tasks that were run.
    pub steps: usize,
    /// Whether the step limit cut the cascade short.
    pub truncated: bool,
}

/// The worklist of a single top-level action.
#[derive(Debug)]
pub struct CascadeQueue {
    queued_tasks: Vec<CascadeTask>,
    decayed: HashSet<Point3<i32>>,
    step_limit: usize,
    steps: usize,
    truncated: bool,
}

impl CascadeQueue {
    /// Creates an empty queue that runs at most `step_limit` tasks.
    pub fn new(step_limit: usize) -> Self {
        CascadeQueue {
            queued_tasks: Vec::new(),
            decayed: HashSet::new(),
            step_limit,
            steps: 0,
            truncated: false,
        }
    }

    /// Schedules a task to run before everything already queued.
    pub fn publish_task(&mut self, task: CascadeTask) {
        self.queued_tasks.push(task);
    }

    /// Schedules tasks so that they run in the order given.
    pub fn publish_all(&mut self, tasks: impl IntoIterator<Item = CascadeTask>) {
        let mut tasks: Vec<_> = tasks.into_iter().collect();
        tasks.reverse();
        self.queued_tasks.extend(tasks);
    }

    /// Pops the next task, counting it against the step limit.
    ///
    /// Once the limit is reached the remaining tasks are discarded and `None` is
    /// returned.
    pub fn next_task(&mut self) -> Option<CascadeTask> {
        if self.queued_tasks.is_empty() {
            return None;
        }
        if self.steps >= self.step_limit {
            warn!(
                "Cascade exceeded {} steps, dropping {} pending tasks",
                self.step_limit,
                self.len()
            );
            self.queued_tasks.clear();
            self.truncated = true;
            return None;
        }
        self.steps += 1;
        let task = self.queued_tasks.pop();
        if let Some(task) = &task {
            trace!("Cascade step {} ({}): {:?}", self.steps, task.kind(), task);
        }
        task
    }

    /// Records that `position` decayed in this action.
    ///
    /// # Returns
    ///
    /// `false` if it had already decayed, in which case it must not decay again.
    pub fn mark_decayed(&mut self, position: Point3<i32>) -> bool {
        self.decayed.insert(position)
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Returns whether no task is waiting.
    pub fn is_empty(&self) -> bool {
        self.queued_tasks.is_empty()
    }

    /// Ends the action, resetting the queue for the next one.
    pub fn finish(&mut self) -> CascadeReport {
        let report = CascadeReport {
            steps: self.steps,
            truncated: self.truncated,
        };
        self.queued_tasks.clear();
        self.decayed.clear();
        self.steps = 0;
        self.truncated = false;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn neighbor_at(x: i32) -> CascadeTask {
        CascadeTask::Neighbor {
            origin: Point3::new(x, 0, 0),
            side: crate::engine_state::voxels::block::block_side::BlockSide::TOP,
        }
    }

    #[test]
    fn publish_all_preserves_order() {
        let mut queue = CascadeQueue::new(10);
        queue.publish_task(neighbor_at(9));
        queue.publish_all([neighbor_at(1), neighbor_at(2)]);
        assert_eq!(queue.next_task(), Some(neighbor_at(1)));
        assert_eq!(queue.next_task(), Some(neighbor_at(2)));
        assert_eq!(queue.next_task(), Some(neighbor_at(9)));
        assert_eq!(queue.next_task(), None);
        assert_eq!(
            queue.finish(),
            CascadeReport {
                steps: 3,
                truncated: false
            }
        );
    }

    #[test]
    fn step_limit_discards_the_rest() {
        let mut queue = CascadeQueue::new(2);
        queue.publish_all((0..5).map(neighbor_at));
        assert_eq!(queue.len(), 5);
        assert!(queue.next_task().is_some());
        assert!(queue.next_task().is_some());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.next_task(), None);
        assert!(queue.is_empty());
        assert_eq!(
            queue.finish(),
            CascadeReport {
                steps: 2,
                truncated: true
            }
        );
    }

    #[test]
    fn positions_decay_once_per_action() {
        let mut queue = CascadeQueue::new(10);
        let p = Point3::new(0, 0, 0);
        assert!(queue.mark_decayed(p));
        assert!(!queue.mark_decayed(p));
        queue.finish();
        assert!(queue.mark_decayed(p));
    }
}
