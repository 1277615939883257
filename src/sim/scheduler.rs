//! Tick-driven deferred tasks
//!
//! Replaces engine timers: every delayed action is an entry with a fire tick
//! and a cancel token, advanced by the simulation loop.

use serde::{Deserialize, Serialize};

/// Cancel token for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u32);

/// Deferred actions the game knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedTask {
    /// Replace the failed session with a fresh one
    RestartSession,
    /// One step of the resume countdown
    CountdownTick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    id: TaskId,
    task: TimedTask,
    fire_at: u64,
    /// Re-arm interval for repeating tasks
    repeat: Option<u64>,
}

/// Single-threaded scheduler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: u64,
    next_id: u32,
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    fn push(&mut self, task: TimedTask, delay: u64, repeat: Option<u64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled {
            id,
            task,
            // A zero delay still waits for the next tick
            fire_at: self.now + delay.max(1),
            repeat,
        });
        id
    }

    /// Run `task` once after `delay` ticks
    pub fn schedule_once(&mut self, delay: u64, task: TimedTask) -> TaskId {
        self.push(task, delay, None)
    }

    /// Run `task` every `interval` ticks until cancelled
    pub fn schedule_repeating(&mut self, interval: u64, task: TimedTask) -> TaskId {
        let interval = interval.max(1);
        self.push(task, interval, Some(interval))
    }

    /// Remove a task; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Drop every task (the clock keeps running)
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Move the clock one tick and return due tasks, earliest first
    pub fn advance(&mut self) -> Vec<(TaskId, TimedTask)> {
        self.now += 1;
        let now = self.now;

        let mut due: Vec<(u64, TaskId, TimedTask)> = self
            .tasks
            .iter()
            .filter(|t| t.fire_at <= now)
            .map(|t| (t.fire_at, t.id, t.task))
            .collect();
        due.sort_by_key(|&(fire_at, id, _)| (fire_at, id));

        self.tasks.retain_mut(|t| {
            if t.fire_at > now {
                return true;
            }
            match t.repeat {
                Some(interval) => {
                    t.fire_at += interval;
                    true
                }
                None => false,
            }
        });

        due.into_iter().map(|(_, id, task)| (id, task)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheduler: &mut Scheduler, ticks: u64) -> Vec<(u64, TimedTask)> {
        let mut fired = Vec::new();
        for _ in 0..ticks {
            for (_, task) in scheduler.advance() {
                fired.push((scheduler.now(), task));
            }
        }
        fired
    }

    #[test]
    fn test_once_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(3, TimedTask::RestartSession);
        let fired = run(&mut scheduler, 10);
        assert_eq!(fired, vec![(3, TimedTask::RestartSession)]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_repeating_until_cancelled() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(2, TimedTask::CountdownTick);
        let fired = run(&mut scheduler, 6);
        assert_eq!(
            fired,
            vec![
                (2, TimedTask::CountdownTick),
                (4, TimedTask::CountdownTick),
                (6, TimedTask::CountdownTick),
            ]
        );
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(run(&mut scheduler, 6).is_empty());
    }

    #[test]
    fn test_cancel_before_fire() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_once(5, TimedTask::RestartSession);
        assert!(scheduler.is_scheduled(id));
        scheduler.cancel(id);
        assert!(!scheduler.is_scheduled(id));
        assert!(run(&mut scheduler, 10).is_empty());
    }

    #[test]
    fn test_due_order_is_stable() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule_once(1, TimedTask::CountdownTick);
        let b = scheduler.schedule_once(1, TimedTask::RestartSession);
        let due = scheduler.advance();
        assert_eq!(
            due,
            vec![(a, TimedTask::CountdownTick), (b, TimedTask::RestartSession)]
        );
    }

    #[test]
    fn test_zero_delay_waits_one_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(0, TimedTask::RestartSession);
        assert_eq!(scheduler.advance().len(), 1);
    }
}
