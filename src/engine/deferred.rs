//! Deferred Task Queue
//!
//! Delayed secondary behaviour (chained explosions, hit-flash reverts and the
//! removal of dead agents) is queued here and fires on a later tick. Nothing
//! runs on a timer thread: the simulation drains due tasks at the start of
//! every step.

use bevy::prelude::*;

use super::agents::AgentId;
use super::constants::TIMER_EPSILON;
use super::status::DamageType;

/// Work scheduled for a later tick.
#[derive(Clone, Debug, PartialEq)]
pub enum DeferredTask {
    /// Physically remove a dead agent after its grace delay
    RemoveAgent { agent: AgentId },
    /// Damage everything inside `radius` of `position`
    Explosion {
        position: Vec3,
        radius: f32,
        damage: f32,
        damage_type: DamageType,
        label: String,
        /// Lifetime of the cosmetic blast particle
        visual_lifetime: f32,
    },
    /// Clear an agent's hit flash
    RevertFlash { agent: AgentId },
}

#[derive(Clone, Debug)]
struct Scheduled {
    fire_at: f32,
    sequence: u64,
    task: DeferredTask,
}

/// Queue of tasks waiting for their fire time.
#[derive(Default, Debug)]
pub struct DeferredTasks {
    now: f32,
    next_sequence: u64,
    pending: Vec<Scheduled>,
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, task: DeferredTask) {
        self.pending.push(Scheduled {
            fire_at: self.now + delay.max(0.0),
            sequence: self.next_sequence,
            task,
        });
        self.next_sequence += 1;
    }

    /// Advance the clock and return every task that is now due, earliest
    /// first. Tasks with the same fire time come out in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<DeferredTask> {
        self.now += dt;
        let now = self.now;

        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|scheduled| {
            if scheduled.fire_at <= now + TIMER_EPSILON {
                due.push(scheduled.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.fire_at
                .total_cmp(&b.fire_at)
                .then(a.sequence.cmp(&b.sequence))
        });
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    /// Whether a removal is already queued for `agent`.
    pub fn is_removal_pending(&self, agent: AgentId) -> bool {
        self.pending
            .iter()
            .any(|s| s.task == DeferredTask::RemoveAgent { agent })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
