use super::generator::*;
use super::grow::*;
use super::task::*;
use crate::features::*;
use crate::jobs::utility::haulbehavior::*;
use crate::memorysystem::*;
use crate::world::*;
use itertools::Itertools;
use log::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolTotals {
    pub tasks: usize,
    pub quantity: u32,
}

impl PoolTotals {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a HaulTask>) -> PoolTotals {
        tasks.into_iter().fold(PoolTotals::default(), |totals, task| totals.with(task))
    }

    fn with(self, task: &HaulTask) -> PoolTotals {
        PoolTotals {
            tasks: self.tasks + 1,
            quantity: self.quantity.saturating_add(task.quantity),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSummary {
    /// Fresh from the generator.
    pub generated: PoolTotals,
    /// Grown tasks of haulers already in flight.
    pub claimed: PoolTotals,
    /// What was left for waiting haulers.
    pub available: PoolTotals,
    pub assigned: PoolTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskPoolSummary {
    pub pickup: DirectionSummary,
    pub dropoff: DirectionSummary,
}

/// Grown tasks of every active hauler, split by direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    pub pickups: Vec<HaulTask>,
    pub dropoffs: Vec<HaulTask>,
}

/// Shrinks each generated task by every claim on it and drops what is fully
/// consumed. Order of `tasks` is preserved.
pub fn subtract_claims(tasks: Vec<HaulTask>, claims: &[HaulTask]) -> Vec<HaulTask> {
    tasks
        .into_iter()
        .filter_map(|task| claims.iter().try_fold(task, |remaining, claim| remaining.difference(claim)))
        .filter(|task| !task.is_dead())
        .collect()
}

/// Builds the claimable pools each tick and hands them out greedily to
/// haulers waiting for a task.
pub struct HaulTaskManager<'a> {
    world: &'a dyn WorldSnapshot,
    features: &'a HaulFeatures,
}

impl<'a> HaulTaskManager<'a> {
    pub fn new(world: &'a dyn WorldSnapshot, features: &'a HaulFeatures) -> HaulTaskManager<'a> {
        HaulTaskManager { world, features }
    }

    pub fn run(&self, memory: &mut AgentMemory) -> TaskPoolSummary {
        let claims = self.grow_claims(memory);

        let generated = TaskGenerator::new(self.world, self.features).generate();

        let mut summary = TaskPoolSummary {
            pickup: DirectionSummary {
                generated: PoolTotals::of(&generated.pickups),
                claimed: PoolTotals::of(&claims.pickups),
                ..Default::default()
            },
            dropoff: DirectionSummary {
                generated: PoolTotals::of(&generated.dropoffs),
                claimed: PoolTotals::of(&claims.dropoffs),
                ..Default::default()
            },
        };

        let mut pickups = subtract_claims(generated.pickups, &claims.pickups);
        let mut dropoffs = subtract_claims(generated.dropoffs, &claims.dropoffs);

        summary.pickup.available = PoolTotals::of(&pickups);
        summary.dropoff.available = PoolTotals::of(&dropoffs);

        if self.features.log_task_pools {
            log_pool("Pickup", &pickups);
            log_pool("Dropoff", &dropoffs);
        }

        let (assigned_pickups, assigned_dropoffs) = self.assign(memory, &mut pickups, &mut dropoffs);

        summary.pickup.assigned = PoolTotals::of(&assigned_pickups);
        summary.dropoff.assigned = PoolTotals::of(&assigned_dropoffs);

        summary
    }

    /// Regrows the task of every hauler that is not waiting. A claim that can
    /// no longer be resolved is left out; its hauler abandons it on its own step.
    pub fn grow_claims(&self, memory: &AgentMemory) -> Claims {
        let mut claims = Claims::default();

        for (id, job) in memory.iter().filter_map(|(id, record)| record.as_hauler().map(|job| (id, job))) {
            if job.is_waiting() {
                continue;
            }

            let Some(task) = job.current_task() else {
                continue;
            };

            let Some(hauler) = self.world.agent(*id) else {
                continue;
            };

            match TaskGrower::new(self.world, hauler).grow(task) {
                Ok(grown) if grown.is_dead() => {
                    debug!("[{}] Claim on {} has nothing left", hauler.name, grown);
                }
                Ok(grown) => match grown.direction {
                    TaskDirection::Pickup => claims.pickups.push(grown),
                    TaskDirection::Dropoff => claims.dropoffs.push(grown),
                },
                Err(err) => {
                    info!("[{}] Dropping claim on {}: {}", hauler.name, task, err);
                }
            }
        }

        claims
    }

    /// Walks waiting haulers in ascending id order; each takes the most
    /// valuable task left in its pool.
    fn assign(
        &self,
        memory: &mut AgentMemory,
        pickups: &mut Vec<HaulTask>,
        dropoffs: &mut Vec<HaulTask>,
    ) -> (Vec<HaulTask>, Vec<HaulTask>) {
        let mut assigned_pickups = Vec::new();
        let mut assigned_dropoffs = Vec::new();

        for (id, job) in memory.iter_mut().filter_map(|(id, record)| record.as_hauler_mut().map(|job| (id, job))) {
            let Some(direction) = job.waiting_for() else {
                continue;
            };

            let Some(hauler) = self.world.agent(*id) else {
                continue;
            };

            let chosen = match direction {
                TaskDirection::Pickup => choose_pickup_task(hauler, pickups, self.features),
                TaskDirection::Dropoff => choose_dropoff_task(hauler, dropoffs, self.features),
            };

            let Some(task) = chosen else {
                trace!("[{}] No {} task available", hauler.name, direction);
                continue;
            };

            if job.assign(task) {
                info!("[{}] Assigned {}", hauler.name, task);

                match direction {
                    TaskDirection::Pickup => assigned_pickups.push(task),
                    TaskDirection::Dropoff => assigned_dropoffs.push(task),
                }
            }
        }

        (assigned_pickups, assigned_dropoffs)
    }
}

fn log_pool(label: &str, tasks: &[HaulTask]) {
    debug!(
        "{} pool ({}): {}",
        label,
        tasks.len(),
        tasks.iter().map(|task| task.to_string()).join(", ")
    );
}
