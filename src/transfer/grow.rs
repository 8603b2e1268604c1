use super::task::*;
use crate::store::*;
use crate::world::*;
use log::*;

/// Re-derives a held task from the current snapshot: how much can still be
/// moved between `hauler` and the target, and where the target is now.
pub struct TaskGrower<'a> {
    world: &'a dyn WorldSnapshot,
    hauler: &'a AgentView,
}

impl<'a> TaskGrower<'a> {
    pub fn new(world: &'a dyn WorldSnapshot, hauler: &'a AgentView) -> TaskGrower<'a> {
        TaskGrower { world, hauler }
    }

    pub fn grow(&self, task: &HaulTask) -> Result<HaulTask, TaskError> {
        match task.kind {
            TaskKind::DroppedPile => Ok(self.grow_dropped_task(task)),
            TaskKind::AgentCarrier(agent) => self.grow_agent_task(task, agent),
            TaskKind::Structure => self.grow_structure_task(task),
        }
    }

    fn grow_dropped_task(&self, task: &HaulTask) -> HaulTask {
        match self.world.dropped_resource_at(&task.anchor, task.resource) {
            Some(pile) => task.with_quantity(pile.amount.min(self.hauler.store.get_free_capacity())),
            None => {
                warn!(
                    "[{}] Can't find resource pile to grow dropped resource task at {}",
                    self.hauler.name, task.anchor
                );

                *task
            }
        }
    }

    fn grow_agent_task(&self, task: &HaulTask, agent: AgentId) -> Result<HaulTask, TaskError> {
        let target = self.world.agent(agent).ok_or(TaskError::AgentVanished(agent))?;

        let quantity = self.transferable(task, &target.store);

        Ok(HaulTask {
            anchor: target.pos,
            quantity,
            ..*task
        })
    }

    fn grow_structure_task(&self, task: &HaulTask) -> Result<HaulTask, TaskError> {
        let structure = self
            .world
            .structure_at(&task.anchor)
            .ok_or(TaskError::StructureVanished(task.anchor))?;

        Ok(task.with_quantity(self.transferable(task, &structure.store)))
    }

    fn transferable(&self, task: &HaulTask, target: &Store) -> u32 {
        let own = &self.hauler.store;

        match task.direction {
            TaskDirection::Pickup => target.get_used_capacity(Some(task.resource)).min(own.get_free_capacity()),
            TaskDirection::Dropoff => target.get_free_capacity().min(own.get_used_capacity(Some(task.resource))),
        }
    }
}
