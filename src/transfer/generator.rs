use super::task::*;
use crate::features::*;
use crate::store::*;
use crate::world::*;

/// Every task the world currently offers, before in-flight claims are removed.
#[derive(Debug, Clone, Default)]
pub struct GeneratedTasks {
    pub pickups: Vec<HaulTask>,
    /// Ordered by priority: primary spawn, extensions, containers, consuming agents.
    pub dropoffs: Vec<HaulTask>,
}

pub struct TaskGenerator<'a> {
    world: &'a dyn WorldSnapshot,
    features: &'a HaulFeatures,
}

impl<'a> TaskGenerator<'a> {
    pub fn new(world: &'a dyn WorldSnapshot, features: &'a HaulFeatures) -> TaskGenerator<'a> {
        TaskGenerator { world, features }
    }

    pub fn generate(&self) -> GeneratedTasks {
        GeneratedTasks {
            pickups: self.generate_pickup_tasks(),
            dropoffs: self.generate_dropoff_tasks(),
        }
    }

    pub fn generate_pickup_tasks(&self) -> Vec<HaulTask> {
        let mut tasks = Vec::new();

        for zone in &self.features.monitored_zones {
            for pile in self.world.dropped_resources(*zone) {
                if pile.amount > 0 {
                    tasks.push(HaulTask::pickup(TaskKind::DroppedPile, pile.pos, pile.resource, pile.amount));
                }
            }
        }

        for miner in self.world.agents_by_role(AgentRole::Miner) {
            let carried = miner.store.get_used_capacity(Some(ResourceType::Energy));

            if carried > 0 {
                tasks.push(HaulTask::pickup(
                    TaskKind::AgentCarrier(miner.id),
                    miner.pos,
                    ResourceType::Energy,
                    carried,
                ));
            }
        }

        tasks
    }

    pub fn generate_dropoff_tasks(&self) -> Vec<HaulTask> {
        let mut tasks = Vec::new();

        let primary_spawn = self.world.primary_spawn(self.features.primary_zone);

        if let Some(spawn) = primary_spawn {
            push_structure_dropoff(&mut tasks, spawn);
        }

        for structure_type in [StructureType::Extension, StructureType::Container] {
            for zone in &self.features.monitored_zones {
                for structure in self.world.structures_of_type(*zone, structure_type) {
                    push_structure_dropoff(&mut tasks, structure);
                }
            }
        }

        for upgrader in self.world.agents_by_role(AgentRole::Upgrader) {
            let free = upgrader.store.get_free_capacity();

            if free > 0 {
                tasks.push(HaulTask::dropoff(
                    TaskKind::AgentCarrier(upgrader.id),
                    upgrader.pos,
                    ResourceType::Energy,
                    free,
                ));
            }
        }

        tasks
    }
}

fn push_structure_dropoff(tasks: &mut Vec<HaulTask>, structure: &StructureView) {
    let free = structure.store.get_free_capacity();

    if free > 0 {
        tasks.push(HaulTask::dropoff(TaskKind::Structure, structure.pos, ResourceType::Energy, free));
    }
}
