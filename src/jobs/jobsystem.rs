use super::actions::*;
use crate::features::*;
use crate::memorysystem::*;
use crate::world::*;
use log::*;

pub struct JobExecutionSystemData<'a> {
    pub world: &'a dyn WorldSnapshot,
    pub features: &'a HaulFeatures,
    pub hauler_count: usize,
}

pub struct JobExecutionRuntimeData<'a> {
    pub owner: &'a AgentView,
    pub actions: &'a mut dyn AgentActions,
}

pub trait Job {
    fn summarize(&self) -> String;

    fn run_job(&mut self, system_data: &JobExecutionSystemData, runtime_data: &mut JobExecutionRuntimeData);
}

/// Steps every agent that has a record: miners first, then haulers, each
/// group in ascending id order.
pub struct RunJobSystem;

impl RunJobSystem {
    pub fn run(world: &dyn WorldSnapshot, features: &HaulFeatures, memory: &mut AgentMemory, actions: &mut dyn AgentActions) {
        let system_data = JobExecutionSystemData {
            world,
            features,
            hauler_count: world.agents_by_role(AgentRole::Hauler).len(),
        };

        for role in [AgentRole::Miner, AgentRole::Hauler] {
            for (id, record) in memory.iter_mut().filter(|(_, record)| record.role() == role) {
                let Some(owner) = world.agent(*id) else {
                    debug!("Skipping record for missing agent {}", id);
                    continue;
                };

                let mut runtime_data = JobExecutionRuntimeData {
                    owner,
                    actions: &mut *actions,
                };

                record.as_job().run_job(&system_data, &mut runtime_data);
            }
        }
    }
}
