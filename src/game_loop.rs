use crate::features::*;
use crate::jobs::actions::*;
use crate::jobs::jobsystem::*;
use crate::memorysystem::*;
use crate::transfer::transfersystem::*;
use crate::world::*;
use log::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub time: u32,
    /// Records removed because their agent is gone.
    pub dead_records: Vec<AgentId>,
    pub pools: TaskPoolSummary,
}

/// One tick: forget dead agents, build and hand out tasks, then step every
/// agent. Everything reads the same snapshot; requested actions only show up
/// in the next one.
pub fn tick(
    world: &dyn WorldSnapshot,
    actions: &mut dyn AgentActions,
    memory: &mut AgentMemory,
    features: &HaulFeatures,
) -> TickReport {
    let dead_records = memory.cleanup(world);

    let pools = HaulTaskManager::new(world, features).run(memory);

    RunJobSystem::run(world, features, memory, actions);

    TickReport {
        time: world.time(),
        dead_records,
        pools,
    }
}

/// Restores persisted records. Missing or unreadable data starts over with
/// empty memory.
pub fn load_memory(data: Option<&str>) -> AgentMemory {
    match data.map(str::trim) {
        None | Some("") => AgentMemory::new(),
        Some(data) => AgentMemory::decode(data).unwrap_or_else(|err| {
            error!("Failed deserialization: {}", err);

            AgentMemory::new()
        }),
    }
}

pub fn save_memory(memory: &AgentMemory) -> Option<String> {
    memory.encode().map_err(|err| error!("Failed serialization: {}", err)).ok()
}
