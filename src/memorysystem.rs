use crate::jobs::data::*;
use crate::serialize::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};
use shrinkwraprs::Shrinkwrap;
use std::collections::BTreeMap;

/// Persisted agent records keyed by agent id. Iteration order is ascending
/// id, which is the processing order of every per-tick pass.
#[derive(Shrinkwrap, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[shrinkwrap(mutable)]
#[serde(transparent)]
pub struct AgentMemory(pub BTreeMap<AgentId, AgentRecord>);

impl AgentMemory {
    pub fn new() -> AgentMemory {
        AgentMemory(BTreeMap::new())
    }

    /// Drops records of agents that no longer exist, returning their ids.
    pub fn cleanup(&mut self, world: &dyn WorldSnapshot) -> Vec<AgentId> {
        let dead: Vec<AgentId> = self.keys().filter(|id| world.agent(**id).is_none()).copied().collect();

        for id in &dead {
            if let Some(record) = self.remove(id) {
                info!("Clearing memory of dead agent {} - {}", id, record.summarize());
            }
        }

        dead
    }

    /// Number of miner records bound to `source`.
    pub fn assigned_miners(&self, source: SourceId) -> usize {
        self.values()
            .filter_map(|record| record.as_miner())
            .filter(|miner| miner.source() == source)
            .count()
    }

    pub fn encode(&self) -> Result<String, String> {
        encode_to_string(self)
    }

    pub fn decode(data: &str) -> Result<AgentMemory, String> {
        decode_from_string(data)
    }
}
