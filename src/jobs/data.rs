use super::haul::*;
use super::jobsystem::*;
use super::mine::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// The persisted record of one agent. Each role carries only what it needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AgentRecord {
    #[serde(rename = "h")]
    Hauler(HaulJob),
    #[serde(rename = "m")]
    Miner(MineJob),
}

impl AgentRecord {
    pub fn hauler() -> AgentRecord {
        AgentRecord::Hauler(HaulJob::new())
    }

    pub fn miner(source: SourceId) -> AgentRecord {
        AgentRecord::Miner(MineJob::new(source))
    }

    pub fn role(&self) -> AgentRole {
        match self {
            AgentRecord::Hauler(_) => AgentRole::Hauler,
            AgentRecord::Miner(_) => AgentRole::Miner,
        }
    }

    pub fn summarize(&self) -> String {
        match self {
            AgentRecord::Hauler(ref data) => data.summarize(),
            AgentRecord::Miner(ref data) => data.summarize(),
        }
    }

    pub fn as_job(&mut self) -> &mut dyn Job {
        match self {
            AgentRecord::Hauler(ref mut data) => data,
            AgentRecord::Miner(ref mut data) => data,
        }
    }

    pub fn as_hauler(&self) -> Option<&HaulJob> {
        match self {
            AgentRecord::Hauler(ref data) => Some(data),
            _ => None,
        }
    }

    pub fn as_hauler_mut(&mut self) -> Option<&mut HaulJob> {
        match self {
            AgentRecord::Hauler(ref mut data) => Some(data),
            _ => None,
        }
    }

    pub fn as_miner(&self) -> Option<&MineJob> {
        match self {
            AgentRecord::Miner(ref data) => Some(data),
            _ => None,
        }
    }
}
