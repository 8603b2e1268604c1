use super::snapshot::*;
use crate::position::*;
use crate::store::*;
use serde::{Deserialize, Serialize};

/// Plain-data snapshot. Loaded from JSON by the bench, built directly by tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryWorld {
    #[serde(default)]
    pub time: u32,
    #[serde(default)]
    pub agents: Vec<AgentView>,
    #[serde(default)]
    pub piles: Vec<PileView>,
    #[serde(default)]
    pub structures: Vec<StructureView>,
    #[serde(default)]
    pub sources: Vec<SourceView>,
    #[serde(default)]
    pub walls: Vec<Position>,
}

impl MemoryWorld {
    pub fn new() -> MemoryWorld {
        MemoryWorld::default()
    }

    pub fn from_json(data: &str) -> Result<MemoryWorld, String> {
        serde_json::from_str(data).map_err(|e| e.to_string())
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }

    pub fn with_agent(mut self, id: u32, role: AgentRole, pos: Position, store: Store) -> MemoryWorld {
        let name = match role {
            AgentRole::Hauler => format!("Hauler_{}", id),
            AgentRole::Miner => format!("Miner_{}", id),
            AgentRole::Upgrader => format!("Upgrader_{}", id),
        };

        let work_parts = match role {
            AgentRole::Hauler => 0,
            AgentRole::Miner | AgentRole::Upgrader => 1,
        };

        self.agents.push(AgentView {
            id: AgentId(id),
            name,
            role,
            pos,
            store,
            work_parts,
        });

        self
    }

    pub fn with_pile(mut self, pos: Position, amount: u32) -> MemoryWorld {
        self.piles.push(PileView {
            pos,
            resource: ResourceType::Energy,
            amount,
        });

        self
    }

    pub fn with_structure(mut self, structure_type: StructureType, pos: Position, store: Store) -> MemoryWorld {
        self.structures.push(StructureView { structure_type, pos, store });

        self
    }

    pub fn with_source(mut self, id: u32, pos: Position, energy: u32) -> MemoryWorld {
        self.sources.push(SourceView {
            id: SourceId(id),
            pos,
            energy,
        });

        self
    }

    pub fn with_wall(mut self, pos: Position) -> MemoryWorld {
        self.walls.push(pos);

        self
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentView> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn structure_at_mut(&mut self, pos: &Position) -> Option<&mut StructureView> {
        self.structures.iter_mut().find(|s| s.pos == *pos)
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut SourceView> {
        self.sources.iter_mut().find(|s| s.id == id)
    }

    /// Adds to the pile at `pos`, creating it if needed.
    pub fn drop_resource(&mut self, pos: Position, resource: ResourceType, amount: u32) {
        if amount == 0 {
            return;
        }

        if let Some(pile) = self.piles.iter_mut().find(|p| p.pos == pos && p.resource == resource) {
            pile.amount += amount;
        } else {
            self.piles.push(PileView { pos, resource, amount });
        }
    }

    /// Removes up to `amount` from the pile at `pos`, deleting emptied piles.
    pub fn take_from_pile(&mut self, pos: &Position, resource: ResourceType, amount: u32) -> u32 {
        let mut taken = 0;

        if let Some(pile) = self.piles.iter_mut().find(|p| p.pos == *pos && p.resource == resource) {
            taken = pile.amount.min(amount);
            pile.amount -= taken;
        }

        self.piles.retain(|p| p.amount > 0);

        taken
    }
}

impl WorldSnapshot for MemoryWorld {
    fn time(&self) -> u32 {
        self.time
    }

    fn agents(&self) -> Vec<&AgentView> {
        ordered_agents(&self.agents)
    }

    fn agent(&self, id: AgentId) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.id == id)
    }

    fn dropped_resources(&self, zone: ZoneId) -> Vec<&PileView> {
        self.piles.iter().filter(|p| p.pos.zone == zone && p.amount > 0).collect()
    }

    fn structures(&self, zone: ZoneId) -> Vec<&StructureView> {
        self.structures.iter().filter(|s| s.pos.zone == zone).collect()
    }

    fn source(&self, id: SourceId) -> Option<&SourceView> {
        self.sources.iter().find(|s| s.id == id)
    }

    fn sources(&self, zone: ZoneId) -> Vec<&SourceView> {
        self.sources.iter().filter(|s| s.pos.zone == zone).collect()
    }

    fn is_walkable(&self, pos: &Position) -> bool {
        pos.x < 50 && pos.y < 50 && !self.walls.contains(pos)
    }
}
