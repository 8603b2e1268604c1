use crate::position::*;
use crate::store::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub u32);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Hauler,
    Miner,
    Upgrader,
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Spawn,
    Extension,
    Container,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub name: String,
    pub role: AgentRole,
    pub pos: Position,
    pub store: Store,
    #[serde(default)]
    pub work_parts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileView {
    pub pos: Position,
    pub resource: ResourceType,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureView {
    pub structure_type: StructureType,
    pub pos: Position,
    pub store: Store,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceView {
    pub id: SourceId,
    pub pos: Position,
    pub energy: u32,
}

/// Read-only view of the world for a single tick. Every query made while
/// deciding a tick goes through this trait; nothing is cached between ticks.
pub trait WorldSnapshot {
    fn time(&self) -> u32;

    /// All live agents, ordered by ascending id.
    fn agents(&self) -> Vec<&AgentView>;

    fn agent(&self, id: AgentId) -> Option<&AgentView>;

    fn dropped_resources(&self, zone: ZoneId) -> Vec<&PileView>;

    fn structures(&self, zone: ZoneId) -> Vec<&StructureView>;

    fn source(&self, id: SourceId) -> Option<&SourceView>;

    fn sources(&self, zone: ZoneId) -> Vec<&SourceView>;

    fn is_walkable(&self, pos: &Position) -> bool;

    fn agents_by_role(&self, role: AgentRole) -> Vec<&AgentView> {
        self.agents().into_iter().filter(|a| a.role == role).collect()
    }

    fn structures_of_type(&self, zone: ZoneId, structure_type: StructureType) -> Vec<&StructureView> {
        self.structures(zone)
            .into_iter()
            .filter(|s| s.structure_type == structure_type)
            .collect()
    }

    fn dropped_resource_at(&self, pos: &Position, resource: ResourceType) -> Option<&PileView> {
        self.dropped_resources(pos.zone)
            .into_iter()
            .find(|p| p.pos == *pos && p.resource == resource)
    }

    fn structure_at(&self, pos: &Position) -> Option<&StructureView> {
        self.structures(pos.zone).into_iter().find(|s| s.pos == *pos)
    }

    /// The spawn every miner falls back to and the first dropoff in priority order.
    fn primary_spawn(&self, zone: ZoneId) -> Option<&StructureView> {
        self.structures_of_type(zone, StructureType::Spawn).into_iter().next()
    }
}

const SURROUNDING_SPOTS: [(i64, i64); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

/// Number of walkable tiles a miner could stand on to work `source`.
pub fn count_mining_spots(world: &dyn WorldSnapshot, source: &SourceView) -> usize {
    SURROUNDING_SPOTS
        .iter()
        .filter_map(|(dx, dy)| {
            let x = u32::try_from(source.pos.x as i64 + dx).ok()?;
            let y = u32::try_from(source.pos.y as i64 + dy).ok()?;

            Some(Position::new(x, y, source.pos.zone))
        })
        .filter(|pos| world.is_walkable(pos))
        .count()
}

/// Agents sorted the way every per-tick pass walks them.
pub fn ordered_agents<'a>(agents: impl IntoIterator<Item = &'a AgentView>) -> Vec<&'a AgentView> {
    agents.into_iter().sorted_by_key(|a| a.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryWorld;

    const ZONE: ZoneId = ZoneId(0);

    #[test]
    fn agents_are_walked_in_id_order() {
        let world = MemoryWorld::new()
            .with_agent(9, AgentRole::Hauler, Position::new(1, 1, ZONE), Store::new(50))
            .with_agent(2, AgentRole::Hauler, Position::new(2, 2, ZONE), Store::new(50))
            .with_agent(5, AgentRole::Miner, Position::new(3, 3, ZONE), Store::new(50));

        let ids: Vec<AgentId> = ordered_agents(world.agents()).iter().map(|a| a.id).collect();

        assert_eq!(ids, vec![AgentId(2), AgentId(5), AgentId(9)]);
    }

    #[test]
    fn structures_resolve_by_position_within_their_zone() {
        let spawn = Position::new(4, 4, ZONE);
        let world = MemoryWorld::new().with_structure(StructureType::Spawn, spawn, Store::new(300));

        assert_eq!(world.structure_at(&spawn).map(|s| s.pos), Some(spawn));
        assert!(world.structure_at(&Position::new(4, 4, ZoneId(1))).is_none());
        assert_eq!(world.primary_spawn(ZONE).map(|s| s.pos), Some(spawn));
    }
}
