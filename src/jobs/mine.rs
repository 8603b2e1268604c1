use super::actions::*;
use super::context::*;
use super::jobsystem::*;
use super::utility::movebehavior::*;
use crate::machine_tick::*;
use crate::store::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MineState {
    TravelingToSource,
    Harvesting,
    ReturningEnergy,
}

impl MineState {
    fn tick(self, state_context: &MineJobContext, tick_context: &mut JobTickContext) -> Option<Transition<MineState>> {
        match self {
            MineState::TravelingToSource => tick_traveling_to_source(state_context, tick_context),
            MineState::Harvesting => tick_harvesting(state_context, tick_context),
            MineState::ReturningEnergy => tick_returning_energy(tick_context),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineJobContext {
    #[serde(rename = "s")]
    source: SourceId,
}

fn resolve_source<'a>(state_context: &MineJobContext, tick_context: &JobTickContext<'_, 'a, '_>) -> Option<&'a SourceView> {
    let source = tick_context.system_data.world.source(state_context.source);

    if source.is_none() {
        warn!(
            "[{}] Bound source {} no longer exists, idling",
            tick_context.runtime_data.owner.name, state_context.source
        );
    }

    source
}

fn tick_traveling_to_source(state_context: &MineJobContext, tick_context: &mut JobTickContext) -> Option<Transition<MineState>> {
    let source = resolve_source(state_context, tick_context)?;
    let owner = tick_context.runtime_data.owner;

    if owner.pos.is_near_to(&source.pos) {
        return Some(Transition::Deferred(MineState::Harvesting));
    }

    let result = tick_move_to_position(tick_context, source.pos, 1);

    if !result.is_ok() {
        warn!("[{}] Failed to move towards {}: {}", owner.name, source.id, result);
    }

    None
}

fn tick_harvesting(state_context: &MineJobContext, tick_context: &mut JobTickContext) -> Option<Transition<MineState>> {
    let source = resolve_source(state_context, tick_context)?;
    let owner = tick_context.runtime_data.owner;

    if !owner.pos.is_near_to(&source.pos) {
        return Some(Transition::Deferred(MineState::TravelingToSource));
    }

    if owner.store.is_full() && tick_context.system_data.hauler_count == 0 {
        info!("[{}] Full with no haulers around, returning energy", owner.name);

        return Some(Transition::Deferred(MineState::ReturningEnergy));
    }

    if !tick_context.action_flags.consume(SimultaneousActionFlags::HARVEST) {
        return None;
    }

    let result = tick_context.runtime_data.actions.harvest(owner.id, source.id);

    if !result.is_ok() {
        warn!("[{}] Can't harvest {}: {}", owner.name, source.id, result);
    }

    None
}

fn tick_returning_energy(tick_context: &mut JobTickContext) -> Option<Transition<MineState>> {
    let owner = tick_context.runtime_data.owner;

    if !owner.store.is_full() {
        return Some(Transition::Deferred(MineState::TravelingToSource));
    }

    let Some(spawn) = tick_context.system_data.world.primary_spawn(owner.pos.zone) else {
        warn!("[{}] No spawn in {} to return energy to", owner.name, owner.pos.zone);

        return None;
    };

    let spawn_pos = spawn.pos;

    if !owner.pos.is_near_to(&spawn_pos) {
        tick_move_to_position(tick_context, spawn_pos, 1);

        return None;
    }

    if !tick_context.action_flags.consume(SimultaneousActionFlags::TRANSFER) {
        return None;
    }

    let actions = &mut tick_context.runtime_data.actions;

    let result = actions.transfer(owner.id, TransferTarget::Structure(spawn_pos), ResourceType::Energy, None);

    if !result.is_ok() {
        warn!("[{}] Can't transfer to spawn: {}, dropping energy", owner.name, result);

        actions.drop_resource(owner.id, ResourceType::Energy, None);
    }

    None
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineJob {
    context: MineJobContext,
    state: MineState,
}

impl MineJob {
    pub fn new(source: SourceId) -> MineJob {
        MineJob::resume(source, MineState::TravelingToSource)
    }

    pub fn resume(source: SourceId, state: MineState) -> MineJob {
        MineJob {
            context: MineJobContext { source },
            state,
        }
    }

    pub fn source(&self) -> SourceId {
        self.context.source
    }

    pub fn state(&self) -> MineState {
        self.state
    }
}

impl Job for MineJob {
    fn summarize(&self) -> String {
        format!("Mine - {} - {:?}", self.context.source, self.state)
    }

    fn run_job(&mut self, system_data: &JobExecutionSystemData, runtime_data: &mut JobExecutionRuntimeData) {
        let owner = runtime_data.owner;

        let mut tick_context = JobTickContext {
            system_data,
            runtime_data,
            action_flags: SimultaneousActionFlags::UNSET,
        };

        let context = &self.context;

        run_state_machine(&mut self.state, &owner.name, |state| state.tick(context, &mut tick_context));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::*;
    use crate::position::*;

    const ZONE: ZoneId = ZoneId(0);

    fn pos(x: u32, y: u32) -> Position {
        Position::new(x, y, ZONE)
    }

    fn step(job: &mut MineJob, world: &MemoryWorld, actions: &mut ActionQueue) {
        let features = HaulFeatures::default();
        let system_data = JobExecutionSystemData {
            world,
            features: &features,
            hauler_count: world.agents_by_role(AgentRole::Hauler).len(),
        };

        let owner = world.agent(AgentId(1)).unwrap();
        let mut runtime_data = JobExecutionRuntimeData { owner, actions };

        job.run_job(&system_data, &mut runtime_data);
    }

    fn mining_world(miner_pos: Position, carried: u32) -> MemoryWorld {
        MemoryWorld::new()
            .with_agent(1, AgentRole::Miner, miner_pos, Store::with(50, ResourceType::Energy, carried))
            .with_source(7, pos(10, 10), 3000)
            .with_structure(StructureType::Spawn, pos(25, 25), Store::new(300))
    }

    #[test]
    fn travels_until_adjacent() {
        let mut job = MineJob::new(SourceId(7));
        let mut actions = ActionQueue::new();

        step(&mut job, &mining_world(pos(15, 10), 0), &mut actions);

        assert_eq!(job.state(), MineState::TravelingToSource);
        assert_eq!(
            actions.requests(),
            &[ActionRequest::MoveTo {
                agent: AgentId(1),
                target: pos(10, 10),
                range: 1,
            }]
        );

        step(&mut job, &mining_world(pos(11, 11), 0), &mut actions);

        assert_eq!(job.state(), MineState::Harvesting);
    }

    #[test]
    fn harvests_when_adjacent() {
        let mut job = MineJob::resume(SourceId(7), MineState::Harvesting);
        let mut actions = ActionQueue::new();

        step(&mut job, &mining_world(pos(11, 10), 10), &mut actions);

        assert_eq!(job.state(), MineState::Harvesting);
        assert_eq!(
            actions.requests(),
            &[ActionRequest::Harvest {
                agent: AgentId(1),
                source: SourceId(7),
            }]
        );
    }

    #[test]
    fn knocked_away_miner_travels_back() {
        let mut job = MineJob::resume(SourceId(7), MineState::Harvesting);
        let mut actions = ActionQueue::new();

        step(&mut job, &mining_world(pos(14, 10), 10), &mut actions);

        assert_eq!(job.state(), MineState::TravelingToSource);
    }

    #[test]
    fn full_miner_keeps_harvesting_when_haulers_exist() {
        let world = mining_world(pos(11, 10), 50).with_agent(2, AgentRole::Hauler, pos(30, 30), Store::new(50));
        let mut job = MineJob::resume(SourceId(7), MineState::Harvesting);
        let mut actions = ActionQueue::new();

        step(&mut job, &world, &mut actions);

        assert_eq!(job.state(), MineState::Harvesting);
    }

    #[test]
    fn returning_miner_delivers_or_drops() {
        let mut job = MineJob::resume(SourceId(7), MineState::ReturningEnergy);
        let mut actions = ActionQueue::new();
        actions.transfer_result = ActionResult::Full;

        step(&mut job, &mining_world(pos(24, 25), 50), &mut actions);

        assert_eq!(job.state(), MineState::ReturningEnergy);
        assert_eq!(
            actions.requests(),
            &[
                ActionRequest::Transfer {
                    from: AgentId(1),
                    target: TransferTarget::Structure(pos(25, 25)),
                    resource: ResourceType::Energy,
                    amount: None,
                },
                ActionRequest::Drop {
                    agent: AgentId(1),
                    resource: ResourceType::Energy,
                    amount: None,
                },
            ]
        );
    }

    #[test]
    fn missing_source_idles() {
        let world = MemoryWorld::new().with_agent(1, AgentRole::Miner, pos(11, 10), Store::new(50));
        let mut job = MineJob::new(SourceId(7));
        let mut actions = ActionQueue::new();

        step(&mut job, &world, &mut actions);

        assert_eq!(job.state(), MineState::TravelingToSource);
        assert!(actions.requests().is_empty());
    }
}
