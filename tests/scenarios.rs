use screeps_haul::features::*;
use screeps_haul::game_loop;
use screeps_haul::jobs::actions::*;
use screeps_haul::jobs::data::*;
use screeps_haul::jobs::haul::*;
use screeps_haul::jobs::mine::*;
use screeps_haul::memorysystem::*;
use screeps_haul::position::*;
use screeps_haul::store::*;
use screeps_haul::transfer::task::*;
use screeps_haul::world::*;
use std::collections::HashSet;

const ZONE: ZoneId = ZoneId(0);

fn pos(x: u32, y: u32) -> Position {
    Position::new(x, y, ZONE)
}

fn hauler_job(memory: &AgentMemory, id: u32) -> HaulJob {
    memory
        .get(&AgentId(id))
        .and_then(|record| record.as_hauler())
        .cloned()
        .expect("hauler record")
}

fn miner_state(memory: &AgentMemory, id: u32) -> MineState {
    memory
        .get(&AgentId(id))
        .and_then(|record| record.as_miner())
        .map(|job| job.state())
        .expect("miner record")
}

fn run_tick(world: &MemoryWorld, memory: &mut AgentMemory) -> (game_loop::TickReport, Vec<ActionRequest>) {
    let features = HaulFeatures::default();
    let mut actions = ActionQueue::new();

    let report = game_loop::tick(world, &mut actions, memory, &features);

    (report, actions.take())
}

fn assert_state_task_coupling(memory: &AgentMemory) {
    for (id, record) in memory.iter() {
        if let Some(job) = record.as_hauler() {
            assert_eq!(
                job.is_waiting(),
                job.current_task().is_none(),
                "agent {} is {:?} with task {:?}",
                id,
                job.state(),
                job.current_task()
            );
        }
    }
}

#[test]
fn idle_hauler_starts_traveling_in_the_tick_it_is_assigned() {
    let world = MemoryWorld::new()
        .with_agent(1, AgentRole::Hauler, pos(10, 10), Store::new(50))
        .with_pile(pos(13, 10), 50)
        .with_structure(StructureType::Spawn, pos(11, 11), Store::with(300, ResourceType::Energy, 280));

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(1), AgentRecord::hauler());

    let (report, requests) = run_tick(&world, &mut memory);

    let job = hauler_job(&memory, 1);

    assert_eq!(job.state(), HaulState::TravelingToPickup);
    assert_eq!(
        job.current_task(),
        Some(&HaulTask::pickup(TaskKind::DroppedPile, pos(13, 10), ResourceType::Energy, 50))
    );
    assert_eq!(
        requests,
        vec![ActionRequest::MoveTo {
            agent: AgentId(1),
            target: pos(13, 10),
            range: 1,
        }]
    );
    assert_eq!(report.pools.dropoff.available.quantity, 20);
    assert_eq!(report.pools.dropoff.assigned.tasks, 0);
}

#[test]
fn competing_haulers_get_one_task_in_id_order() {
    let world = MemoryWorld::new()
        .with_agent(8, AgentRole::Hauler, pos(12, 10), Store::new(50))
        .with_agent(3, AgentRole::Hauler, pos(30, 30), Store::new(50))
        .with_pile(pos(20, 20), 40);

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(8), AgentRecord::hauler());
    memory.insert(AgentId(3), AgentRecord::hauler());

    run_tick(&world, &mut memory);

    assert_eq!(hauler_job(&memory, 3).state(), HaulState::TravelingToPickup);
    assert_eq!(hauler_job(&memory, 8).state(), HaulState::WaitingForPickup);
    assert_eq!(hauler_job(&memory, 8).current_task(), None);
    assert_state_task_coupling(&memory);
}

#[test]
fn tasks_are_never_assigned_twice_or_empty() {
    let world = MemoryWorld::new()
        .with_agent(1, AgentRole::Hauler, pos(10, 10), Store::new(50))
        .with_agent(2, AgentRole::Hauler, pos(11, 10), Store::new(50))
        .with_agent(3, AgentRole::Hauler, pos(12, 10), Store::new(50))
        .with_agent(4, AgentRole::Miner, pos(40, 40), Store::new(50))
        .with_pile(pos(20, 20), 30)
        .with_pile(pos(5, 5), 10);

    let mut memory = AgentMemory::new();
    for id in 1..=3 {
        memory.insert(AgentId(id), AgentRecord::hauler());
    }

    let (report, _) = run_tick(&world, &mut memory);

    let tasks: Vec<HaulTask> = (1..=3).filter_map(|id| hauler_job(&memory, id).current_task().copied()).collect();
    let anchors: HashSet<Position> = tasks.iter().map(|task| task.anchor).collect();

    assert_eq!(tasks.len(), 2);
    assert_eq!(anchors.len(), 2);
    assert!(tasks.iter().all(|task| task.quantity > 0));
    assert_eq!(report.pools.pickup.assigned.quantity, 40);
    assert_state_task_coupling(&memory);
}

#[test]
fn despawned_carrier_sends_hauler_back_to_waiting() {
    let carrier_task = HaulTask::pickup(TaskKind::AgentCarrier(AgentId(2)), pos(20, 20), ResourceType::Energy, 30);

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(1), AgentRecord::Hauler(HaulJob::resume(HaulState::TravelingToPickup, Some(carrier_task))));
    memory.insert(AgentId(2), AgentRecord::miner(SourceId(1)));

    // The carrier is gone from this snapshot.
    let world = MemoryWorld::new()
        .with_agent(1, AgentRole::Hauler, pos(10, 10), Store::new(50))
        .with_source(1, pos(21, 21), 3000);

    let (report, requests) = run_tick(&world, &mut memory);

    let job = hauler_job(&memory, 1);

    assert_eq!(report.dead_records, vec![AgentId(2)]);
    assert_eq!(report.pools.pickup.claimed.tasks, 0);
    assert_eq!(job.state(), HaulState::WaitingForPickup);
    assert_eq!(job.current_task(), None);
    assert!(requests.is_empty());
}

#[test]
fn agent_dropoff_is_released_within_the_tick() {
    let upgrader_task = HaulTask::dropoff(TaskKind::AgentCarrier(AgentId(3)), pos(11, 10), ResourceType::Energy, 50);

    let world = MemoryWorld::new()
        .with_agent(1, AgentRole::Hauler, pos(10, 10), Store::with(50, ResourceType::Energy, 50))
        .with_agent(3, AgentRole::Upgrader, pos(11, 10), Store::new(50))
        .with_structure(StructureType::Spawn, pos(40, 40), Store::new(300));

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(1), AgentRecord::Hauler(HaulJob::resume(HaulState::DroppingOff, Some(upgrader_task))));

    run_tick(&world, &mut memory);

    let job = hauler_job(&memory, 1);

    assert_eq!(job.state(), HaulState::WaitingForDropoff);
    assert_eq!(job.current_task(), None);
}

#[test]
fn stale_pile_is_dropped_and_reassigned_next_tick() {
    let mut memory = AgentMemory::new();
    memory.insert(
        AgentId(1),
        AgentRecord::Hauler(HaulJob::resume(
            HaulState::TravelingToPickup,
            Some(HaulTask::pickup(TaskKind::DroppedPile, pos(30, 30), ResourceType::Energy, 40)),
        )),
    );

    let world = MemoryWorld::new()
        .with_agent(1, AgentRole::Hauler, pos(10, 10), Store::new(50))
        .with_pile(pos(12, 12), 40);

    let (_, requests) = run_tick(&world, &mut memory);

    assert_eq!(hauler_job(&memory, 1).state(), HaulState::WaitingForPickup);
    assert!(requests.is_empty());

    run_tick(&world, &mut memory);

    assert_eq!(
        hauler_job(&memory, 1).current_task(),
        Some(&HaulTask::pickup(TaskKind::DroppedPile, pos(12, 12), ResourceType::Energy, 40))
    );
}

#[test]
fn lone_miner_returns_energy_then_goes_back() {
    let source = pos(10, 10);
    let spawn = pos(25, 25);

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(1), AgentRecord::Miner(MineJob::resume(SourceId(1), MineState::Harvesting)));

    let full_at_source = MemoryWorld::new()
        .with_agent(1, AgentRole::Miner, pos(11, 11), Store::with(50, ResourceType::Energy, 50))
        .with_source(1, source, 3000)
        .with_structure(StructureType::Spawn, spawn, Store::new(300));

    run_tick(&full_at_source, &mut memory);

    assert_eq!(miner_state(&memory, 1), MineState::ReturningEnergy);

    let full_at_spawn = MemoryWorld::new()
        .with_agent(1, AgentRole::Miner, pos(24, 24), Store::with(50, ResourceType::Energy, 50))
        .with_source(1, source, 3000)
        .with_structure(StructureType::Spawn, spawn, Store::new(300));

    let (_, requests) = run_tick(&full_at_spawn, &mut memory);

    assert_eq!(miner_state(&memory, 1), MineState::ReturningEnergy);
    assert_eq!(
        requests,
        vec![ActionRequest::Transfer {
            from: AgentId(1),
            target: TransferTarget::Structure(spawn),
            resource: ResourceType::Energy,
            amount: None,
        }]
    );

    let emptied = MemoryWorld::new()
        .with_agent(1, AgentRole::Miner, pos(24, 24), Store::new(50))
        .with_source(1, source, 3000)
        .with_structure(StructureType::Spawn, spawn, Store::with(300, ResourceType::Energy, 50));

    run_tick(&emptied, &mut memory);

    assert_eq!(miner_state(&memory, 1), MineState::TravelingToSource);
}

#[test]
fn loaded_miner_is_offered_to_haulers() {
    let world = MemoryWorld::new()
        .with_agent(1, AgentRole::Miner, pos(11, 10), Store::with(50, ResourceType::Energy, 20))
        .with_agent(2, AgentRole::Hauler, pos(15, 10), Store::new(100))
        .with_source(1, pos(10, 10), 3000);

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(1), AgentRecord::Miner(MineJob::resume(SourceId(1), MineState::Harvesting)));
    memory.insert(AgentId(2), AgentRecord::hauler());

    let (_, requests) = run_tick(&world, &mut memory);

    assert_eq!(
        hauler_job(&memory, 2).current_task(),
        Some(&HaulTask::pickup(TaskKind::AgentCarrier(AgentId(1)), pos(11, 10), ResourceType::Energy, 20))
    );
    // Miners step first.
    assert_eq!(
        requests,
        vec![
            ActionRequest::Harvest {
                agent: AgentId(1),
                source: SourceId(1),
            },
            ActionRequest::MoveTo {
                agent: AgentId(2),
                target: pos(11, 10),
                range: 1,
            },
        ]
    );
}

/// Applies moves and pickups/transfers so a hauler can run a full cycle.
fn advance(world: &mut MemoryWorld, requests: Vec<ActionRequest>) {
    for request in requests {
        match request {
            ActionRequest::MoveTo { agent, target, .. } => {
                if let Some(agent) = world.agent_mut(agent) {
                    agent.pos = agent.pos.step_towards(&target);
                }
            }
            ActionRequest::Pickup { agent, pile } => {
                let free = world.agent(agent).map(|a| a.store.get_free_capacity()).unwrap_or(0);
                let taken = world.take_from_pile(&pile, ResourceType::Energy, free);

                if let Some(agent) = world.agent_mut(agent) {
                    agent.store.add(ResourceType::Energy, taken);
                }
            }
            ActionRequest::Transfer {
                from,
                target: TransferTarget::Structure(pos),
                resource,
                ..
            } => {
                let free = world.structure_at(&pos).map(|s| s.store.get_free_capacity()).unwrap_or(0);
                let moved = world.agent_mut(from).map(|a| a.store.remove(resource, free)).unwrap_or(0);

                if let Some(structure) = world.structure_at_mut(&pos) {
                    structure.store.add(resource, moved);
                }
            }
            _ => {}
        }
    }

    world.time += 1;
}

#[test]
fn hauler_completes_a_delivery_cycle() {
    let spawn = pos(25, 25);

    let mut world = MemoryWorld::new()
        .with_agent(1, AgentRole::Hauler, pos(20, 20), Store::new(50))
        .with_pile(pos(16, 20), 50)
        .with_structure(StructureType::Spawn, spawn, Store::with(300, ResourceType::Energy, 100));

    let mut memory = AgentMemory::new();
    memory.insert(AgentId(1), AgentRecord::hauler());

    let mut visited = Vec::new();

    for _ in 0..30 {
        let (_, requests) = run_tick(&world, &mut memory);

        assert_state_task_coupling(&memory);
        visited.push(hauler_job(&memory, 1).state());

        advance(&mut world, requests);
    }

    for state in [
        HaulState::TravelingToPickup,
        HaulState::PickingUp,
        HaulState::WaitingForDropoff,
        HaulState::TravelingToDropoff,
        HaulState::DroppingOff,
        HaulState::WaitingForPickup,
    ] {
        assert!(visited.contains(&state), "never reached {:?}: {:?}", state, visited);
    }

    assert_eq!(world.structure_at(&spawn).map(|s| s.store.get_used_capacity(None)), Some(150));
    assert!(world.dropped_resources(ZONE).is_empty());
}
