use clap::Parser;
use log::*;
use screeps_haul::features::*;
use screeps_haul::game_loop;
use screeps_haul::jobs::actions::*;
use screeps_haul::jobs::data::*;
use screeps_haul::memorysystem::*;
use screeps_haul::position::*;
use screeps_haul::store::*;
use screeps_haul::world::*;
use std::fs;
use std::path::PathBuf;

/// Runs the hauling core against a JSON world for a number of ticks
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World snapshot to start from
    world: PathBuf,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 100)]
    ticks: u32,

    /// Optional JSON configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Energy each spawn and extension consumes per tick
    #[arg(long, default_value_t = 5)]
    consume: u32,

    /// Round-trip agent memory through its persisted encoding every tick
    #[arg(long)]
    persist: bool,

    /// Write the final world here
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Default)]
struct BenchStats {
    delivered: u32,
    harvested: u32,
    assignments: usize,
}

fn main() -> Result<(), String> {
    env_logger::init();

    let args = Args::parse();

    let features = match &args.config {
        Some(path) => HaulFeatures::from_json(&read_file(path)?)?,
        None => HaulFeatures::default(),
    };

    info!("Loading world {}", args.world.display());
    let mut world = MemoryWorld::from_json(&read_file(&args.world)?)?;

    let mut memory = AgentMemory::new();
    let mut stats = BenchStats::default();

    for _ in 0..args.ticks {
        recruit(&world, &mut memory);

        let mut actions = ActionQueue::new();

        let report = game_loop::tick(&world, &mut actions, &mut memory, &features);

        stats.assignments += report.pools.pickup.assigned.tasks + report.pools.dropoff.assigned.tasks;

        debug!(
            "Tick {} - pickups {}/{} - dropoffs {}/{}",
            report.time,
            report.pools.pickup.available.quantity,
            report.pools.pickup.generated.quantity,
            report.pools.dropoff.available.quantity,
            report.pools.dropoff.generated.quantity
        );

        apply_actions(&mut world, actions.take(), &features, &mut stats);
        consume_energy(&mut world, args.consume);

        if args.persist {
            memory = game_loop::load_memory(game_loop::save_memory(&memory).as_deref());
        }

        world.time += 1;
    }

    for record in memory.values() {
        debug!("{}", record.summarize());
    }

    info!(
        "Simulated {} ticks - harvested: {} - delivered: {} - assignments: {}",
        args.ticks, stats.harvested, stats.delivered, stats.assignments
    );

    if let Some(path) = &args.output {
        fs::write(path, world.to_json()?).map_err(|err| format!("Failed to write {}: {}", path.display(), err))?;
    }

    Ok(())
}

fn read_file(path: &PathBuf) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Failed to read {}: {}", path.display(), err))
}

/// Stands in for the recruitment component: every agent without a record
/// gets a fresh one. Miners go to the least crowded source with a free spot.
fn recruit(world: &MemoryWorld, memory: &mut AgentMemory) {
    for agent in world.agents() {
        if memory.contains_key(&agent.id) {
            continue;
        }

        let record = match agent.role {
            AgentRole::Hauler => AgentRecord::hauler(),
            AgentRole::Miner => {
                let source = world
                    .sources(agent.pos.zone)
                    .into_iter()
                    .map(|source| (source.id, memory.assigned_miners(source.id), count_mining_spots(world, source)))
                    .filter(|(_, assigned, spots)| assigned < spots)
                    .min_by_key(|(_, assigned, _)| *assigned);

                match source {
                    Some((source, _, _)) => AgentRecord::miner(source),
                    None => {
                        warn!("No mining spot left for {}", agent.name);
                        continue;
                    }
                }
            }
            AgentRole::Upgrader => continue,
        };

        info!("Recruited {} - {}", agent.name, record.summarize());

        memory.insert(agent.id, record);
    }
}

/// Produces the next snapshot. Work actions resolve against current
/// positions before anything moves.
fn apply_actions(world: &mut MemoryWorld, requests: Vec<ActionRequest>, features: &HaulFeatures, stats: &mut BenchStats) {
    let (moves, work): (Vec<_>, Vec<_>) = requests
        .into_iter()
        .partition(|request| matches!(request, ActionRequest::MoveTo { .. }));

    for request in work.into_iter().chain(moves) {
        match request {
            ActionRequest::MoveTo { agent, target, range } => apply_move(world, agent, target, range),
            ActionRequest::Transfer {
                from,
                target,
                resource,
                amount,
            } => stats.delivered += apply_transfer(world, from, target, resource, amount),
            ActionRequest::Pickup { agent, pile } => apply_pickup(world, agent, pile),
            ActionRequest::Drop { agent, resource, amount } => apply_drop(world, agent, resource, amount),
            ActionRequest::Harvest { agent, source } => stats.harvested += apply_harvest(world, agent, source, features),
        }
    }
}

fn apply_move(world: &mut MemoryWorld, agent: AgentId, target: Position, range: u32) {
    let Some(pos) = world.agent(agent).map(|a| a.pos) else {
        return;
    };

    if pos.in_range_to(&target, range) {
        return;
    }

    let next = pos.step_towards(&target);

    if world.is_walkable(&next) {
        if let Some(agent) = world.agent_mut(agent) {
            agent.pos = next;
        }
    }
}

/// Returns the amount that landed in a spawn or extension.
fn apply_transfer(
    world: &mut MemoryWorld,
    from: AgentId,
    target: TransferTarget,
    resource: ResourceType,
    amount: Option<u32>,
) -> u32 {
    let Some(giver) = world.agent(from) else {
        return 0;
    };

    let giver_pos = giver.pos;
    let offered = amount.unwrap_or_else(|| giver.store.get_used_capacity(Some(resource)));

    let accepted = match target {
        TransferTarget::Structure(pos) if giver_pos.is_near_to(&pos) => {
            world.structure_at(&pos).map(|s| s.store.get_free_capacity()).unwrap_or(0)
        }
        TransferTarget::Agent(id) => world
            .agent(id)
            .filter(|a| a.pos.is_near_to(&giver_pos))
            .map(|a| a.store.get_free_capacity())
            .unwrap_or(0),
        _ => 0,
    };

    let moved = world
        .agent_mut(from)
        .map(|giver| giver.store.remove(resource, offered.min(accepted)))
        .unwrap_or(0);

    match target {
        TransferTarget::Structure(pos) => match world.structure_at_mut(&pos) {
            Some(structure) => {
                structure.store.add(resource, moved);

                match structure.structure_type {
                    StructureType::Spawn | StructureType::Extension => moved,
                    StructureType::Container => 0,
                }
            }
            None => 0,
        },
        TransferTarget::Agent(id) => {
            if let Some(receiver) = world.agent_mut(id) {
                receiver.store.add(resource, moved);
            }

            0
        }
    }
}

fn apply_pickup(world: &mut MemoryWorld, agent: AgentId, pile: Position) {
    let Some(free) = world.agent(agent).filter(|a| a.pos.is_near_to(&pile)).map(|a| a.store.get_free_capacity()) else {
        return;
    };

    let taken = world.take_from_pile(&pile, ResourceType::Energy, free);

    if let Some(agent) = world.agent_mut(agent) {
        agent.store.add(ResourceType::Energy, taken);
    }
}

fn apply_drop(world: &mut MemoryWorld, agent: AgentId, resource: ResourceType, amount: Option<u32>) {
    let Some(dropper) = world.agent_mut(agent) else {
        return;
    };

    let amount = amount.unwrap_or_else(|| dropper.store.get_used_capacity(Some(resource)));
    let dropped = dropper.store.remove(resource, amount);
    let pos = dropper.pos;

    world.drop_resource(pos, resource, dropped);
}

/// Harvested energy that does not fit in the miner lands on the ground.
fn apply_harvest(world: &mut MemoryWorld, agent: AgentId, source: SourceId, features: &HaulFeatures) -> u32 {
    let Some(miner) = world.agent(agent) else {
        return 0;
    };

    let Some(source_view) = world.source(source).filter(|s| s.pos.is_near_to(&miner.pos)) else {
        return 0;
    };

    let yielded = (miner.work_parts * features.harvest_power).min(source_view.energy);

    if let Some(source) = world.source_mut(source) {
        source.energy -= yielded;
    }

    let Some(miner) = world.agent_mut(agent) else {
        return yielded;
    };

    let kept = miner.store.add(ResourceType::Energy, yielded);
    let pos = miner.pos;

    world.drop_resource(pos, ResourceType::Energy, yielded - kept);

    yielded
}

fn consume_energy(world: &mut MemoryWorld, amount: u32) {
    for structure in world.structures.iter_mut() {
        if matches!(structure.structure_type, StructureType::Spawn | StructureType::Extension) {
            structure.store.remove(ResourceType::Energy, amount);
        }
    }
}
