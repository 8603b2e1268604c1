use super::actions::*;
use super::context::*;
use super::jobsystem::*;
use super::utility::movebehavior::*;
use crate::machine_tick::*;
use crate::position::*;
use crate::transfer::task::*;
use crate::transfer::grow::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaulState {
    WaitingForPickup,
    TravelingToPickup,
    PickingUp,
    WaitingForDropoff,
    TravelingToDropoff,
    DroppingOff,
}

impl HaulState {
    /// Waiting states are the only states without a task.
    pub fn is_waiting(self) -> bool {
        matches!(self, HaulState::WaitingForPickup | HaulState::WaitingForDropoff)
    }

    /// The half of the cycle this state belongs to.
    pub fn direction(self) -> TaskDirection {
        match self {
            HaulState::WaitingForPickup | HaulState::TravelingToPickup | HaulState::PickingUp => TaskDirection::Pickup,
            HaulState::WaitingForDropoff | HaulState::TravelingToDropoff | HaulState::DroppingOff => TaskDirection::Dropoff,
        }
    }

    pub fn waiting_for(direction: TaskDirection) -> HaulState {
        match direction {
            TaskDirection::Pickup => HaulState::WaitingForPickup,
            TaskDirection::Dropoff => HaulState::WaitingForDropoff,
        }
    }

    pub fn traveling_to(direction: TaskDirection) -> HaulState {
        match direction {
            TaskDirection::Pickup => HaulState::TravelingToPickup,
            TaskDirection::Dropoff => HaulState::TravelingToDropoff,
        }
    }

    pub fn acting_on(direction: TaskDirection) -> HaulState {
        match direction {
            TaskDirection::Pickup => HaulState::PickingUp,
            TaskDirection::Dropoff => HaulState::DroppingOff,
        }
    }

    fn tick(self, state_context: &mut HaulJobContext, tick_context: &mut JobTickContext) -> Option<Transition<HaulState>> {
        match self {
            HaulState::WaitingForPickup | HaulState::WaitingForDropoff => tick_waiting(state_context),
            HaulState::TravelingToPickup => tick_traveling(TaskDirection::Pickup, state_context, tick_context),
            HaulState::TravelingToDropoff => tick_traveling(TaskDirection::Dropoff, state_context, tick_context),
            HaulState::PickingUp => tick_picking_up(state_context, tick_context),
            HaulState::DroppingOff => tick_dropping_off(state_context, tick_context),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaulJobContext {
    #[serde(rename = "t")]
    current_task: Option<HaulTask>,
}

impl HaulJobContext {
    fn abandon(&mut self, waiting: HaulState) -> Option<Transition<HaulState>> {
        self.current_task = None;

        Some(Transition::Deferred(waiting))
    }
}

fn tick_waiting(state_context: &mut HaulJobContext) -> Option<Transition<HaulState>> {
    state_context
        .current_task
        .map(|task| Transition::Immediate(HaulState::traveling_to(task.direction)))
}

/// Re-resolves a moving target. Only carrier tasks can move.
fn refresh_anchor(task: &mut HaulTask, world: &dyn WorldSnapshot) -> Result<Position, TaskError> {
    if let Some(agent) = task.agent_ref() {
        let target = world.agent(agent).ok_or(TaskError::AgentVanished(agent))?;

        task.anchor = target.pos;
    }

    Ok(task.anchor)
}

/// Re-derives a task the hauler is travelling to. A target that is gone or
/// has nothing left to move is an error.
fn regrow(task: &HaulTask, owner: &AgentView, world: &dyn WorldSnapshot) -> Result<HaulTask, TaskError> {
    if task.kind == TaskKind::DroppedPile && world.dropped_resource_at(&task.anchor, task.resource).is_none() {
        return Err(TaskError::PileVanished(task.anchor));
    }

    let grown = TaskGrower::new(world, owner).grow(task)?;

    if grown.is_dead() {
        return Err(TaskError::Depleted(grown.anchor));
    }

    Ok(grown)
}

fn tick_traveling(
    direction: TaskDirection,
    state_context: &mut HaulJobContext,
    tick_context: &mut JobTickContext,
) -> Option<Transition<HaulState>> {
    let owner = tick_context.runtime_data.owner;
    let world = tick_context.system_data.world;
    let waiting = HaulState::waiting_for(direction);

    let Some(task) = state_context.current_task else {
        return Some(Transition::Deferred(waiting));
    };

    match direction {
        TaskDirection::Pickup if owner.store.is_full() => {
            return state_context.abandon(HaulState::WaitingForDropoff);
        }
        TaskDirection::Dropoff if owner.store.get_used_capacity(Some(task.resource)) == 0 => {
            info!("[{}] Nothing left to deliver, dropping task {}", owner.name, task);

            return state_context.abandon(HaulState::WaitingForPickup);
        }
        _ => {}
    }

    let anchor = match regrow(&task, owner, world) {
        Ok(grown) => {
            state_context.current_task = Some(grown);

            grown.anchor
        }
        Err(err) => {
            warn!("[{}] Abandoning task while traveling: {}", owner.name, err);

            return state_context.abandon(waiting);
        }
    };

    match owner.pos.get_range_to(&anchor) {
        Range::Unreachable => {
            warn!("[{}] {}", owner.name, TaskError::Unreachable(anchor));

            state_context.abandon(waiting)
        }
        Range::Tiles(distance) if distance > 1 => {
            let result = tick_move_to_position(tick_context, anchor, 1);

            if result.is_ok() && distance == 2 {
                Some(Transition::Deferred(HaulState::acting_on(direction)))
            } else {
                if !result.is_ok() {
                    warn!("[{}] Failed to move towards {}: {}", owner.name, anchor, result);
                }

                None
            }
        }
        Range::Tiles(_) => Some(Transition::Deferred(HaulState::acting_on(direction))),
    }
}

fn tick_picking_up(state_context: &mut HaulJobContext, tick_context: &mut JobTickContext) -> Option<Transition<HaulState>> {
    let owner = tick_context.runtime_data.owner;
    let world = tick_context.system_data.world;

    if owner.store.is_full() {
        return state_context.abandon(HaulState::WaitingForDropoff);
    }

    let Some(task) = state_context.current_task.as_mut() else {
        return Some(Transition::Deferred(HaulState::WaitingForPickup));
    };

    if let Err(err) = refresh_anchor(task, world) {
        warn!("[{}] Abandoning pickup: {}", owner.name, err);

        return state_context.abandon(HaulState::WaitingForPickup);
    }

    let task = *task;

    if !owner.pos.is_near_to(&task.anchor) {
        return Some(Transition::Deferred(HaulState::TravelingToPickup));
    }

    let result = match task.kind {
        TaskKind::AgentCarrier(carrier) => {
            let Some(source) = world.agent(carrier) else {
                return state_context.abandon(HaulState::WaitingForPickup);
            };

            let stored = source.store.get_used_capacity(Some(task.resource));
            let threshold = tick_context.system_data.features.dry_threshold(source.work_parts);

            if stored <= threshold {
                info!(
                    "[{}] {} is about to run dry ({} <= {}), looking for other pickups",
                    owner.name, source.name, stored, threshold
                );

                return state_context.abandon(HaulState::WaitingForPickup);
            }

            if !tick_context.action_flags.consume(SimultaneousActionFlags::TRANSFER) {
                return None;
            }

            tick_context
                .runtime_data
                .actions
                .transfer(carrier, TransferTarget::Agent(owner.id), task.resource, None)
        }
        TaskKind::DroppedPile => {
            if world.dropped_resource_at(&task.anchor, task.resource).is_none() {
                warn!("[{}] Abandoning pickup: {}", owner.name, TaskError::PileVanished(task.anchor));

                return state_context.abandon(HaulState::WaitingForPickup);
            }

            if !tick_context.action_flags.consume(SimultaneousActionFlags::PICKUP) {
                return None;
            }

            tick_context.runtime_data.actions.pickup(owner.id, task.anchor)
        }
        TaskKind::Structure => {
            warn!("[{}] Withdrawing from structures is not implemented, holding {}", owner.name, task);

            return None;
        }
    };

    if !result.is_ok() {
        warn!("[{}] Pickup from {} failed: {}", owner.name, task.anchor, result);

        return state_context.abandon(HaulState::WaitingForPickup);
    }

    None
}

fn tick_dropping_off(state_context: &mut HaulJobContext, tick_context: &mut JobTickContext) -> Option<Transition<HaulState>> {
    let owner = tick_context.runtime_data.owner;
    let world = tick_context.system_data.world;

    let Some(task) = state_context.current_task.as_mut() else {
        return Some(Transition::Deferred(HaulState::WaitingForDropoff));
    };

    if owner.store.get_used_capacity(Some(task.resource)) == 0 {
        return state_context.abandon(HaulState::WaitingForPickup);
    }

    if let Err(err) = refresh_anchor(task, world) {
        warn!("[{}] Abandoning dropoff: {}", owner.name, err);

        return state_context.abandon(HaulState::WaitingForDropoff);
    }

    let task = *task;

    if !owner.pos.is_near_to(&task.anchor) {
        return Some(Transition::Deferred(HaulState::TravelingToDropoff));
    }

    match task.kind {
        TaskKind::Structure => {
            let Some(structure) = world.structure_at(&task.anchor) else {
                warn!("[{}] Abandoning dropoff: {}", owner.name, TaskError::StructureVanished(task.anchor));

                return state_context.abandon(HaulState::WaitingForDropoff);
            };

            if structure.store.get_free_capacity() == 0 {
                info!("[{}] {}", owner.name, TaskError::Depleted(task.anchor));

                return state_context.abandon(HaulState::WaitingForDropoff);
            }

            if !tick_context.action_flags.consume(SimultaneousActionFlags::TRANSFER) {
                return None;
            }

            let result = tick_context.runtime_data.actions.transfer(
                owner.id,
                TransferTarget::Structure(task.anchor),
                task.resource,
                None,
            );

            if !result.is_ok() {
                warn!("[{}] Transfer to {} failed, retrying next tick: {}", owner.name, task.anchor, result);
            }

            None
        }
        TaskKind::AgentCarrier(_) => {
            warn!("[{}] Delivering to agents is not implemented, dropping {}", owner.name, task);

            state_context.abandon(HaulState::WaitingForDropoff)
        }
        TaskKind::DroppedPile => {
            error!("[{}] Dropoff task targets a resource pile: {}", owner.name, task);

            state_context.abandon(HaulState::WaitingForDropoff)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaulJob {
    context: HaulJobContext,
    state: HaulState,
}

impl Default for HaulJob {
    fn default() -> HaulJob {
        HaulJob::new()
    }
}

impl HaulJob {
    pub fn new() -> HaulJob {
        HaulJob {
            context: HaulJobContext { current_task: None },
            state: HaulState::WaitingForPickup,
        }
    }

    /// Rebuilds a job from persisted parts. A waiting state never keeps a
    /// task, and an active state without one falls back to waiting.
    pub fn resume(state: HaulState, current_task: Option<HaulTask>) -> HaulJob {
        let (state, current_task) = match (state.is_waiting(), current_task) {
            (true, _) => (state, None),
            (false, None) => (HaulState::waiting_for(state.direction()), None),
            (false, Some(task)) => (state, Some(task)),
        };

        HaulJob {
            context: HaulJobContext { current_task },
            state,
        }
    }

    pub fn state(&self) -> HaulState {
        self.state
    }

    pub fn current_task(&self) -> Option<&HaulTask> {
        self.context.current_task.as_ref()
    }

    pub fn is_waiting(&self) -> bool {
        self.state.is_waiting()
    }

    /// Direction of the task this job is waiting for, if it is waiting.
    pub fn waiting_for(&self) -> Option<TaskDirection> {
        if self.is_waiting() && self.context.current_task.is_none() {
            Some(self.state.direction())
        } else {
            None
        }
    }

    /// Hands a task to a waiting job. The job starts traveling on its next step.
    pub fn assign(&mut self, task: HaulTask) -> bool {
        if self.waiting_for() != Some(task.direction) {
            return false;
        }

        self.context.current_task = Some(task);

        true
    }
}

impl Job for HaulJob {
    fn summarize(&self) -> String {
        match &self.context.current_task {
            Some(task) => format!("Haul - {:?} - {}", self.state, task),
            None => format!("Haul - {:?}", self.state),
        }
    }

    fn run_job(&mut self, system_data: &JobExecutionSystemData, runtime_data: &mut JobExecutionRuntimeData) {
        let owner = runtime_data.owner;

        let mut tick_context = JobTickContext {
            system_data,
            runtime_data,
            action_flags: SimultaneousActionFlags::UNSET,
        };

        let context = &mut self.context;

        run_state_machine(&mut self.state, &owner.name, |state| state.tick(context, &mut tick_context));
    }
}
