use crate::jobs::actions::*;
use crate::jobs::context::*;
use crate::position::*;

/// Requests a move towards `position` unless the agent already moved this tick.
pub fn tick_move_to_position(tick_context: &mut JobTickContext, position: Position, range: u32) -> ActionResult {
    let owner = tick_context.runtime_data.owner;

    if owner.pos.in_range_to(&position, range) {
        return ActionResult::Ok;
    }

    if !tick_context.action_flags.consume(SimultaneousActionFlags::MOVE) {
        return ActionResult::Busy;
    }

    tick_context.runtime_data.actions.move_to(owner.id, position, range)
}
