use crate::features::*;
use crate::position::*;
use crate::transfer::task::*;
use crate::world::*;

/// `quantity / (scalar * distance)`. Standing on the anchor counts as one
/// tile away; an unreachable anchor is worth nothing.
pub fn value_task(from: &Position, task: &HaulTask, distance_scalar: f64) -> f64 {
    match from.get_range_to(&task.anchor) {
        Range::Tiles(tiles) => task.quantity as f64 / (distance_scalar * tiles.max(1) as f64),
        Range::Unreachable => 0.0,
    }
}

pub fn value_pickup_task(hauler: &AgentView, task: &HaulTask, features: &HaulFeatures) -> f64 {
    value_task(&hauler.pos, task, features.pickup_distance_scalar)
}

//TODO: Weight dropoffs by structure type once spawn refill should outrank containers.
pub fn value_dropoff_task(hauler: &AgentView, task: &HaulTask, features: &HaulFeatures) -> f64 {
    value_task(&hauler.pos, task, features.dropoff_distance_scalar)
}

/// Removes and returns the most valuable task in `available`. Ties go to the
/// task generated first. Dead or worthless tasks are never chosen.
pub fn choose_task<F>(available: &mut Vec<HaulTask>, valuation: F) -> Option<HaulTask>
where
    F: Fn(&HaulTask) -> f64,
{
    let best = available
        .iter()
        .enumerate()
        .filter(|(_, task)| !task.is_dead())
        .map(|(index, task)| (index, valuation(task)))
        .filter(|(_, value)| *value > 0.0)
        .fold(None, |best: Option<(usize, f64)>, (index, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((index, value)),
        });

    best.map(|(index, _)| available.remove(index))
}

pub fn choose_pickup_task(hauler: &AgentView, available: &mut Vec<HaulTask>, features: &HaulFeatures) -> Option<HaulTask> {
    choose_task(available, |task| value_pickup_task(hauler, task, features))
}

pub fn choose_dropoff_task(hauler: &AgentView, available: &mut Vec<HaulTask>, features: &HaulFeatures) -> Option<HaulTask> {
    choose_task(available, |task| value_dropoff_task(hauler, task, features))
}
