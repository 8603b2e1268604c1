use crate::position::*;
use crate::store::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TaskDirection {
    #[serde(rename = "p")]
    Pickup,
    #[serde(rename = "d")]
    Dropoff,
}

/// What is at the task anchor. Only carrier tasks keep a reference, and it is
/// re-resolved against the snapshot every tick rather than trusted.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TaskKind {
    #[serde(rename = "r")]
    DroppedPile,
    #[serde(rename = "a")]
    AgentCarrier(AgentId),
    #[serde(rename = "s")]
    Structure,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HaulTask {
    pub direction: TaskDirection,
    pub kind: TaskKind,
    pub anchor: Position,
    pub resource: ResourceType,
    pub quantity: u32,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    #[error("agent {0} no longer exists")]
    AgentVanished(AgentId),
    #[error("no structure at {0}")]
    StructureVanished(Position),
    #[error("no dropped resource at {0}")]
    PileVanished(Position),
    #[error("{0} is unreachable")]
    Unreachable(Position),
    #[error("task at {0} has nothing left")]
    Depleted(Position),
}

impl HaulTask {
    pub fn pickup(kind: TaskKind, anchor: Position, resource: ResourceType, quantity: u32) -> HaulTask {
        HaulTask {
            direction: TaskDirection::Pickup,
            kind,
            anchor,
            resource,
            quantity,
        }
    }

    pub fn dropoff(kind: TaskKind, anchor: Position, resource: ResourceType, quantity: u32) -> HaulTask {
        HaulTask {
            direction: TaskDirection::Dropoff,
            kind,
            anchor,
            resource,
            quantity,
        }
    }

    pub fn is_pickup(&self) -> bool {
        self.direction == TaskDirection::Pickup
    }

    pub fn is_dropoff(&self) -> bool {
        self.direction == TaskDirection::Dropoff
    }

    pub fn is_dead(&self) -> bool {
        self.quantity == 0
    }

    pub fn agent_ref(&self) -> Option<AgentId> {
        match self.kind {
            TaskKind::AgentCarrier(agent) => Some(agent),
            TaskKind::DroppedPile | TaskKind::Structure => None,
        }
    }

    /// Identity is everything except the quantity.
    pub fn same_target(&self, other: &HaulTask) -> bool {
        self.direction == other.direction && self.kind == other.kind && self.anchor == other.anchor && self.resource == other.resource
    }

    pub fn with_quantity(&self, quantity: u32) -> HaulTask {
        HaulTask { quantity, ..*self }
    }

    /// The part of this (freshly generated) task not already claimed by
    /// `claimed`, the grown task of an agent in flight.
    ///
    /// Unrelated tasks leave this task unchanged. `None` means nothing is
    /// left to claim, including the inconsistent case where the claim is
    /// larger than what was generated.
    pub fn difference(&self, claimed: &HaulTask) -> Option<HaulTask> {
        if !self.same_target(claimed) {
            return Some(*self);
        }

        if claimed.quantity == self.quantity {
            None
        } else if claimed.quantity > self.quantity {
            error!(
                "Claimed task larger than available task - Target: {} - Available: {} - Claimed: {}",
                self, self.quantity, claimed.quantity
            );

            None
        } else {
            Some(self.with_quantity(self.quantity - claimed.quantity))
        }
    }
}

impl fmt::Display for TaskDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskDirection::Pickup => write!(f, "pickup"),
            TaskDirection::Dropoff => write!(f, "dropoff"),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::DroppedPile => write!(f, "dropped"),
            TaskKind::AgentCarrier(agent) => write!(f, "agent {}", agent),
            TaskKind::Structure => write!(f, "structure"),
        }
    }
}

impl fmt::Display for HaulTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] {} {} at {}",
            self.direction, self.kind, self.quantity, self.resource, self.anchor
        )
    }
}
