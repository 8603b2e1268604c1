use crate::position::*;
use crate::store::*;
use crate::world::*;
use bitflags::*;
use std::fmt;

// Action pipelines:
//
// Pipeline A (work):     harvest
// Pipeline D (transfer): transfer, drop, pickup, withdraw
//
// Actions within the same pipeline are mutually exclusive (share the same bit).
// Moving is its own pipeline and can be combined with either.

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SimultaneousActionFlags: u16 {
        const UNSET = 0;

        const MOVE = 1;

        const HARVEST = 1 << 1;

        const WITHDRAW = 1 << 4;
        const TRANSFER = 1 << 4;
        const DROP     = 1 << 4;
        const PICKUP   = 1 << 4;
    }
}

impl SimultaneousActionFlags {
    pub fn consume(&mut self, flags: SimultaneousActionFlags) -> bool {
        if !self.intersects(flags) {
            self.insert(flags);

            true
        } else {
            false
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ActionResult {
    Ok,
    NotInRange,
    NotEnoughResources,
    Full,
    InvalidTarget,
    Busy,
}

impl ActionResult {
    pub fn is_ok(self) -> bool {
        self == ActionResult::Ok
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ActionResult::Ok => "ok",
            ActionResult::NotInRange => "not in range",
            ActionResult::NotEnoughResources => "not enough resources",
            ActionResult::Full => "full",
            ActionResult::InvalidTarget => "invalid target",
            ActionResult::Busy => "busy",
        };

        write!(f, "{}", text)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TransferTarget {
    Structure(Position),
    Agent(AgentId),
}

impl fmt::Display for TransferTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferTarget::Structure(pos) => write!(f, "structure at {}", pos),
            TransferTarget::Agent(id) => write!(f, "agent {}", id),
        }
    }
}

/// Side-effecting requests an agent can make. Requests take effect on the
/// next snapshot; the result only reports whether the request was accepted.
pub trait AgentActions {
    fn move_to(&mut self, agent: AgentId, target: Position, range: u32) -> ActionResult;

    /// `from` gives its resource to `target`. Used both for deliveries and
    /// for a carrier handing its load to a hauler.
    fn transfer(&mut self, from: AgentId, target: TransferTarget, resource: ResourceType, amount: Option<u32>) -> ActionResult;

    fn pickup(&mut self, agent: AgentId, pile: Position) -> ActionResult;

    fn drop_resource(&mut self, agent: AgentId, resource: ResourceType, amount: Option<u32>) -> ActionResult;

    fn harvest(&mut self, agent: AgentId, source: SourceId) -> ActionResult;
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ActionRequest {
    MoveTo {
        agent: AgentId,
        target: Position,
        range: u32,
    },
    Transfer {
        from: AgentId,
        target: TransferTarget,
        resource: ResourceType,
        amount: Option<u32>,
    },
    Pickup {
        agent: AgentId,
        pile: Position,
    },
    Drop {
        agent: AgentId,
        resource: ResourceType,
        amount: Option<u32>,
    },
    Harvest {
        agent: AgentId,
        source: SourceId,
    },
}

impl ActionRequest {
    pub fn agent(&self) -> AgentId {
        match self {
            ActionRequest::MoveTo { agent, .. } => *agent,
            ActionRequest::Transfer { from, .. } => *from,
            ActionRequest::Pickup { agent, .. } => *agent,
            ActionRequest::Drop { agent, .. } => *agent,
            ActionRequest::Harvest { agent, .. } => *agent,
        }
    }
}

/// Records every request and answers with a configurable result per kind.
/// The bench replays the recorded requests against its world; tests inspect them.
pub struct ActionQueue {
    requests: Vec<ActionRequest>,
    pub move_result: ActionResult,
    pub transfer_result: ActionResult,
    pub pickup_result: ActionResult,
    pub drop_result: ActionResult,
    pub harvest_result: ActionResult,
}

impl Default for ActionQueue {
    fn default() -> ActionQueue {
        ActionQueue::new()
    }
}

impl ActionQueue {
    pub fn new() -> ActionQueue {
        ActionQueue {
            requests: Vec::new(),
            move_result: ActionResult::Ok,
            transfer_result: ActionResult::Ok,
            pickup_result: ActionResult::Ok,
            drop_result: ActionResult::Ok,
            harvest_result: ActionResult::Ok,
        }
    }

    pub fn requests(&self) -> &[ActionRequest] {
        &self.requests
    }

    pub fn requests_for(&self, agent: AgentId) -> Vec<&ActionRequest> {
        self.requests.iter().filter(|r| r.agent() == agent).collect()
    }

    pub fn take(&mut self) -> Vec<ActionRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl AgentActions for ActionQueue {
    fn move_to(&mut self, agent: AgentId, target: Position, range: u32) -> ActionResult {
        self.requests.push(ActionRequest::MoveTo { agent, target, range });
        self.move_result
    }

    fn transfer(&mut self, from: AgentId, target: TransferTarget, resource: ResourceType, amount: Option<u32>) -> ActionResult {
        self.requests.push(ActionRequest::Transfer {
            from,
            target,
            resource,
            amount,
        });
        self.transfer_result
    }

    fn pickup(&mut self, agent: AgentId, pile: Position) -> ActionResult {
        self.requests.push(ActionRequest::Pickup { agent, pile });
        self.pickup_result
    }

    fn drop_resource(&mut self, agent: AgentId, resource: ResourceType, amount: Option<u32>) -> ActionResult {
        self.requests.push(ActionRequest::Drop { agent, resource, amount });
        self.drop_result
    }

    fn harvest(&mut self, agent: AgentId, source: SourceId) -> ActionResult {
        self.requests.push(ActionRequest::Harvest { agent, source });
        self.harvest_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_pipeline_is_exclusive() {
        let mut flags = SimultaneousActionFlags::UNSET;

        assert!(flags.consume(SimultaneousActionFlags::MOVE));
        assert!(flags.consume(SimultaneousActionFlags::PICKUP));
        assert!(!flags.consume(SimultaneousActionFlags::TRANSFER));
        assert!(!flags.consume(SimultaneousActionFlags::MOVE));
        assert!(flags.consume(SimultaneousActionFlags::HARVEST));
    }
}
