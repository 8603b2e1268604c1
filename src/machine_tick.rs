use log::*;
use std::fmt::Debug;

const MAX_STATE_TRANSITIONS: u32 = 20;

/// Result of ticking a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    /// Enter the new state and tick it again this tick.
    Immediate(S),
    /// Enter the new state; it first runs next tick.
    Deferred(S),
}

pub fn run_state_machine<S, F>(state: &mut S, label: &str, mut tick_fn: F)
where
    S: Debug,
    F: FnMut(&mut S) -> Option<Transition<S>>,
{
    let mut transitions = 0u32;
    while let Some(transition) = tick_fn(state) {
        let (new_state, immediate) = match transition {
            Transition::Immediate(new_state) => (new_state, true),
            Transition::Deferred(new_state) => (new_state, false),
        };

        debug!("[{}] {:?} -> {:?}", label, state, new_state);

        *state = new_state;

        if !immediate {
            break;
        }

        transitions += 1;
        if transitions >= MAX_STATE_TRANSITIONS {
            error!(
                "State machine '{}' exceeded {} transitions in a single tick, breaking to prevent infinite loop",
                label, MAX_STATE_TRANSITIONS
            );
            break;
        }
    }
}
